use std::future::Future;
use std::sync::{Mutex, RwLock};

use log::{debug, warn};

use crate::domain::SearchParams;
use crate::store::loading::LoadingTracker;
use crate::store::reducer::{reduce, Action, ErrorInfo, State};
use crate::store::selectors::{MemoizedSearchView, SearchResultsView};
use crate::{EntityApi, EntityModel, Result};

struct Versioned<T> {
    state: State<T>,
    revision: u64,
}

/// Owns the state for one entity type and applies actions in delivery order.
///
/// Every dispatch runs the pure reducer and replaces the whole state in one
/// step; readers only ever observe complete states. Network responses are
/// delivered back as later, independent actions, so there is no guarantee
/// they arrive in the order their requests were issued.
pub struct Store<T> {
    inner: RwLock<Versioned<T>>,
    memo: Mutex<MemoizedSearchView<T>>,
    loading: Mutex<LoadingTracker>,
}

impl<T: EntityModel + Clone> Store<T> {
    pub fn new() -> Self {
        Self::with_state(State::new())
    }

    pub fn with_state(state: State<T>) -> Self {
        Self {
            inner: RwLock::new(Versioned { state, revision: 0 }),
            memo: Mutex::new(MemoizedSearchView::new()),
            loading: Mutex::new(LoadingTracker::new()),
        }
    }

    /// Applies one action. Actions are serialized by the state lock, so they
    /// take effect in the order delivered.
    pub fn dispatch(&self, action: Action<T>) {
        let kind = action.kind();
        debug!("dispatch {:?}", kind);
        {
            let mut inner = self.inner.write().unwrap();
            inner.state = reduce(&inner.state, &action);
            inner.revision += 1;
        }
        self.loading.lock().unwrap().apply(kind);
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> State<T> {
        self.inner.read().unwrap().state.clone()
    }

    /// The revision counter; advances once per applied action.
    pub fn revision(&self) -> u64 {
        self.inner.read().unwrap().revision
    }

    /// The memoized search view for the current state.
    pub fn search_view(&self) -> Option<SearchResultsView<T>> {
        let inner = self.inner.read().unwrap();
        self.memo.lock().unwrap().select(inner.revision, &inner.state)
    }

    /// True while any tracked request is awaiting its completion action.
    pub fn is_loading(&self) -> bool {
        self.loading.lock().unwrap().is_loading()
    }
}

impl<T: EntityModel + Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one search round trip: dispatches the request, performs the network
/// call, and dispatches the success or failure reply. Failures are captured
/// into store error state, not returned.
pub async fn run_search<T, A>(store: &Store<T>, api: &A, params: SearchParams)
where
    T: EntityModel + Clone,
    A: EntityApi<T> + ?Sized,
{
    store.dispatch(Action::SearchRequest(params.clone()));
    match api.search(&params).await {
        Ok(reply) => store.dispatch(Action::SearchSuccess(reply)),
        Err(err) => {
            warn!("search failed: {}", err);
            store.dispatch(Action::SearchFailure(ErrorInfo::from(&err)));
        }
    }
}

/// Runs one get-by-slug round trip.
pub async fn run_get<T, A>(store: &Store<T>, api: &A, slug: &str)
where
    T: EntityModel + Clone,
    A: EntityApi<T> + ?Sized,
{
    store.dispatch(Action::GetRequest);
    match api.get(slug).await {
        Ok(entity) => store.dispatch(Action::GetSuccess(entity)),
        Err(err) => {
            warn!("get {} failed: {}", slug, err);
            store.dispatch(Action::GetFailure(ErrorInfo::from(&err)));
        }
    }
}

/// Runs one add round trip; `op` performs the network call.
pub async fn run_add<T, F, Fut>(store: &Store<T>, op: F)
where
    T: EntityModel + Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    store.dispatch(Action::AddRequest);
    match op().await {
        Ok(entity) => store.dispatch(Action::AddSuccess(entity)),
        Err(err) => {
            warn!("add failed: {}", err);
            store.dispatch(Action::AddFailure(ErrorInfo::from(&err)));
        }
    }
}

/// Runs one update round trip; `op` performs the network call and must echo
/// the entity's last-known version.
pub async fn run_update<T, F, Fut>(store: &Store<T>, op: F)
where
    T: EntityModel + Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    store.dispatch(Action::UpdateRequest);
    match op().await {
        Ok(entity) => store.dispatch(Action::UpdateSuccess(entity)),
        Err(err) => {
            warn!("update failed: {}", err);
            store.dispatch(Action::UpdateFailure(ErrorInfo::from(&err)));
        }
    }
}

/// Runs one remove round trip; `op` performs the network call and returns the
/// removed entity's ID.
pub async fn run_remove<T, F, Fut>(store: &Store<T>, op: F)
where
    T: EntityModel + Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    store.dispatch(Action::RemoveRequest);
    match op().await {
        Ok(id) => store.dispatch(Action::RemoveSuccess(id)),
        Err(err) => {
            warn!("remove failed: {}", err);
            store.dispatch(Action::RemoveFailure(ErrorInfo::from(&err)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PagedReply, Study, StudyState};
    use crate::store::reducer::ActionKind;
    use crate::Error;
    use async_trait::async_trait;

    fn study(id: &str, version: u64) -> Study {
        Study {
            id: id.to_string(),
            version,
            time_added: None,
            time_modified: None,
            slug: format!("slug-{}", id),
            name: format!("Study {}", id),
            description: None,
            annotation_types: Vec::new(),
            state: StudyState::Enabled,
        }
    }

    struct FakeStudyApi {
        fail: bool,
    }

    #[async_trait]
    impl EntityApi<Study> for FakeStudyApi {
        async fn search(&self, params: &SearchParams) -> Result<PagedReply<Study>> {
            if self.fail {
                return Err(Error::Api {
                    status: 500,
                    message: "simulated error".to_string(),
                });
            }
            Ok(PagedReply {
                search_params: params.clone(),
                entities: vec![study("s1", 0)],
                offset: 0,
                total: 1,
                max_pages: 1,
            })
        }

        async fn get(&self, _slug: &str) -> Result<Study> {
            if self.fail {
                return Err(Error::Api {
                    status: 404,
                    message: "not found".to_string(),
                });
            }
            Ok(study("s1", 0))
        }
    }

    #[tokio::test]
    async fn a_search_round_trip_fills_the_view() {
        let store = Store::new();
        let api = FakeStudyApi { fail: false };

        run_search(&store, &api, SearchParams::new()).await;

        let view = store.search_view().unwrap();
        assert_eq!(view.total, 1);
        assert_eq!(view.entities[0].id, "s1");
        assert!(!store.state().search.search_active());
    }

    #[tokio::test]
    async fn a_failed_search_is_captured_not_returned() {
        let store: Store<Study> = Store::new();
        let api = FakeStudyApi { fail: true };

        run_search(&store, &api, SearchParams::new()).await;

        assert_eq!(store.search_view(), None);
        let error = store.state().error.unwrap();
        assert_eq!(error.action, ActionKind::SearchFailure);
        assert_eq!(error.error.status, Some(500));
    }

    #[tokio::test]
    async fn a_failed_update_keeps_the_table_and_ends_loading() {
        let store = Store::new();
        store.dispatch(Action::GetSuccess(study("s1", 1)));
        let before = store.state().table;

        run_update(&store, || async {
            Err::<Study, _>(Error::Api {
                status: 400,
                message: "expected version doesn't match current version".to_string(),
            })
        })
        .await;

        let state = store.state();
        assert_eq!(state.table, before);
        assert_eq!(state.error.unwrap().action, ActionKind::UpdateFailure);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn revision_advances_per_action() {
        let store: Store<Study> = Store::new();
        assert_eq!(store.revision(), 0);
        store.dispatch(Action::GetRequest);
        store.dispatch(Action::GetSuccess(study("s1", 0)));
        assert_eq!(store.revision(), 2);
    }
}
