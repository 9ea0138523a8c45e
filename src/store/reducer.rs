use crate::domain::{PagedReply, SearchParams};
use crate::store::search::SearchState;
use crate::store::table::EntityTable;
use crate::{EntityModel, Error};

/// The kind of a store action; used for error tagging and the loading rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SearchRequest,
    SearchSuccess,
    SearchFailure,
    GetRequest,
    GetSuccess,
    GetFailure,
    AddRequest,
    AddSuccess,
    AddFailure,
    UpdateRequest,
    UpdateSuccess,
    UpdateFailure,
    RemoveRequest,
    RemoveSuccess,
    RemoveFailure,
}

/// The store-visible description of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub status: Option<u16>,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        match err {
            Error::Api { status, message } => Self {
                status: Some(*status),
                message: message.clone(),
            },
            Error::Transport(inner) => Self {
                status: inner.status().map(|code| code.as_u16()),
                message: inner.to_string(),
            },
            other => Self {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

/// A recorded failure tagged with the action kind that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub action: ActionKind,
    pub error: ErrorInfo,
}

/// Every event one entity store can process.
#[derive(Debug, Clone)]
pub enum Action<T> {
    SearchRequest(SearchParams),
    SearchSuccess(PagedReply<T>),
    SearchFailure(ErrorInfo),
    GetRequest,
    GetSuccess(T),
    GetFailure(ErrorInfo),
    AddRequest,
    AddSuccess(T),
    AddFailure(ErrorInfo),
    UpdateRequest,
    UpdateSuccess(T),
    UpdateFailure(ErrorInfo),
    RemoveRequest,
    RemoveSuccess(String),
    RemoveFailure(ErrorInfo),
}

impl<T> Action<T> {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SearchRequest(_) => ActionKind::SearchRequest,
            Action::SearchSuccess(_) => ActionKind::SearchSuccess,
            Action::SearchFailure(_) => ActionKind::SearchFailure,
            Action::GetRequest => ActionKind::GetRequest,
            Action::GetSuccess(_) => ActionKind::GetSuccess,
            Action::GetFailure(_) => ActionKind::GetFailure,
            Action::AddRequest => ActionKind::AddRequest,
            Action::AddSuccess(_) => ActionKind::AddSuccess,
            Action::AddFailure(_) => ActionKind::AddFailure,
            Action::UpdateRequest => ActionKind::UpdateRequest,
            Action::UpdateSuccess(_) => ActionKind::UpdateSuccess,
            Action::UpdateFailure(_) => ActionKind::UpdateFailure,
            Action::RemoveRequest => ActionKind::RemoveRequest,
            Action::RemoveSuccess(_) => ActionKind::RemoveSuccess,
            Action::RemoveFailure(_) => ActionKind::RemoveFailure,
        }
    }
}

/// Full store state for one entity type.
///
/// Owned and mutated exclusively by [`reduce`]; read-only everywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct State<T> {
    pub table: EntityTable<T>,
    pub search: SearchState,
    pub last_added_id: Option<String>,
    pub last_removed_id: Option<String>,
    pub error: Option<StoreError>,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            table: EntityTable::default(),
            search: SearchState::default(),
            last_added_id: None,
            last_removed_id: None,
            error: None,
        }
    }
}

impl<T> State<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Applies one action to the state, returning the next state.
///
/// Pure: no I/O and no in-place mutation. A search request records the new
/// parameters and raises the in-flight flag in the same replacement; a search
/// failure clears the flag, forgets the last search and records the error
/// without touching the caches.
pub fn reduce<T: EntityModel + Clone>(state: &State<T>, action: &Action<T>) -> State<T> {
    match action {
        Action::SearchRequest(params) => State {
            search: state.search.request(params.clone()),
            error: None,
            ..state.clone()
        },
        Action::SearchSuccess(reply) => {
            let entity_ids = reply.entities.iter().map(|entity| entity.id().to_string()).collect();
            State {
                table: state.table.upsert_many(reply.entities.iter().cloned()),
                search: state.search.record_result(
                    &reply.search_params,
                    entity_ids,
                    reply.offset,
                    reply.total,
                    reply.max_pages,
                ),
                ..state.clone()
            }
        }
        Action::SearchFailure(error) => State {
            search: state.search.failure(),
            error: Some(StoreError {
                action: ActionKind::SearchFailure,
                error: error.clone(),
            }),
            ..state.clone()
        },
        Action::GetRequest | Action::UpdateRequest => State {
            error: None,
            ..state.clone()
        },
        Action::AddRequest => State {
            last_added_id: None,
            error: None,
            ..state.clone()
        },
        Action::RemoveRequest => State {
            last_removed_id: None,
            error: None,
            ..state.clone()
        },
        Action::GetSuccess(entity) => State {
            table: state.table.upsert_one(entity.clone()),
            ..state.clone()
        },
        Action::AddSuccess(entity) => State {
            table: state.table.add_one(entity.clone()),
            last_added_id: Some(entity.id().to_string()),
            ..state.clone()
        },
        Action::UpdateSuccess(entity) => State {
            table: state.table.update_one(entity.id(), entity.clone()),
            ..state.clone()
        },
        Action::RemoveSuccess(id) => State {
            table: state.table.remove_one(id),
            last_removed_id: Some(id.clone()),
            ..state.clone()
        },
        Action::GetFailure(error)
        | Action::AddFailure(error)
        | Action::UpdateFailure(error)
        | Action::RemoveFailure(error) => State {
            error: Some(StoreError {
                action: action.kind(),
                error: error.clone(),
            }),
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Study, StudyState};

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

    fn reply(params: &SearchParams, entities: Vec<Study>) -> PagedReply<Study> {
        let total = entities.len() as u64;
        PagedReply {
            search_params: params.clone(),
            entities,
            offset: 0,
            total,
            max_pages: 1,
        }
    }

    fn simulated_error() -> ErrorInfo {
        ErrorInfo::new(Some(404), "simulated error")
    }

    #[test]
    fn search_request_raises_the_flag_and_records_the_params_together() {
        let params = SearchParams::new().with_filter("name:like:test");
        let state = reduce(&State::<Study>::new(), &Action::SearchRequest(params.clone()));

        assert!(state.search.search_active());
        assert_eq!(state.search.last_search(), Some(&params));
        assert_eq!(state.error, None);
    }

    #[test]
    fn search_success_upserts_entities_and_records_the_reply() {
        let params = SearchParams::new();
        let entity = study("s1", 0);
        let state = reduce(&State::new(), &Action::SearchRequest(params.clone()));
        let state = reduce(&state, &Action::SearchSuccess(reply(&params, vec![entity.clone()])));

        assert!(!state.search.search_active());
        assert_eq!(state.table.get("s1"), Some(&entity));
        let cached = state.search.resolve().unwrap();
        assert_eq!(cached.entity_ids, ["s1".to_string()]);
        assert_eq!(cached.total, 1);
    }

    #[test]
    fn search_success_is_idempotent() {
        let params = SearchParams::new();
        let action = Action::SearchSuccess(reply(&params, vec![study("s1", 0)]));
        let requested = reduce(&State::new(), &Action::SearchRequest(params));
        let once = reduce(&requested, &action);
        let twice = reduce(&once, &action);
        assert_eq!(once, twice);
    }

    #[test]
    fn search_failure_clears_the_flag_and_tags_the_error() {
        let params = SearchParams::new().with_filter("name:like:test");
        let state = reduce(&State::<Study>::new(), &Action::SearchRequest(params));
        let state = reduce(&state, &Action::SearchFailure(simulated_error()));

        assert!(!state.search.search_active());
        assert_eq!(state.search.last_search(), None);
        let error = state.error.unwrap();
        assert_eq!(error.action, ActionKind::SearchFailure);
        assert_eq!(error.error.status, Some(404));
    }

    #[test]
    fn a_stale_reply_after_a_newer_request_wins_for_its_own_term() {
        // Request A, then B, then A's slow reply arrives. The store cannot
        // tell the replies apart; this pins the documented behavior.
        let params_a = SearchParams::new().with_filter("name:like:a");
        let params_b = SearchParams::new().with_filter("name:like:b");

        let state = reduce(&State::new(), &Action::SearchRequest(params_a.clone()));
        let state = reduce(&state, &Action::SearchRequest(params_b.clone()));
        let state = reduce(
            &state,
            &Action::SearchSuccess(reply(&params_a, vec![study("s1", 0)])),
        );

        // A's reply cleared the flag and is cached under A's term, but the
        // last search is still B, which never completed.
        assert!(!state.search.search_active());
        assert!(state.search.resolve().is_none());
        assert!(state.search.reply_for(&params_a).is_some());

        // When both requests use the same term the later reply overwrites.
        let state = reduce(&state, &Action::SearchRequest(params_a.clone()));
        let state = reduce(
            &state,
            &Action::SearchSuccess(reply(&params_a, vec![study("s2", 0)])),
        );
        assert_eq!(
            state.search.resolve().unwrap().entity_ids,
            ["s2".to_string()]
        );
    }

    #[test]
    fn add_success_records_the_last_added_id() {
        let entity = study("s1", 0);
        let state = reduce(&State::new(), &Action::AddRequest);
        let state = reduce(&state, &Action::AddSuccess(entity.clone()));

        assert_eq!(state.last_added_id.as_deref(), Some("s1"));
        assert_eq!(state.table.get("s1"), Some(&entity));
    }

    #[test]
    fn get_success_upserts_the_entity() {
        let entity = study("s1", 2);
        let state = reduce(&State::new(), &Action::GetSuccess(entity.clone()));
        assert_eq!(state.table.get("s1"), Some(&entity));
    }

    #[test]
    fn update_failure_leaves_the_table_unchanged_and_tags_the_error() {
        let entity = study("s1", 1);
        let seeded = reduce(&State::new(), &Action::GetSuccess(entity.clone()));
        let state = reduce(&seeded, &Action::UpdateRequest);
        let state = reduce(
            &state,
            &Action::UpdateFailure(ErrorInfo::new(
                Some(400),
                "expected version doesn't match current version",
            )),
        );

        assert_eq!(state.table, seeded.table);
        let error = state.error.unwrap();
        assert_eq!(error.action, ActionKind::UpdateFailure);
    }

    #[test]
    fn remove_success_drops_the_entity_and_records_the_id() {
        let state = reduce(&State::new(), &Action::GetSuccess(study("s1", 0)));
        let state = reduce(&state, &Action::RemoveRequest);
        let state = reduce(&state, &Action::RemoveSuccess("s1".to_string()));

        assert!(state.table.is_empty());
        assert_eq!(state.last_removed_id.as_deref(), Some("s1"));
    }

    #[test]
    fn a_new_request_clears_a_previous_error() {
        let state = reduce(&State::<Study>::new(), &Action::GetFailure(simulated_error()));
        assert!(state.error.is_some());

        let state = reduce(&state, &Action::GetRequest);
        assert_eq!(state.error, None);
    }
}
