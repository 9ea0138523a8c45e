use crate::store::reducer::State;
use crate::EntityModel;

/// The view-ready result of the last completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultsView<T> {
    /// Matched entities resolved from the table, in page order.
    pub entities: Vec<T>,
    pub total: u64,
    pub max_pages: u64,
    pub has_results_to_display: bool,
    /// A confirmed reply exists and matched nothing (filtered-to-empty).
    pub has_no_results_to_display: bool,
    /// The entity table itself is empty, regardless of search state
    /// (first-load empty).
    pub has_no_entities_to_display: bool,
    pub show_pagination: bool,
}

/// Combines the in-flight flag, last search, reply cache and entity table into
/// the view for the last completed search.
///
/// `None` means "no result yet": a search is in flight, none was issued, or
/// the last one never completed. Callers must not render `None` as an empty
/// result; a confirmed zero-match reply comes back as `Some` with
/// `has_no_results_to_display` set.
pub fn search_results_view<T: EntityModel + Clone>(state: &State<T>) -> Option<SearchResultsView<T>> {
    let reply = state.search.resolve()?;
    let entities: Vec<T> = reply
        .entity_ids
        .iter()
        .filter_map(|id| state.table.get(id))
        .cloned()
        .collect();
    Some(SearchResultsView {
        has_results_to_display: !reply.entity_ids.is_empty(),
        has_no_results_to_display: reply.entity_ids.is_empty(),
        has_no_entities_to_display: state.table.is_empty(),
        show_pagination: reply.max_pages > 1,
        total: reply.total,
        max_pages: reply.max_pages,
        entities,
    })
}

/// The most recently added entity, resolved from the table.
pub fn last_added<T: EntityModel + Clone>(state: &State<T>) -> Option<&T> {
    state
        .last_added_id
        .as_deref()
        .and_then(|id| state.table.get(id))
}

/// Memoizes [`search_results_view`] against a store revision: the pipeline is
/// recomputed only when the state has changed.
#[derive(Debug)]
pub struct MemoizedSearchView<T> {
    cached: Option<(u64, Option<SearchResultsView<T>>)>,
}

impl<T> Default for MemoizedSearchView<T> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<T: EntityModel + Clone> MemoizedSearchView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, revision: u64, state: &State<T>) -> Option<SearchResultsView<T>> {
        if let Some((cached_revision, view)) = &self.cached {
            if *cached_revision == revision {
                return view.clone();
            }
        }
        let view = search_results_view(state);
        self.cached = Some((revision, view.clone()));
        view
    }
}
