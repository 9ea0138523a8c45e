use std::collections::HashMap;

use crate::domain::SearchParams;

/// The cached descriptor for one completed search: the matched entity IDs in
/// page order plus the pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSearchResult {
    pub entity_ids: Vec<String>,
    pub offset: u64,
    pub total: u64,
    pub max_pages: u64,
}

/// Search lifecycle state for one entity store.
///
/// Replies are cached per canonical term and never evicted, so the cache
/// grows for the lifetime of the session. Replies carry no sequence token: a
/// slow response recorded after a newer request for the same term overwrites
/// that term's entry (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    last_search: Option<SearchParams>,
    replies: HashMap<String, CachedSearchResult>,
    search_active: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a search request is in flight.
    pub fn search_active(&self) -> bool {
        self.search_active
    }

    /// The parameters of the most recent search request, if any.
    pub fn last_search(&self) -> Option<&SearchParams> {
        self.last_search.as_ref()
    }

    /// The cached reply recorded under `params`, regardless of the in-flight
    /// flag. [`resolve`](SearchState::resolve) is the gated read path.
    pub fn reply_for(&self, params: &SearchParams) -> Option<&CachedSearchResult> {
        self.replies.get(&params.term())
    }

    /// Accepts a search request: records the new parameters and raises the
    /// in-flight flag in a single state replacement.
    pub fn request(&self, params: SearchParams) -> Self {
        let mut next = self.clone();
        next.last_search = Some(params);
        next.search_active = true;
        next
    }

    /// Records a completed reply under the canonical term of `params` and
    /// clears the in-flight flag. Overwrites any earlier entry for the same
    /// term.
    pub fn record_result(
        &self,
        params: &SearchParams,
        entity_ids: Vec<String>,
        offset: u64,
        total: u64,
        max_pages: u64,
    ) -> Self {
        let mut next = self.clone();
        next.replies.insert(
            params.term(),
            CachedSearchResult {
                entity_ids,
                offset,
                total,
                max_pages,
            },
        );
        next.search_active = false;
        next
    }

    /// Clears the in-flight flag after a failed search and forgets the last
    /// search, so retrying the same parameters is not treated as already
    /// cached.
    pub fn failure(&self) -> Self {
        let mut next = self.clone();
        next.last_search = None;
        next.search_active = false;
        next
    }

    /// The confirmed result for the last search.
    ///
    /// Returns `Some` only when no search is in flight, a last search exists,
    /// and a reply was recorded for its exact term. `None` means "no result
    /// yet", which is distinct from a confirmed reply with zero matches.
    pub fn resolve(&self) -> Option<&CachedSearchResult> {
        if self.search_active {
            return None;
        }
        let last = self.last_search.as_ref()?;
        self.replies.get(&last.term())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams::new().with_filter("name:like:test")
    }

    fn completed(state: &SearchState, params: &SearchParams, ids: Vec<&str>) -> SearchState {
        state.record_result(
            params,
            ids.into_iter().map(str::to_string).collect(),
            0,
            1,
            1,
        )
    }

    #[test]
    fn a_new_request_hides_a_stale_reply_for_the_same_term() {
        let state = completed(&SearchState::new().request(params()), &params(), vec!["e1"]);
        assert!(state.resolve().is_some());

        let state = state.request(params());
        assert!(state.search_active());
        assert!(state.resolve().is_none());
        // The stale entry is still cached, just not readable yet.
        assert!(state.reply_for(&params()).is_some());
    }

    #[test]
    fn record_result_is_idempotent() {
        let requested = SearchState::new().request(params());
        let once = completed(&requested, &params(), vec!["e1"]);
        let twice = completed(&once, &params(), vec!["e1"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn conflicting_records_are_last_write_wins() {
        let state = SearchState::new().request(params());
        let state = completed(&state, &params(), vec!["e1"]);
        let state = completed(&state, &params(), vec!["e2"]);

        let reply = state.resolve().unwrap();
        assert_eq!(reply.entity_ids, ["e2".to_string()]);
    }

    #[test]
    fn failure_resets_the_last_search() {
        let state = SearchState::new().request(params()).failure();
        assert!(!state.search_active());
        assert_eq!(state.last_search(), None);
        assert!(state.resolve().is_none());
    }

    #[test]
    fn a_zero_match_reply_is_a_confirmed_result() {
        let state = completed(&SearchState::new().request(params()), &params(), vec![]);
        let reply = state.resolve().unwrap();
        assert!(reply.entity_ids.is_empty());
    }

    #[test]
    fn no_request_means_no_result() {
        assert!(SearchState::new().resolve().is_none());
    }
}
