//! The per-entity normalized store.
//!
//! State is owned by [`Store`] and only ever changed by the pure
//! [`reduce`](reducer::reduce) function; every applied action replaces the
//! whole state in one step, so readers always observe complete states.

pub mod dispatch;
pub mod loading;
pub mod reducer;
pub mod search;
pub mod selectors;
pub mod table;

pub use dispatch::{run_add, run_get, run_remove, run_search, run_update, Store};
pub use reducer::{reduce, Action, ActionKind, ErrorInfo, State, StoreError};
pub use search::{CachedSearchResult, SearchState};
pub use selectors::{last_added, search_results_view, MemoizedSearchView, SearchResultsView};
pub use table::EntityTable;
