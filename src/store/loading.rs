//! Loading-indicator rules.
//!
//! One explicit table maps each action kind to its effect on the global
//! loading indicator; a small interpreter applies the table to the action
//! stream. Searches carry no indicator since the table views render their own
//! placeholder rows.

use std::collections::HashSet;

use crate::store::reducer::ActionKind;

/// Whether an action kind starts the loading indicator, and which request
/// kind it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingRule {
    pub starts_loading: bool,
    pub ends_loading: Option<ActionKind>,
}

impl LoadingRule {
    const NONE: LoadingRule = LoadingRule {
        starts_loading: false,
        ends_loading: None,
    };

    const STARTS: LoadingRule = LoadingRule {
        starts_loading: true,
        ends_loading: None,
    };

    const fn ends(kind: ActionKind) -> LoadingRule {
        LoadingRule {
            starts_loading: false,
            ends_loading: Some(kind),
        }
    }
}

/// The loading rule for each action kind.
pub fn loading_rule(kind: ActionKind) -> LoadingRule {
    use ActionKind::*;

    match kind {
        GetRequest | AddRequest | UpdateRequest | RemoveRequest => LoadingRule::STARTS,
        GetSuccess | GetFailure => LoadingRule::ends(GetRequest),
        AddSuccess | AddFailure => LoadingRule::ends(AddRequest),
        UpdateSuccess | UpdateFailure => LoadingRule::ends(UpdateRequest),
        RemoveSuccess | RemoveFailure => LoadingRule::ends(RemoveRequest),
        SearchRequest | SearchSuccess | SearchFailure => LoadingRule::NONE,
    }
}

/// Interprets [`loading_rule`] over the action stream: the indicator shows
/// while any started request has not yet seen its correlated completion.
#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    active: HashSet<ActionKind>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, kind: ActionKind) {
        let rule = loading_rule(kind);
        if rule.starts_loading {
            self.active.insert(kind);
        }
        if let Some(request_kind) = rule.ends_loading {
            self.active.remove(&request_kind);
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.active.is_empty()
    }
}
