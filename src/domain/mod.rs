//! Plain data records for the backend's wire format.
//!
//! Entities are plain structs deserialized by free `parse` functions; there is
//! no class hierarchy. All records use the backend's camelCase JSON field
//! names.

pub mod session;
pub mod shipment;
pub mod study;
pub mod user;

pub use session::{initial_auth_state, AuthState, AuthToken};
pub use shipment::{Shipment, ShipmentState};
pub use study::{AnnotationType, Study, StudyCounts, StudyState, StudyToAdd};
pub use user::{User, UserState};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options used to search for entities.
///
/// Two sets of parameters are the same query, for caching purposes, iff their
/// canonical [`term`](SearchParams::term) serializations are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// The filter to use on the entity attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// The field to sort by. A minus sign prefix sorts in descending order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// The 1-based page to return when the match count exceeds `limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// The number of entities to return per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The canonical cache key for these parameters.
    ///
    /// Keys are emitted in a fixed order and absent fields are omitted, so two
    /// logically identical searches always map to the same cache entry no
    /// matter how the parameters were assembled.
    pub fn term(&self) -> String {
        let mut map = serde_json::Map::new();
        if let Some(filter) = &self.filter {
            map.insert("filter".to_string(), Value::String(filter.clone()));
        }
        if let Some(sort) = &self.sort {
            map.insert("sort".to_string(), Value::String(sort.clone()));
        }
        if let Some(page) = self.page {
            map.insert("page".to_string(), Value::from(page));
        }
        if let Some(limit) = self.limit {
            map.insert("limit".to_string(), Value::from(limit));
        }
        Value::Object(map).to_string()
    }

    /// The query-string pairs sent to the search endpoint. Absent fields are
    /// not sent.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// One page of search results as returned by the server.
///
/// Entity order is the page order and is significant.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedReply<T> {
    /// The parameters the server was queried with.
    pub search_params: SearchParams,
    pub entities: Vec<T>,
    pub offset: u64,
    pub total: u64,
    pub max_pages: u64,
}
