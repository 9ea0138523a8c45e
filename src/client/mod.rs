//! REST services for the biobank backend.
//!
//! Each entity type gets a thin service over a shared [`RestClient`] that
//! speaks the backend's `{data: ...}` / `{error: {message}}` envelopes.

pub mod rest;

pub use rest::{RestClient, ShipmentService, StudyService, UserService};
