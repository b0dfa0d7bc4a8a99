//! Record store adapters.

/// Icon reference validation shared by stores and the result builder.
pub mod icon;
/// File-backed library snapshot.
pub mod json;
/// Read-only record store interface consumed by the search source.
pub mod store;

pub use json::JsonLibrary;
pub use store::{RecordStore, StoreEntry};
