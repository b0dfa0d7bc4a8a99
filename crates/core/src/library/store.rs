use std::sync::Arc;

use crate::{error::LibraryError, models::GameRecord};

/// A snapshot slot; `None` stands for a null or undecodable entry.
pub type StoreEntry = Option<Arc<GameRecord>>;

/// Read-only view over the host's game collection.
///
/// Implementations own synchronisation of the underlying records; the search
/// source only takes a snapshot per query.
pub trait RecordStore: Send + Sync {
    /// Snapshot of all records in the store's native order. May contain
    /// duplicates and absent entries.
    fn records(&self) -> Result<Vec<StoreEntry>, LibraryError>;

    /// Turn a raw icon token into an absolute path or URI.
    fn resolve_icon(&self, token: &str) -> Result<String, LibraryError>;
}
