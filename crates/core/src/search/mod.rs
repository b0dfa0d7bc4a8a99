//! Query normalisation, matching and result assembly.

/// Conversion of matching records into result items.
pub mod builder;
/// Case-insensitive field matching.
pub mod matcher;
/// Raw query normalisation.
pub mod query;
/// The search source the host queries.
pub mod source;

pub use builder::{format_playtime, ResultBuilder};
pub use matcher::{matches, MatchPolicy};
pub use query::normalize;
pub use source::{LibrarySearchSource, SearchProvider};
