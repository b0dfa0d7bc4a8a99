#![warn(clippy::all, missing_docs)]

//! Core search logic for the game library search source.
//!
//! This crate hosts the game record model, query normalisation, field
//! matching, result assembly and the asynchronous search source that a
//! host application registers with its search subsystem.

pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod registration;
pub mod search;

pub use crate::config::AppConfig;
pub use error::{BuildError, LibraryError};
pub use library::{JsonLibrary, RecordStore, StoreEntry};
pub use models::{GameRecord, ResultItem, SearchKey, SelectAction, SEARCH_KEY_WEIGHT};
pub use registration::{register_once, RegistrationGuard, SourceDescriptor, SourceRegistry};
pub use search::{LibrarySearchSource, MatchPolicy, ResultBuilder, SearchProvider};
