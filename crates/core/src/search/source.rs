use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::{
    config::SearchSettings,
    error::{BuildError, LibraryError},
    library::RecordStore,
    models::{GameRecord, ResultItem},
    registration::SourceDescriptor,
    search::{matches, normalize, MatchPolicy, ResultBuilder},
};

/// A named source of search results queried by the host.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// How the source presents itself to the host's registry.
    fn descriptor(&self) -> SourceDescriptor;

    /// Synchronous entry point kept for host compatibility.
    fn get_items(&self) -> Vec<ResultItem>;

    /// Synchronous entry point taking a term, kept for host compatibility.
    fn get_items_for(&self, term: &str) -> Vec<ResultItem>;

    /// Resolve `term` into fully materialised results. Never fails; failures
    /// surface as fewer or no results.
    async fn get_items_async(
        &self,
        term: Option<&str>,
        prior_candidates: &[ResultItem],
    ) -> Vec<ResultItem>;
}

/// Search source over a game library.
///
/// Stateless between calls: every query takes a fresh snapshot of the store.
pub struct LibrarySearchSource {
    store: Arc<dyn RecordStore>,
    descriptor: SourceDescriptor,
    keyword: Option<String>,
    policy: MatchPolicy,
    builder: ResultBuilder,
}

impl LibrarySearchSource {
    /// Source over `store` using default settings.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_settings(store, &SearchSettings::default())
    }

    /// Source over `store` configured from `settings`.
    pub fn with_settings(store: Arc<dyn RecordStore>, settings: &SearchSettings) -> Self {
        Self {
            store,
            descriptor: SourceDescriptor::from(settings),
            keyword: settings
                .keyword
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            policy: MatchPolicy::from(settings),
            builder: ResultBuilder::from(settings),
        }
    }

    fn collect(&self, term: &str) -> Result<Vec<ResultItem>, LibraryError> {
        let records = self.store.records()?;
        let mut seen = HashSet::with_capacity(records.len());
        let mut items = Vec::new();

        for record in records.into_iter().flatten() {
            if !seen.insert(record.id.clone()) {
                continue;
            }

            match self.evaluate(record.clone(), term) {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(err) => warn!("Skipping record {}: {err}", record.id),
            }
        }

        Ok(items)
    }

    fn evaluate(
        &self,
        record: Arc<GameRecord>,
        term: &str,
    ) -> Result<Option<ResultItem>, BuildError> {
        if !matches(&record, term, self.policy) {
            return Ok(None);
        }
        self.builder.build(record, self.store.as_ref()).map(Some)
    }
}

#[async_trait]
impl SearchProvider for LibrarySearchSource {
    fn descriptor(&self) -> SourceDescriptor {
        self.descriptor.clone()
    }

    fn get_items(&self) -> Vec<ResultItem> {
        Vec::new()
    }

    fn get_items_for(&self, _term: &str) -> Vec<ResultItem> {
        Vec::new()
    }

    async fn get_items_async(
        &self,
        term: Option<&str>,
        _prior_candidates: &[ResultItem],
    ) -> Vec<ResultItem> {
        let Some(term) = normalize(term, self.keyword.as_deref()) else {
            return Vec::new();
        };

        match self.collect(&term) {
            Ok(items) => {
                debug!("query '{term}' produced {} results", items.len());
                items
            }
            Err(err) => {
                error!("query '{term}' failed: {err}");
                Vec::new()
            }
        }
    }
}
