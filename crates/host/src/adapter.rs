//! Translation between the core search source and the host's search UI.

use std::sync::Arc;

use gamesearch_core::{
    ResultItem, SearchKey, SearchProvider, SelectAction, SourceDescriptor, SourceRegistry,
};
use serde::Serialize;
use tracing::error;

const SELECT_LABEL: &str = "Select in library";

/// Receives selection requests from activated results.
pub trait SelectionSink: Send + Sync {
    /// Select the game with the given identity in the library view.
    fn select_game(&self, game_id: &str);
}

/// An action ready to be invoked by the host.
pub struct BoundAction {
    /// Label the host shows for the action.
    pub label: &'static str,
    /// Whether the search UI closes after the action ran.
    pub close_after: bool,
    callback: Box<dyn Fn() + Send + Sync>,
}

impl BoundAction {
    /// Run the action. Returns whether the search UI should close.
    pub fn invoke(&self) -> bool {
        (self.callback)();
        self.close_after
    }
}

/// Bind a selection descriptor to the host's sink.
pub fn bind_action(action: &SelectAction, sink: Arc<dyn SelectionSink>) -> BoundAction {
    let game_id = action.game_id.clone();
    BoundAction {
        label: SELECT_LABEL,
        close_after: action.close_after,
        callback: Box::new(move || sink.select_game(&game_id)),
    }
}

/// Serializable view of a result as the host renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostResult {
    /// Name of the source that produced the result.
    pub source: String,
    /// Identity of the game.
    pub id: String,
    /// Primary line: the game's name.
    pub name: String,
    /// Secondary line: platforms, playtime and install status.
    pub secondary: String,
    /// Absolute path or URI of the icon.
    pub icon: Option<String>,
    /// Keys the host ranks against the query.
    pub keys: Vec<SearchKey>,
    /// Label of the result's action.
    pub action_label: &'static str,
    /// Whether activating the result closes the search UI.
    pub close_after: bool,
    /// Descriptor bound to a sink when the result is activated.
    #[serde(skip)]
    pub action: SelectAction,
}

impl HostResult {
    fn from_item(source: &str, item: ResultItem) -> Self {
        let secondary = [
            item.platforms.as_str(),
            item.playtime.as_str(),
            item.install_status.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");

        Self {
            source: source.to_string(),
            id: item.id().to_string(),
            name: item.name().to_string(),
            secondary,
            icon: item.icon,
            keys: item.keys,
            action_label: SELECT_LABEL,
            close_after: item.action.close_after,
            action: item.action,
        }
    }
}

struct RegisteredSource {
    descriptor: SourceDescriptor,
    provider: Arc<dyn SearchProvider>,
}

/// In-process registry dispatching queries to sources by descending priority.
#[derive(Default)]
pub struct HostRegistry {
    sources: Vec<RegisteredSource>,
}

impl SourceRegistry for HostRegistry {
    fn add_source(&mut self, descriptor: SourceDescriptor, provider: Arc<dyn SearchProvider>) {
        let position = self
            .sources
            .iter()
            .position(|source| source.descriptor.priority < descriptor.priority)
            .unwrap_or(self.sources.len());
        self.sources.insert(
            position,
            RegisteredSource {
                descriptor,
                provider,
            },
        );
    }
}

impl HostRegistry {
    /// Descriptors of all registered sources in dispatch order.
    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        self.sources
            .iter()
            .map(|source| source.descriptor.clone())
            .collect()
    }

    /// Query every source and concatenate their results in priority order.
    pub async fn query(&self, term: &str) -> Vec<HostResult> {
        let mut results = Vec::new();
        for source in &self.sources {
            let items = dispatch(source.provider.clone(), term.to_string()).await;
            results.extend(
                items
                    .into_iter()
                    .map(|item| HostResult::from_item(&source.descriptor.name, item)),
            );
        }
        results
    }
}

/// Run one source query on its own task so a panicking source yields no
/// results instead of taking the host down.
async fn dispatch(provider: Arc<dyn SearchProvider>, term: String) -> Vec<ResultItem> {
    let name = provider.descriptor().name;
    let task = tokio::spawn(async move { provider.get_items_async(Some(&term), &[]).await });
    match task.await {
        Ok(items) => items,
        Err(err) => {
            error!("search source '{name}' aborted: {err}");
            Vec::new()
        }
    }
}
