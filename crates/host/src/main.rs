mod adapter;

use anyhow::{Context, Result};
use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};

use adapter::{bind_action, HostRegistry, HostResult, SelectionSink};
use gamesearch_core::{
    config::{self, AppConfig},
    register_once, JsonLibrary, LibrarySearchSource,
};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Reports selections on stdout as JSON lines.
struct StdoutSink;

impl SelectionSink for StdoutSink {
    fn select_game(&self, game_id: &str) {
        let line = serde_json::json!({ "selected": game_id });
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let library = Arc::new(JsonLibrary::from_settings(&config.library));
    tracing::info!("serving library {}", library.path().display());
    let source = Arc::new(LibrarySearchSource::with_settings(library, &config.search));

    let mut registry = HostRegistry::default();
    register_once(&mut registry, source);
    for descriptor in registry.descriptors() {
        tracing::debug!("source '{}' ready", descriptor.name);
    }

    let sink: Arc<dyn SelectionSink> = Arc::new(StdoutSink);
    let mut last_results: Vec<HostResult> = Vec::new();
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read query")? {
        if let Some(index) = line.trim().strip_prefix('!') {
            activate(&last_results, index, sink.clone());
            continue;
        }

        last_results = registry.query(&line).await;
        let mut stdout = std::io::stdout().lock();
        for result in &last_results {
            serde_json::to_writer(&mut stdout, result)?;
            writeln!(stdout)?;
        }
        stdout.flush()?;
    }

    Ok(())
}

fn activate(results: &[HostResult], index: &str, sink: Arc<dyn SelectionSink>) {
    let Some(result) = index
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|index| results.get(index))
    else {
        tracing::warn!("no result at position '{index}'");
        return;
    };

    let action = bind_action(&result.action, sink);
    if action.invoke() {
        tracing::debug!("closing search after '{}'", action.label);
    }
}

fn init_logging() -> Result<()> {
    let log_file = open_log_file(&std::env::current_dir()?.join("logs"))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn open_log_file(log_dir: &Path) -> Result<File> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("gamesearch.log");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))
}
