//! Application configuration.
//!
//! Settings are layered: built-in defaults, then `config.toml` under the
//! user's config directory, then `GAMESEARCH__SECTION__KEY` environment
//! variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the platform config/data roots used by the search source.
pub const APP_DIR: &str = "gamesearch";

const DEFAULT_CONFIG: &str = r#"# Game library search source configuration.

[search]
# Optional prefix the user types to address this source, e.g. "g".
# keyword = "g"
include_description = true
source_name = "Game Library"
priority = 10
platform_separator = ", "
installed_label = "installed"
not_installed_label = "not installed"

[library]
# path = "/path/to/library.json"
# icon_root = "/path/to/library/files"
"#;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Query and result presentation settings.
    pub search: SearchSettings,
    /// Library snapshot location.
    pub library: LibrarySettings,
}

/// Settings driving normalisation, matching and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Optional keyword prefix stripped from queries.
    pub keyword: Option<String>,
    /// Whether descriptions take part in matching and search keys.
    pub include_description: bool,
    /// Name the source registers under.
    pub source_name: String,
    /// Priority among competing search sources; higher wins.
    pub priority: i32,
    /// Separator used when joining platform names.
    pub platform_separator: String,
    /// Label shown for installed games.
    pub installed_label: String,
    /// Label shown for games that are not installed.
    pub not_installed_label: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            keyword: None,
            include_description: true,
            source_name: "Game Library".to_string(),
            priority: 10,
            platform_separator: ", ".to_string(),
            installed_label: "installed".to_string(),
            not_installed_label: "not installed".to_string(),
        }
    }
}

/// Where the library snapshot lives on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// JSON library snapshot.
    pub path: PathBuf,
    /// Directory relative icon tokens resolve against. Defaults to the
    /// snapshot's directory.
    pub icon_root: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("library.json"),
            icon_root: None,
        }
    }
}

impl LibrarySettings {
    /// Directory used to resolve relative icon tokens.
    pub fn icon_root(&self) -> PathBuf {
        self.icon_root.clone().unwrap_or_else(|| {
            self.path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

impl AppConfig {
    /// Load configuration from the default file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (which may be missing) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("GAMESEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to load config {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Location of the user's configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Write the default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}
