use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::LibrarySettings,
    error::LibraryError,
    library::{icon, RecordStore, StoreEntry},
    models::GameRecord,
};

/// Thread-safe record store backed by a JSON library snapshot.
///
/// The snapshot is either `{ "games": [...] }` or a bare array of games. The
/// decoded snapshot is cached and re-read whenever the file's modification
/// time or size changes. A missing file reads as an empty library and is
/// never cached.
pub struct JsonLibrary {
    inner: RwLock<Inner>,
}

struct Inner {
    path: PathBuf,
    icon_root: PathBuf,
    cache: Option<CachedSnapshot>,
}

struct CachedSnapshot {
    stamp: FileStamp,
    entries: Vec<StoreEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl JsonLibrary {
    /// Build a store reading `path`, resolving relative icons against `icon_root`.
    pub fn new(path: impl Into<PathBuf>, icon_root: impl Into<PathBuf>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                path: path.into(),
                icon_root: icon_root.into(),
                cache: None,
            }),
        }
    }

    /// Build a store from the library section of the configuration.
    pub fn from_settings(settings: &LibrarySettings) -> Self {
        Self::new(settings.path.clone(), settings.icon_root())
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.inner.read().path.clone()
    }

    /// Drop the cached snapshot so the next query re-reads the file.
    pub fn reload(&self) {
        self.inner.write().cache = None;
    }
}

impl RecordStore for JsonLibrary {
    fn records(&self) -> Result<Vec<StoreEntry>, LibraryError> {
        let path = self.path();
        let Some(stamp) = file_stamp(&path)? else {
            debug!("library snapshot {} missing, treating as empty", path.display());
            self.reload();
            return Ok(Vec::new());
        };

        if let Some(cached) = self.inner.read().cache.as_ref() {
            if cached.stamp == stamp {
                return Ok(cached.entries.clone());
            }
        }

        let entries = load_snapshot(&path)?;
        self.inner.write().cache = Some(CachedSnapshot {
            stamp,
            entries: entries.clone(),
        });
        Ok(entries)
    }

    fn resolve_icon(&self, token: &str) -> Result<String, LibraryError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(icon_error(token, "empty token"));
        }
        if token.contains('\0') {
            return Err(icon_error(token, "contains a NUL byte"));
        }
        if icon::is_uri(token) || Path::new(token).is_absolute() {
            return Ok(token.to_string());
        }

        let joined = self.inner.read().icon_root.join(token);
        joined
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| icon_error(token, "path is not valid UTF-8"))
    }
}

fn icon_error(token: &str, reason: &str) -> LibraryError {
    LibraryError::Icon {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

fn file_stamp(path: &Path) -> Result<Option<FileStamp>, LibraryError> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(FileStamp {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LibraryError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_snapshot(path: &Path) -> Result<Vec<StoreEntry>, LibraryError> {
    let contents = fs::read_to_string(path).map_err(|source| LibraryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&contents).map_err(|source| LibraryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let games = match document {
        Value::Array(games) => games,
        Value::Object(mut map) => match map.remove("games") {
            Some(Value::Array(games)) => games,
            _ => {
                return Err(LibraryError::Unavailable(format!(
                    "{} has no games list",
                    path.display()
                )))
            }
        },
        _ => {
            return Err(LibraryError::Unavailable(format!(
                "{} is not a game library",
                path.display()
            )))
        }
    };

    Ok(games
        .into_iter()
        .enumerate()
        .map(|(index, raw)| decode_entry(index, raw))
        .collect())
}

fn decode_entry(index: usize, raw: Value) -> StoreEntry {
    if raw.is_null() {
        debug!("library entry {index} is null");
        return None;
    }

    match serde_json::from_value::<GameRecord>(raw) {
        Ok(record) => Some(Arc::new(record)),
        Err(err) => {
            warn!("Skipping library entry {index}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{LibrarySearchSource, SearchProvider};
    use anyhow::Result;
    use tempfile::tempdir;

    const LIBRARY: &str = r#"{
  "games": [
    { "id": "a", "name": "Dark Souls", "platforms": ["PC"], "playtime_minutes": 125, "installed": true, "icon": "icons/a.png" },
    null,
    "not a game",
    { "id": "c", "notes": "boss fight tips" }
  ]
}"#;

    #[test]
    fn decodes_entries_and_blanks_out_corrupt_ones() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("library.json");
        fs::write(&path, LIBRARY)?;

        let library = JsonLibrary::new(&path, dir.path());
        let records = library.records()?;
        assert_eq!(records.len(), 4);

        let first = records[0].as_ref().expect("first record");
        assert_eq!(first.id, "a");
        assert_eq!(first.display_name(), "Dark Souls");
        assert_eq!(first.playtime_minutes, Some(125));
        assert!(first.installed);
        assert!(records[1].is_none());
        assert!(records[2].is_none());
        assert_eq!(
            records[3].as_ref().and_then(|r| r.notes.as_deref()),
            Some("boss fight tips")
        );
        Ok(())
    }

    #[test]
    fn picks_up_a_library_written_after_the_first_read() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("library.json");

        let library = JsonLibrary::new(&path, dir.path());
        assert!(library.records()?.is_empty());

        fs::write(&path, r#"[{ "id": "x", "name": "Celeste" }]"#)?;
        assert_eq!(library.records()?.len(), 1);

        fs::write(
            &path,
            r#"[{ "id": "x", "name": "Celeste" }, { "id": "y", "name": "Hades" }]"#,
        )?;
        assert_eq!(library.records()?.len(), 2);

        fs::remove_file(&path)?;
        assert!(library.records()?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn search_sees_library_created_while_running() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("library.json");
        let library = Arc::new(JsonLibrary::new(&path, dir.path()));
        let source = LibrarySearchSource::new(library);

        assert!(source.get_items_async(Some("dark"), &[]).await.is_empty());

        fs::write(&path, r#"[{ "id": "a", "name": "Dark Souls" }]"#)?;
        let items = source.get_items_async(Some("dark"), &[]).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), "a");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_display_fields_keep_the_record() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("library.json");
        fs::write(
            &path,
            r#"{"games":[{"id":"a","name":"Dark Souls","platforms":["PC",null],"installed":null,"playtime_minutes":"lots","icon":17}]}"#,
        )?;

        let library = Arc::new(JsonLibrary::new(&path, dir.path()));
        let record = library.records()?[0].clone().expect("record kept");
        assert_eq!(record.platforms.as_deref(), Some(&["PC".to_string()][..]));
        assert!(!record.installed);
        assert_eq!(record.playtime_minutes, None);
        assert_eq!(record.icon, None);

        let items = LibrarySearchSource::new(library)
            .get_items_async(Some("dark"), &[])
            .await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].platforms, "PC");
        assert_eq!(items[0].playtime, "0h0min");
        assert_eq!(items[0].install_status, "not installed");
        Ok(())
    }

    #[test]
    fn rejects_documents_without_games() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("library.json");
        fs::write(&path, r#"{ "items": [] }"#)?;
        let library = JsonLibrary::new(&path, dir.path());
        assert!(matches!(
            library.records(),
            Err(LibraryError::Unavailable(_))
        ));

        fs::write(&path, "not json")?;
        library.reload();
        assert!(matches!(library.records(), Err(LibraryError::Parse { .. })));
        Ok(())
    }

    #[test]
    fn resolves_icon_tokens() -> Result<()> {
        let dir = tempdir()?;
        let library = JsonLibrary::new(dir.path().join("library.json"), dir.path());

        let relative = library.resolve_icon("icons/a.png")?;
        assert_eq!(PathBuf::from(&relative), dir.path().join("icons/a.png"));
        assert!(icon::is_absolute_reference(&relative));

        assert_eq!(
            library.resolve_icon("https://cdn.example.com/a.png")?,
            "https://cdn.example.com/a.png"
        );
        assert!(library.resolve_icon("  ").is_err());
        assert!(library.resolve_icon("bad\0token").is_err());
        Ok(())
    }
}
