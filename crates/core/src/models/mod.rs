//! Shared domain models.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Weight attached to every search key; all matched fields rank equally.
pub const SEARCH_KEY_WEIGHT: u32 = 100;

/// A single game entry as exposed by the host's library.
///
/// Decoding is lenient for everything but the identity: a display field of
/// the wrong shape falls back to its default instead of rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    /// Opaque identity, unique within the library.
    pub id: String,
    /// Game title.
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Free-form user notes.
    #[serde(deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    /// Store or user supplied description.
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    /// Names of the platforms the game is attached to.
    #[serde(deserialize_with = "lenient_platforms")]
    pub platforms: Option<Vec<String>>,
    /// Total playtime in minutes. Negative values are treated as zero.
    #[serde(deserialize_with = "lenient_playtime")]
    pub playtime_minutes: Option<i64>,
    /// Whether the game is currently installed.
    #[serde(deserialize_with = "lenient_flag")]
    pub installed: bool,
    /// Raw icon token as stored by the library (relative path, absolute path or URI).
    #[serde(deserialize_with = "lenient_text")]
    pub icon: Option<String>,
}

impl GameRecord {
    /// Create a record with the given identity and name and no other metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Title of the game, or an empty string when absent.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_platforms<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_playtime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().map(|minutes| minutes as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// A piece of text the host ranks against the query, with its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchKey {
    /// Text to rank.
    pub text: String,
    /// Ranking weight, always [`SEARCH_KEY_WEIGHT`].
    pub weight: u32,
}

impl SearchKey {
    /// Build a key with the standard weight.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: SEARCH_KEY_WEIGHT,
        }
    }
}

/// Action selecting a game in the host's library view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectAction {
    /// Identity of the game to select.
    pub game_id: String,
    /// Ask the host to close the search UI once the action ran.
    pub close_after: bool,
}

impl SelectAction {
    /// Selection action for the given game that closes the search UI.
    pub fn select(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            close_after: true,
        }
    }
}

/// A renderable, actionable search result built for a single query.
#[derive(Debug, Clone)]
pub struct ResultItem {
    /// Record the result was built from.
    pub record: Arc<GameRecord>,
    /// Keys the host ranks against the query.
    pub keys: Vec<SearchKey>,
    /// Action invoked when the user activates the result.
    pub action: SelectAction,
    /// Platform names joined for display.
    pub platforms: String,
    /// Playtime formatted as `<hours>h<minutes>min`.
    pub playtime: String,
    /// Install state label.
    pub install_status: String,
    /// Absolute path or URI of the icon, when one could be resolved.
    pub icon: Option<String>,
}

impl ResultItem {
    /// Identity of the underlying record.
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Title of the underlying record.
    pub fn name(&self) -> &str {
        self.record.display_name()
    }
}
