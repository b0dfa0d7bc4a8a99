use std::sync::Arc;

use tracing::warn;

use crate::{
    config::SearchSettings,
    error::BuildError,
    library::{icon, RecordStore},
    models::{GameRecord, ResultItem, SearchKey, SelectAction},
    search::MatchPolicy,
};

/// Turns matching records into result items.
///
/// Display fields are computed independently; a failure in one of them
/// degrades that field to its empty value and never drops the item.
#[derive(Debug, Clone)]
pub struct ResultBuilder {
    policy: MatchPolicy,
    platform_separator: String,
    installed_label: String,
    not_installed_label: String,
}

impl Default for ResultBuilder {
    fn default() -> Self {
        Self::from(&SearchSettings::default())
    }
}

impl From<&SearchSettings> for ResultBuilder {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            policy: MatchPolicy::from(settings),
            platform_separator: settings.platform_separator.clone(),
            installed_label: settings.installed_label.clone(),
            not_installed_label: settings.not_installed_label.clone(),
        }
    }
}

impl ResultBuilder {
    /// Build the result item for `record`, resolving its icon through `store`.
    pub fn build(
        &self,
        record: Arc<GameRecord>,
        store: &dyn RecordStore,
    ) -> Result<ResultItem, BuildError> {
        if record.id.trim().is_empty() {
            return Err(BuildError::MissingIdentity {
                name: record.display_name().to_string(),
            });
        }

        let keys = self.search_keys(&record);
        let action = SelectAction::select(record.id.clone());
        let platforms = join_platforms(record.platforms.as_deref(), &self.platform_separator);
        let playtime = format_playtime(record.playtime_minutes);
        let install_status = self.install_status(&record);
        let icon = resolve_icon(&record, store);

        Ok(ResultItem {
            record,
            keys,
            action,
            platforms,
            playtime,
            install_status,
            icon,
        })
    }

    fn search_keys(&self, record: &GameRecord) -> Vec<SearchKey> {
        let mut keys = vec![SearchKey::new(record.display_name())];
        if let Some(notes) = non_blank(record.notes.as_deref()) {
            keys.push(SearchKey::new(notes));
        }
        if self.policy.include_description {
            if let Some(description) = non_blank(record.description.as_deref()) {
                keys.push(SearchKey::new(description));
            }
        }
        keys
    }

    fn install_status(&self, record: &GameRecord) -> String {
        if record.installed {
            self.installed_label.clone()
        } else {
            self.not_installed_label.clone()
        }
    }
}

/// Format a playtime in minutes as `<hours>h<minutes>min`; negative or absent
/// playtime counts as zero.
pub fn format_playtime(minutes: Option<i64>) -> String {
    let total = minutes.unwrap_or(0).max(0);
    format!("{}h{}min", total / 60, total % 60)
}

fn join_platforms(platforms: Option<&[String]>, separator: &str) -> String {
    platforms
        .unwrap_or_default()
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn resolve_icon(record: &GameRecord, store: &dyn RecordStore) -> Option<String> {
    let token = non_blank(record.icon.as_deref())?;
    match store.resolve_icon(token) {
        Ok(reference) if icon::is_absolute_reference(&reference) => Some(reference),
        Ok(reference) => {
            warn!(
                "Dropping icon for {}: '{}' is not an absolute reference",
                record.id, reference
            );
            None
        }
        Err(err) => {
            warn!("Dropping icon for {}: {err}", record.id);
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::LibraryError, library::StoreEntry};

    struct IconStore;

    impl RecordStore for IconStore {
        fn records(&self) -> Result<Vec<StoreEntry>, LibraryError> {
            Ok(Vec::new())
        }

        fn resolve_icon(&self, token: &str) -> Result<String, LibraryError> {
            match token {
                "broken" => Err(LibraryError::Icon {
                    token: token.to_string(),
                    reason: "unreadable".to_string(),
                }),
                "relative" => Ok("icons/relative.png".to_string()),
                other => Ok(format!("https://cdn.example.com/{other}")),
            }
        }
    }

    fn dark_souls() -> GameRecord {
        GameRecord {
            id: "a".to_string(),
            name: Some("Dark Souls".to_string()),
            notes: Some(String::new()),
            description: Some("Prepare to die".to_string()),
            platforms: Some(vec!["PC".to_string(), " ".to_string(), "PS3".to_string()]),
            playtime_minutes: Some(125),
            installed: true,
            icon: Some("ds.png".to_string()),
        }
    }

    #[test]
    fn formats_playtime() {
        assert_eq!(format_playtime(Some(125)), "2h5min");
        assert_eq!(format_playtime(Some(60)), "1h0min");
        assert_eq!(format_playtime(Some(0)), "0h0min");
        assert_eq!(format_playtime(Some(-30)), "0h0min");
        assert_eq!(format_playtime(None), "0h0min");
    }

    #[test]
    fn builds_display_fields_and_action() {
        let item = ResultBuilder::default()
            .build(Arc::new(dark_souls()), &IconStore)
            .expect("item");
        assert_eq!(item.id(), "a");
        assert_eq!(item.platforms, "PC, PS3");
        assert_eq!(item.playtime, "2h5min");
        assert_eq!(item.install_status, "installed");
        assert_eq!(item.icon.as_deref(), Some("https://cdn.example.com/ds.png"));
        assert_eq!(item.action, SelectAction::select("a"));
        assert!(item.action.close_after);
    }

    #[test]
    fn search_keys_skip_blank_fields() {
        let item = ResultBuilder::default()
            .build(Arc::new(dark_souls()), &IconStore)
            .expect("item");
        let texts: Vec<_> = item.keys.iter().map(|k| k.text.as_str()).collect();
        assert_eq!(texts, ["Dark Souls", "Prepare to die"]);
        assert!(item.keys.iter().all(|k| k.weight == 100));

        let settings = SearchSettings {
            include_description: false,
            ..SearchSettings::default()
        };
        let item = ResultBuilder::from(&settings)
            .build(Arc::new(dark_souls()), &IconStore)
            .expect("item");
        assert_eq!(item.keys, vec![SearchKey::new("Dark Souls")]);
    }

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let record = GameRecord {
            id: "b".to_string(),
            notes: Some("boss fight tips".to_string()),
            ..GameRecord::default()
        };
        let item = ResultBuilder::default()
            .build(Arc::new(record), &IconStore)
            .expect("item");
        assert_eq!(item.name(), "");
        assert_eq!(item.keys[0], SearchKey::new(""));
        assert_eq!(item.keys[1], SearchKey::new("boss fight tips"));
        assert_eq!(item.platforms, "");
        assert_eq!(item.playtime, "0h0min");
        assert_eq!(item.install_status, "not installed");
        assert!(item.icon.is_none());
    }

    #[test]
    fn icon_failures_only_drop_the_icon() {
        for token in ["broken", "relative", "   "] {
            let record = GameRecord {
                icon: Some(token.to_string()),
                ..dark_souls()
            };
            let item = ResultBuilder::default()
                .build(Arc::new(record), &IconStore)
                .expect("item survives icon failure");
            assert!(item.icon.is_none(), "icon kept for {token:?}");
            assert_eq!(item.playtime, "2h5min");
        }
    }

    #[test]
    fn records_without_identity_fail() {
        let record = GameRecord {
            id: "  ".to_string(),
            ..dark_souls()
        };
        let err = ResultBuilder::default()
            .build(Arc::new(record), &IconStore)
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingIdentity {
                name: "Dark Souls".to_string()
            }
        );
    }
}
