use crate::{config::SearchSettings, models::GameRecord};

/// Which record fields take part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// Match against descriptions in addition to names and notes.
    pub include_description: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            include_description: true,
        }
    }
}

impl From<&SearchSettings> for MatchPolicy {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            include_description: settings.include_description,
        }
    }
}

impl MatchPolicy {
    /// Fields enabled by this policy, in match order.
    pub fn fields<'a>(&self, record: &'a GameRecord) -> impl Iterator<Item = &'a str> {
        let description = if self.include_description {
            record.description.as_deref()
        } else {
            None
        };
        [record.name.as_deref(), record.notes.as_deref(), description]
            .into_iter()
            .flatten()
    }
}

/// Whether any enabled field of `record` contains `term`, ignoring case.
pub fn matches(record: &GameRecord, term: &str, policy: MatchPolicy) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return false;
    }

    policy
        .fields(record)
        .filter(|value| !value.is_empty())
        .any(|value| value.to_lowercase().contains(&needle))
}
