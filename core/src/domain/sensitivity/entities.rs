use serde::{Deserialize, Serialize};

/// User id that never has a profile.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Sensitivities as the profile store hands them back: either one
/// comma-separated string or a list of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSensitivities {
    Delimited(String),
    Items(Vec<String>),
}

impl RawSensitivities {
    /// Canonical form: trimmed, non-empty labels in stored order.
    pub fn into_labels(self) -> Vec<String> {
        let labels: Vec<String> = match self {
            RawSensitivities::Delimited(raw) => raw.split(',').map(str::to_string).collect(),
            RawSensitivities::Items(items) => items,
        };

        labels
            .into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect()
    }
}

pub fn is_anonymous(user_id: &str) -> bool {
    let user_id = user_id.trim();
    user_id.is_empty() || user_id == ANONYMOUS_USER
}
