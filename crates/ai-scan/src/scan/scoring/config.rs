use serde::{Deserialize, Serialize};

/// Matches a data-usage consent disclosure, Dutch or English.
pub const DEFAULT_CONSENT_PATTERN: &str =
    r"(?i)\b(toestemming|consent)\b.*\b(gegevens|data|antwoorden|answers)\b";

/// Rules for recognising consent/meta questions that must never be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub consent_question_ids: Vec<String>,
    pub consent_text_pattern: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            consent_question_ids: vec!["consent".to_string(), "toestemming".to_string()],
            consent_text_pattern: DEFAULT_CONSENT_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("consent text pattern '{pattern}' is not a valid regex: {source}")]
    InvalidConsentPattern {
        pattern: String,
        source: regex::Error,
    },
}
