use serde::{Deserialize, Serialize};
use std::fmt;

/// Maturity label derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaturityLevel {
    Novice,
    Intermediate,
    Proficient,
    Advanced,
}

impl MaturityLevel {
    /// Lower bounds are inclusive, checked from the top down.
    pub fn classify(overall: u8) -> Self {
        match overall {
            80.. => Self::Advanced,
            60..=79 => Self::Proficient,
            40..=59 => Self::Intermediate,
            _ => Self::Novice,
        }
    }

    pub fn ordered() -> [Self; 4] {
        [
            Self::Novice,
            Self::Intermediate,
            Self::Proficient,
            Self::Advanced,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Novice => "Novice",
            Self::Intermediate => "Intermediate",
            Self::Proficient => "Proficient",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour band used by chart and heatmap renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Unscored,
    Weak,
    Moderate,
    Strong,
}

impl ScoreBand {
    pub fn for_score(score: Option<u8>) -> Self {
        match score {
            None => Self::Unscored,
            Some(75..) => Self::Strong,
            Some(50..=74) => Self::Moderate,
            Some(_) => Self::Weak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unscored => "Not answered",
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
        }
    }
}
