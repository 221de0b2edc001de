use super::answers::RawAnswer;
use super::level::{MaturityLevel, ScoreBand};
use super::report::HeatmapEntry;
use serde::Serialize;

/// Outcome for a single question, scored or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResult {
    pub id: String,
    pub text: String,
    pub raw_answer: Option<RawAnswer>,
    pub item_score: Option<u8>,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
    #[serde(skip)]
    pub(crate) exact_score: Option<f64>,
}

impl ItemResult {
    /// Unrounded score used for aggregation.
    pub fn exact_score(&self) -> Option<f64> {
        self.exact_score
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.item_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainResult {
    pub id: String,
    pub title: String,
    /// `None` when nothing in the domain was scored; never reported as 0.
    pub score: Option<u8>,
    pub weight: f64,
    pub items: Vec<ItemResult>,
    #[serde(skip)]
    pub(crate) exact_score: Option<f64>,
}

impl DomainResult {
    pub fn exact_score(&self) -> Option<f64> {
        self.exact_score
    }

    pub fn scored_items(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.item_score.is_some())
            .count()
    }
}

/// Everything a renderer needs for the result page and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    /// 0 when no domain produced a score; see [`ScanResult::has_data`].
    pub overall: u8,
    pub level: MaturityLevel,
    pub domains: Vec<DomainResult>,
    pub heatmap: Vec<HeatmapEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

impl ScanResult {
    /// Distinguishes a genuine overall of 0 from "nothing answered".
    pub fn has_data(&self) -> bool {
        self.domains.iter().any(|domain| domain.score.is_some())
    }

    pub fn domain(&self, id: &str) -> Option<&DomainResult> {
        self.domains.iter().find(|domain| domain.id == id)
    }

    pub fn item(&self, question_id: &str) -> Option<&ItemResult> {
        self.domains
            .iter()
            .flat_map(|domain| domain.items.iter())
            .find(|item| item.id == question_id)
    }
}

/// Rounds an unrounded 0..=100 score for storage.
pub(crate) fn to_stored_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
