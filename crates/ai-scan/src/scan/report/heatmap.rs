use crate::scan::level::ScoreBand;
use crate::scan::result::DomainResult;
use serde::Serialize;

/// One question in the flat, weakest-first heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapEntry {
    pub domain_id: String,
    pub domain_title: String,
    pub item_id: String,
    pub text: String,
    pub item_score: Option<u8>,
    pub weight: f64,
    pub band: ScoreBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
}

/// Every item across every domain, unanswered first, then ascending score.
pub fn heatmap(domains: &[DomainResult]) -> Vec<HeatmapEntry> {
    let mut entries: Vec<HeatmapEntry> = domains
        .iter()
        .flat_map(|domain| {
            domain.items.iter().map(move |item| HeatmapEntry {
                domain_id: domain.id.clone(),
                domain_title: domain.title.clone(),
                item_id: item.id.clone(),
                text: item.text.clone(),
                item_score: item.item_score,
                weight: item.weight,
                band: item.band(),
                explain: item.explain.clone(),
            })
        })
        .collect();

    // `None < Some(_)`, so unanswered items sort to the top.
    entries.sort_by_key(|entry| entry.item_score);
    entries
}
