use crate::scan::result::DomainResult;
use serde::Serialize;

/// An answered item that scored low, for the "work on this first" list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakSpot {
    pub domain_title: String,
    pub item_id: String,
    pub text: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainAdvice {
    NoAnswers,
    Training,
    ShareBestPractices,
    Deepen,
}

impl DomainAdvice {
    pub fn for_score(score: Option<u8>) -> Self {
        match score {
            None => Self::NoAnswers,
            Some(score) if score < 50 => Self::Training,
            Some(score) if score < 70 => Self::ShareBestPractices,
            Some(_) => Self::Deepen,
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::NoAnswers => "No answers in this domain yet.",
            Self::Training => "Plan a short hands-on training and set up concrete rubrics.",
            Self::ShareBestPractices => {
                "Spread best practices and organise peer review within the team."
            }
            Self::Deepen => "Go deeper with advanced use cases and share examples across the programme.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRecommendation {
    pub domain_id: String,
    pub domain_title: String,
    pub score: Option<u8>,
    pub advice: DomainAdvice,
    pub action: &'static str,
}

/// Lowest scoring answered items, weakest first. Unanswered items are skipped.
pub fn weakest_items(domains: &[DomainResult], limit: usize) -> Vec<WeakSpot> {
    let mut answered: Vec<WeakSpot> = domains
        .iter()
        .flat_map(|domain| {
            domain.items.iter().filter_map(move |item| {
                item.item_score.map(|score| WeakSpot {
                    domain_title: domain.title.clone(),
                    item_id: item.id.clone(),
                    text: item.text.clone(),
                    score,
                    explain: item.explain.clone(),
                })
            })
        })
        .collect();

    answered.sort_by_key(|spot| spot.score);
    answered.truncate(limit);
    answered
}

pub fn recommendations(domains: &[DomainResult]) -> Vec<DomainRecommendation> {
    domains
        .iter()
        .map(|domain| {
            let advice = DomainAdvice::for_score(domain.score);
            DomainRecommendation {
                domain_id: domain.id.clone(),
                domain_title: domain.title.clone(),
                score: domain.score,
                advice,
                action: advice.action(),
            }
        })
        .collect()
}
