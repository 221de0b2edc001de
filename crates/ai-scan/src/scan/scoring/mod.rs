mod aggregate;
mod config;
mod rules;

pub use config::{ScoringConfig, ScoringConfigError, DEFAULT_CONSENT_PATTERN};
pub use rules::{
    ConsentExclusion, ExplicitScoreScale, LinearValueScale, MissingAnswer, RuleOutcome,
    ScoringRule, UnmatchedOption,
};

use super::answers::AnswerSheet;
use super::level::MaturityLevel;
use super::normalizer::{normalize, Normalized};
use super::report::{self, ExportError};
use super::result::{to_stored_score, DomainResult, ItemResult, ScanResult};
use super::survey::{Domain, Question, SurveyDefinition};
use tracing::debug;

/// Switches for derived outputs that cost extra work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreOptions {
    pub export_csv: bool,
}

/// Turns a survey and an answer sheet into a [`ScanResult`].
///
/// Holds no state besides its rule chain, so one instance can be shared
/// across threads and re-run on every answer change.
pub struct ScanScorer {
    rules: Vec<Box<dyn ScoringRule>>,
}

impl ScanScorer {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringConfigError> {
        Ok(Self {
            rules: rules::standard_rules(ConsentExclusion::from_config(config)?),
        })
    }

    pub fn standard() -> Self {
        Self {
            rules: rules::standard_rules(ConsentExclusion::standard()),
        }
    }

    /// Insert a rule after the consent and availability checks, ahead of
    /// the built-in scale rules. Later calls land after earlier ones.
    pub fn with_rule(mut self, rule: impl ScoringRule + 'static) -> Self {
        let custom = self.rules.len() - rules::BUILTIN_SCALE_RULES;
        self.rules.insert(custom, Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// First rule with an opinion wins; an empty verdict counts as unanswered.
    pub fn evaluate(&self, question: &Question, answer: Normalized) -> RuleOutcome {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(question, answer))
            .unwrap_or(RuleOutcome::Unanswered)
    }

    /// Unrounded 0..=100 item score, `None` when unanswered or excluded.
    pub fn score_item(&self, question: &Question, answer: Normalized) -> Option<f64> {
        match self.evaluate(question, answer) {
            RuleOutcome::Scored(score) => Some(score),
            RuleOutcome::Excluded | RuleOutcome::Unanswered => None,
        }
    }

    pub fn score_domain(&self, domain: &Domain, answers: &AnswerSheet) -> DomainResult {
        let items: Vec<ItemResult> = domain
            .questions
            .iter()
            .map(|question| self.item_result(question, answers))
            .collect();

        let exact_score = aggregate::weighted_mean(
            items
                .iter()
                .filter_map(|item| item.exact_score.map(|score| (score, item.weight))),
        );

        debug!(
            domain = %domain.id,
            questions = items.len(),
            scored = items.iter().filter(|item| item.exact_score.is_some()).count(),
            score = ?exact_score,
            "domain aggregated"
        );

        DomainResult {
            id: domain.id.clone(),
            title: domain.title.clone(),
            score: exact_score.map(to_stored_score),
            weight: domain.effective_weight(),
            items,
            exact_score,
        }
    }

    pub fn score(&self, survey: &SurveyDefinition, answers: &AnswerSheet) -> ScanResult {
        let domains: Vec<DomainResult> = survey
            .domains
            .iter()
            .map(|domain| self.score_domain(domain, answers))
            .collect();

        let overall = score_overall(&domains);
        let level = MaturityLevel::classify(overall);
        debug!(overall, level = %level, answers = answers.len(), "scan scored");

        let heatmap = report::heatmap(&domains);

        ScanResult {
            overall,
            level,
            domains,
            heatmap,
            csv: None,
        }
    }

    pub fn score_with_options(
        &self,
        survey: &SurveyDefinition,
        answers: &AnswerSheet,
        options: ScoreOptions,
    ) -> Result<ScanResult, ExportError> {
        let mut result = self.score(survey, answers);
        if options.export_csv {
            result.csv = Some(report::to_csv(&result.domains)?);
        }
        Ok(result)
    }

    fn item_result(&self, question: &Question, answers: &AnswerSheet) -> ItemResult {
        let raw_answer = answers.get(&question.id).cloned();
        let outcome = self.evaluate(question, normalize(raw_answer.as_ref()));

        let (exact_score, weight) = match outcome {
            RuleOutcome::Excluded => (None, 0.0),
            RuleOutcome::Unanswered => (None, question.effective_weight()),
            RuleOutcome::Scored(score) => (Some(score), question.effective_weight()),
        };

        ItemResult {
            id: question.id.clone(),
            text: question.text.clone(),
            raw_answer,
            item_score: exact_score.map(to_stored_score),
            weight,
            explain: question.explain.clone(),
            exact_score,
        }
    }
}

impl Default for ScanScorer {
    fn default() -> Self {
        Self::standard()
    }
}

/// Weighted mean of the scored domains, rounded. 0 when no domain scored.
pub fn score_overall(domains: &[DomainResult]) -> u8 {
    aggregate::overall_exact(domains).map_or(0, to_stored_score)
}
