use super::config::{ScoringConfig, ScoringConfigError, DEFAULT_CONSENT_PATTERN};
use crate::scan::normalizer::Normalized;
use crate::scan::survey::Question;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static DEFAULT_CONSENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_CONSENT_PATTERN).expect("default consent pattern compiles"));

/// What a rule decided for one question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleOutcome {
    /// Recorded with weight 0, never aggregated.
    Excluded,
    Unanswered,
    /// Unrounded 0..=100.
    Scored(f64),
}

/// One entry in the precedence-ordered scoring chain.
///
/// Rules return `None` to defer to the next rule in the chain.
pub trait ScoringRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, question: &Question, answer: Normalized) -> Option<RuleOutcome>;
}

pub(crate) fn standard_rules(consent: ConsentExclusion) -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(consent),
        Box::new(MissingAnswer),
        Box::new(UnmatchedOption),
        Box::new(ExplicitScoreScale),
        Box::new(LinearValueScale),
    ]
}

/// The scale rules close the chain; custom rules go in front of them.
pub(crate) const BUILTIN_SCALE_RULES: usize = 2;

/// Consent and meta questions, matched by reserved id or disclosure text.
pub struct ConsentExclusion {
    ids: BTreeSet<String>,
    pattern: Regex,
}

impl ConsentExclusion {
    pub fn standard() -> Self {
        Self {
            ids: ScoringConfig::default()
                .consent_question_ids
                .into_iter()
                .collect(),
            pattern: DEFAULT_CONSENT_REGEX.clone(),
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self, ScoringConfigError> {
        let pattern = if config.consent_text_pattern == DEFAULT_CONSENT_PATTERN {
            DEFAULT_CONSENT_REGEX.clone()
        } else {
            Regex::new(&config.consent_text_pattern).map_err(|source| {
                ScoringConfigError::InvalidConsentPattern {
                    pattern: config.consent_text_pattern.clone(),
                    source,
                }
            })?
        };

        Ok(Self {
            ids: config.consent_question_ids.iter().cloned().collect(),
            pattern,
        })
    }

    pub fn matches(&self, question: &Question) -> bool {
        self.ids.contains(&question.id) || self.pattern.is_match(&question.text)
    }
}

impl ScoringRule for ConsentExclusion {
    fn name(&self) -> &'static str {
        "consent_exclusion"
    }

    fn evaluate(&self, question: &Question, _answer: Normalized) -> Option<RuleOutcome> {
        self.matches(question).then_some(RuleOutcome::Excluded)
    }
}

pub struct MissingAnswer;

impl ScoringRule for MissingAnswer {
    fn name(&self) -> &'static str {
        "missing_answer"
    }

    fn evaluate(&self, _question: &Question, answer: Normalized) -> Option<RuleOutcome> {
        answer.is_missing().then_some(RuleOutcome::Unanswered)
    }
}

/// Stale answers that no longer map to a configured option count as unanswered.
pub struct UnmatchedOption;

impl ScoringRule for UnmatchedOption {
    fn name(&self) -> &'static str {
        "unmatched_option"
    }

    fn evaluate(&self, question: &Question, answer: Normalized) -> Option<RuleOutcome> {
        let value = answer.value()?;
        question
            .option_for(value)
            .is_none()
            .then_some(RuleOutcome::Unanswered)
    }
}

/// Applies once any option carries an explicit `score`. Options without one
/// fall back to their value so the whole question stays on one scale.
pub struct ExplicitScoreScale;

impl ScoringRule for ExplicitScoreScale {
    fn name(&self) -> &'static str {
        "explicit_score_scale"
    }

    fn evaluate(&self, question: &Question, answer: Normalized) -> Option<RuleOutcome> {
        if !question.has_explicit_scores() {
            return None;
        }
        let score = question.option_for(answer.value()?)?.score_or_value()?;
        let (min, max) = question.score_range()?;
        Some(RuleOutcome::Scored(rescale(score, min, max)))
    }
}

/// Rescales the option value linearly between the lowest and highest value.
pub struct LinearValueScale;

impl ScoringRule for LinearValueScale {
    fn name(&self) -> &'static str {
        "linear_value_scale"
    }

    fn evaluate(&self, question: &Question, answer: Normalized) -> Option<RuleOutcome> {
        let value = answer.value()?;
        question.option_for(value)?;
        let (min, max) = question.value_range()?;
        Some(RuleOutcome::Scored(rescale(value.clamp(min, max), min, max)))
    }
}

/// Maps `value` from `[min, max]` onto `[0, 100]`. A flat range scores 0.
pub(crate) fn rescale(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    let span = if span == 0.0 { 1.0 } else { span };
    (value - min) / span * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::survey::AnswerOption;

    fn question(id: &str, text: &str, options: Vec<AnswerOption>) -> Question {
        Question {
            id: id.to_string(),
            text: text.to_string(),
            weight: None,
            options,
            explain: None,
        }
    }

    fn five_point() -> Vec<AnswerOption> {
        (1..=5).map(|value: i32| AnswerOption::new(value)).collect()
    }

    fn consent_rule() -> ConsentExclusion {
        ConsentExclusion::from_config(&ScoringConfig::default()).expect("default config")
    }

    #[test]
    fn rescale_handles_flat_ranges() {
        assert_eq!(rescale(3.0, 1.0, 5.0), 50.0);
        assert_eq!(rescale(2.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn consent_matches_reserved_id_and_disclosure_text() {
        let rule = consent_rule();
        assert!(rule.matches(&question("consent", "Akkoord?", five_point())));
        assert!(rule.matches(&question(
            "q0",
            "Ik geef TOESTEMMING voor het gebruik van mijn gegevens.",
            five_point()
        )));
        assert!(rule.matches(&question(
            "q0",
            "I consent to the use of my data for research.",
            five_point()
        )));
        assert!(!rule.matches(&question(
            "b3",
            "Ik let op privacy bij het invoeren van gegevens.",
            five_point()
        )));
    }

    #[test]
    fn invalid_consent_pattern_is_reported() {
        let config = ScoringConfig {
            consent_text_pattern: "(unclosed".to_string(),
            ..ScoringConfig::default()
        };
        let err = ConsentExclusion::from_config(&config).err().expect("pattern rejected");
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn unmatched_option_defers_when_option_exists() {
        let q = question("q1", "", five_point());
        assert_eq!(UnmatchedOption.evaluate(&q, Normalized::Value(3.0)), None);
        assert_eq!(
            UnmatchedOption.evaluate(&q, Normalized::Value(9.0)),
            Some(RuleOutcome::Unanswered)
        );
        assert_eq!(UnmatchedOption.evaluate(&q, Normalized::Missing), None);
    }

    #[test]
    fn explicit_score_falls_back_to_value_on_unscored_option() {
        let q = question(
            "q1",
            "",
            vec![
                AnswerOption::new(1).with_score(0.0),
                AnswerOption::new(2),
                AnswerOption::new(3).with_score(10.0),
            ],
        );
        assert_eq!(
            ExplicitScoreScale.evaluate(&q, Normalized::Value(2.0)),
            Some(RuleOutcome::Scored(20.0))
        );
        assert_eq!(
            ExplicitScoreScale.evaluate(&q, Normalized::Value(3.0)),
            Some(RuleOutcome::Scored(100.0))
        );
    }

    #[test]
    fn explicit_score_defers_when_no_option_is_scored() {
        let q = question("q1", "", five_point());
        assert_eq!(ExplicitScoreScale.evaluate(&q, Normalized::Value(2.0)), None);
    }

    #[test]
    fn linear_scale_interpolates_values() {
        let q = question("q1", "", five_point());
        assert_eq!(
            LinearValueScale.evaluate(&q, Normalized::Value(1.0)),
            Some(RuleOutcome::Scored(0.0))
        );
        assert_eq!(
            LinearValueScale.evaluate(&q, Normalized::Value(4.0)),
            Some(RuleOutcome::Scored(75.0))
        );
    }
}
