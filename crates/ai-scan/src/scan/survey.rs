use super::answers::RawAnswer;
use super::normalizer::{normalize, Normalized};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

const BUNDLED_SURVEY: &str = include_str!("../../data/survey_nl.json");

#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("failed to read survey from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid survey JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question id '{question_id}' is used in both '{first_domain}' and '{second_domain}'")]
    DuplicateQuestion {
        question_id: String,
        first_domain: String,
        second_domain: String,
    },
}

/// The static question tree a scan runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    pub domains: Vec<Domain>,
}

impl SurveyDefinition {
    /// Dutch AI maturity survey shipped with the crate.
    pub fn bundled() -> Result<Self, SurveyError> {
        Self::from_json_str(BUNDLED_SURVEY)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SurveyError> {
        let survey: Self = serde_json::from_reader(reader)?;
        survey.validate()?;
        Ok(survey)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SurveyError> {
        let survey: Self = serde_json::from_str(raw)?;
        survey.validate()?;
        Ok(survey)
    }

    /// Question ids key the answer map, so they must be unique survey-wide.
    /// Option-level smells are only logged; scoring copes with them.
    pub fn validate(&self) -> Result<(), SurveyError> {
        let mut owners: HashMap<&str, &str> = HashMap::new();

        for domain in &self.domains {
            for question in &domain.questions {
                if let Some(first_domain) = owners.insert(&question.id, &domain.id) {
                    return Err(SurveyError::DuplicateQuestion {
                        question_id: question.id.clone(),
                        first_domain: first_domain.to_string(),
                        second_domain: domain.id.clone(),
                    });
                }
                question.warn_on_option_smells(&domain.id);
            }
        }

        Ok(())
    }

    pub fn question_count(&self) -> usize {
        self.domains.iter().map(|domain| domain.questions.len()).sum()
    }

    pub fn find_question(&self, question_id: &str) -> Option<(&Domain, &Question)> {
        self.domains.iter().find_map(|domain| {
            domain
                .questions
                .iter()
                .find(|question| question.id == question_id)
                .map(|question| (domain, question))
        })
    }
}

/// A themed group of questions that yields one domain score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Domain {
    pub fn effective_weight(&self) -> f64 {
        effective_weight(self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
}

impl Question {
    pub fn effective_weight(&self) -> f64 {
        effective_weight(self.weight)
    }

    /// The option whose normalized value equals the answer.
    pub fn option_for(&self, answer: f64) -> Option<&AnswerOption> {
        self.options
            .iter()
            .find(|option| option.numeric_value() == Some(answer))
    }

    pub fn has_explicit_scores(&self) -> bool {
        self.options.iter().any(|option| option.score.is_some())
    }

    /// Min and max over the options' numeric values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        min_max(self.options.iter().filter_map(AnswerOption::numeric_value))
    }

    /// Min and max over the options' explicit scores, falling back to the
    /// option value where a score is absent.
    pub fn score_range(&self) -> Option<(f64, f64)> {
        min_max(self.options.iter().filter_map(AnswerOption::score_or_value))
    }

    fn warn_on_option_smells(&self, domain_id: &str) {
        let mut seen = HashSet::new();
        for option in &self.options {
            if let Some(value) = option.numeric_value() {
                if !seen.insert(value.to_bits()) {
                    warn!(domain = domain_id, question = %self.id, value, "duplicate option value");
                }
            }
        }

        let with_score = self.options.iter().filter(|option| option.score.is_some()).count();
        if with_score > 0 && with_score < self.options.len() {
            warn!(
                domain = domain_id,
                question = %self.id,
                with_score,
                options = self.options.len(),
                "explicit scores set on only some options"
            );
        }
    }
}

/// One selectable answer. Named to avoid clashing with `std::option::Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: RawAnswer,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl AnswerOption {
    pub fn new(value: impl Into<RawAnswer>) -> Self {
        Self {
            value: value.into(),
            score: None,
            label: None,
            desc: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The option value normalized the same way stored answers are.
    pub fn numeric_value(&self) -> Option<f64> {
        match normalize(Some(&self.value)) {
            Normalized::Value(value) => Some(value),
            Normalized::Missing => None,
        }
    }

    pub fn score_or_value(&self) -> Option<f64> {
        self.score.or_else(|| self.numeric_value())
    }
}

fn effective_weight(weight: Option<f64>) -> f64 {
    weight.map_or(1.0, |weight| weight.max(0.0))
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |range, value| match range {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

/// Accepts any JSON value; only finite numbers survive.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|number| number.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_survey_loads_and_is_unique() {
        let survey = SurveyDefinition::bundled().expect("bundled survey parses");
        assert!(survey.domains.len() >= 3);
        assert!(survey.question_count() >= 9);
        assert!(survey.find_question("consent").is_some());
    }

    #[test]
    fn weights_default_and_clamp() {
        let survey = SurveyDefinition::from_json_str(
            r#"{"domains": [
                {"id": "d1", "title": "A", "weight": "zwaar", "questions": [
                    {"id": "q1", "text": "x", "weight": -2, "options": []},
                    {"id": "q2", "text": "y", "weight": 2.5, "options": []},
                    {"id": "q3", "text": "z", "options": []}
                ]}
            ]}"#,
        )
        .expect("survey parses");

        let domain = &survey.domains[0];
        assert_eq!(domain.effective_weight(), 1.0);
        assert_eq!(domain.questions[0].effective_weight(), 0.0);
        assert_eq!(domain.questions[1].effective_weight(), 2.5);
        assert_eq!(domain.questions[2].effective_weight(), 1.0);
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let err = SurveyDefinition::from_json_str(
            r#"{"domains": [
                {"id": "d1", "title": "A", "questions": [{"id": "q1", "text": "x", "options": []}]},
                {"id": "d2", "title": "B", "questions": [{"id": "q1", "text": "y", "options": []}]}
            ]}"#,
        )
        .expect_err("duplicate ids");

        match err {
            SurveyError::DuplicateQuestion {
                question_id,
                first_domain,
                second_domain,
            } => {
                assert_eq!(question_id, "q1");
                assert_eq!(first_domain, "d1");
                assert_eq!(second_domain, "d2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_within_one_domain_names_that_domain_twice() {
        let err = SurveyDefinition::from_json_str(
            r#"{"domains": [
                {"id": "d1", "title": "A", "questions": [{"id": "q2", "text": "x", "options": []}]},
                {"id": "d2", "title": "B", "questions": [
                    {"id": "q1", "text": "y", "options": []},
                    {"id": "q1", "text": "z", "options": []}
                ]}
            ]}"#,
        )
        .expect_err("duplicate ids");

        assert!(matches!(
            err,
            SurveyError::DuplicateQuestion { ref question_id, ref first_domain, ref second_domain }
                if question_id == "q1" && first_domain == "d2" && second_domain == "d2"
        ));
    }

    #[test]
    fn option_values_accept_numeric_text() {
        let question = Question {
            id: "q1".to_string(),
            text: String::new(),
            weight: None,
            options: vec![
                AnswerOption::new("1"),
                AnswerOption::new(2),
                AnswerOption::new("drie"),
            ],
            explain: None,
        };

        assert!(question.option_for(1.0).is_some());
        assert!(question.option_for(2.0).is_some());
        assert_eq!(question.value_range(), Some((1.0, 2.0)));
    }

    #[test]
    fn score_range_falls_back_to_values() {
        let question = Question {
            id: "q1".to_string(),
            text: String::new(),
            weight: None,
            options: vec![
                AnswerOption::new(1).with_score(10.0),
                AnswerOption::new(2),
                AnswerOption::new(3).with_score(0.0),
            ],
            explain: None,
        };

        assert_eq!(question.score_range(), Some((0.0, 10.0)));
        assert_eq!(Question { options: Vec::new(), ..question }.score_range(), None);
    }
}
