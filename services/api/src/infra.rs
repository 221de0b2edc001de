use ai_scan::config::ScanConfig;
use ai_scan::error::AppError;
use ai_scan::scan::{AnswerSheet, ScanScorer, SurveyDefinition};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Survey and scorer shared by every scan request.
#[derive(Clone)]
pub(crate) struct ScanState {
    pub(crate) survey: Arc<SurveyDefinition>,
    pub(crate) scorer: Arc<ScanScorer>,
}

impl ScanState {
    pub(crate) fn from_config(config: &ScanConfig) -> Result<Self, AppError> {
        Ok(Self {
            survey: Arc::new(load_survey(config.survey_path.as_deref())?),
            scorer: Arc::new(ScanScorer::new(&config.scoring)?),
        })
    }

    #[cfg(test)]
    pub(crate) fn bundled() -> Self {
        Self {
            survey: Arc::new(SurveyDefinition::bundled().expect("bundled survey parses")),
            scorer: Arc::new(ScanScorer::standard()),
        }
    }
}

pub(crate) fn load_survey(path: Option<&Path>) -> Result<SurveyDefinition, AppError> {
    let survey = match path {
        Some(path) => SurveyDefinition::from_path(path)?,
        None => SurveyDefinition::bundled()?,
    };

    info!(
        source = %path.map_or_else(|| "bundled".to_string(), |path| path.display().to_string()),
        domains = survey.domains.len(),
        questions = survey.question_count(),
        "survey loaded"
    );

    Ok(survey)
}

pub(crate) fn load_answers(path: &Path) -> Result<AnswerSheet, AppError> {
    let file = std::fs::File::open(path)?;
    Ok(AnswerSheet::from_reader(file)?)
}

/// File name offered for CSV downloads, stamped with the export date.
pub(crate) fn export_file_name(date: NaiveDate) -> String {
    format!("ai-scan-export_{}.csv", date.format("%Y-%m-%d"))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
        assert_eq!(export_file_name(date), "ai-scan-export_2025-03-07.csv");
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date(" 2025-03-07 ").is_ok());
        assert!(parse_date("07-03-2025").is_err());
    }

    #[test]
    fn missing_survey_file_is_reported() {
        let err = load_survey(Some(Path::new("does/not/exist.json"))).expect_err("missing file");
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
