use crate::infra::{export_file_name, AppState, ScanState};
use ai_scan::error::AppError;
use ai_scan::scan::{
    AnswerSheet, DomainRecommendation, ScanResult, ScoreOptions, SurveyDefinition, WeakSpot,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const DEFAULT_WEAK_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) answers: AnswerSheet,
    /// Score against this survey instead of the configured one.
    #[serde(default)]
    pub(crate) survey: Option<SurveyDefinition>,
    #[serde(default)]
    pub(crate) export_csv: bool,
    #[serde(default = "default_weak_limit")]
    pub(crate) weak_limit: usize,
}

fn default_weak_limit() -> usize {
    DEFAULT_WEAK_LIMIT
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) has_data: bool,
    #[serde(flatten)]
    pub(crate) result: ScanResult,
    pub(crate) weakest_items: Vec<WeakSpot>,
    pub(crate) recommendations: Vec<DomainRecommendation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportRequest {
    pub(crate) answers: AnswerSheet,
    #[serde(default)]
    pub(crate) survey: Option<SurveyDefinition>,
}

pub(crate) fn scan_router(scan: ScanState) -> Router {
    Router::new()
        .route("/api/v1/scan/survey", get(survey_endpoint))
        .route("/api/v1/scan/score", post(score_endpoint))
        .route("/api/v1/scan/export", post(export_endpoint))
        .layer(Extension(scan))
}

pub(crate) fn with_scan_routes(scan: ScanState) -> Router {
    scan_router(scan)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn survey_endpoint(
    Extension(scan): Extension<ScanState>,
) -> Json<Arc<SurveyDefinition>> {
    Json(scan.survey.clone())
}

pub(crate) async fn score_endpoint(
    Extension(scan): Extension<ScanState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let ScoreRequest {
        answers,
        survey,
        export_csv,
        weak_limit,
    } = payload;

    let survey = resolve_survey(&scan, survey)?;
    let result = scan
        .scorer
        .score_with_options(&survey, &answers, ScoreOptions { export_csv })?;

    Ok(Json(ScoreResponse {
        has_data: result.has_data(),
        weakest_items: result.weakest_items(weak_limit),
        recommendations: result.recommendations(),
        result,
    }))
}

pub(crate) async fn export_endpoint(
    Extension(scan): Extension<ScanState>,
    Json(payload): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let survey = resolve_survey(&scan, payload.survey)?;
    let csv = scan.scorer.score(&survey, &payload.answers).to_csv()?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Local::now().date_naive())
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

fn resolve_survey(
    scan: &ScanState,
    inline: Option<SurveyDefinition>,
) -> Result<Arc<SurveyDefinition>, AppError> {
    match inline {
        Some(survey) => {
            survey.validate()?;
            Ok(Arc::new(survey))
        }
        None => Ok(scan.survey.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn answers() -> AnswerSheet {
        [("k1", 5), ("k2", 3), ("g1", 2)].into_iter().collect()
    }

    #[tokio::test]
    async fn score_endpoint_returns_result_and_insights() {
        let request = ScoreRequest {
            answers: answers(),
            survey: None,
            export_csv: false,
            weak_limit: 2,
        };

        let Json(body) = score_endpoint(Extension(ScanState::bundled()), Json(request))
            .await
            .expect("scan scores");

        assert!(body.has_data);
        assert_eq!(body.result.domains.len(), 3);
        assert_eq!(body.weakest_items.len(), 2);
        assert_eq!(body.weakest_items[0].item_id, "g1");
        assert_eq!(body.recommendations.len(), 3);
        assert!(body.result.csv.is_none());
    }

    #[tokio::test]
    async fn score_endpoint_rejects_inline_survey_with_duplicate_ids() {
        let mut survey = SurveyDefinition::from_json_str(
            r#"{"domains": [{"id": "d1", "title": "A", "questions": []}]}"#,
        )
        .expect("survey parses");
        let question: ai_scan::scan::Question = serde_json::from_value(json!({
            "id": "q1", "text": "x", "options": [{"value": 1}, {"value": 2}]
        }))
        .expect("question parses");
        survey.domains[0].questions = vec![question.clone(), question];

        let request = ScoreRequest {
            answers: AnswerSheet::new(),
            survey: Some(survey),
            export_csv: true,
            weak_limit: DEFAULT_WEAK_LIMIT,
        };

        let err = score_endpoint(Extension(ScanState::bundled()), Json(request))
            .await
            .err()
            .expect("duplicate ids rejected");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn router_serves_score_and_export() {
        let app = scan_router(ScanState::bundled());

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/scan/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "answers": { "k1": "5" }, "export_csv": true }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["overall"], 100);
        assert_eq!(body["level"], "Advanced");
        assert_eq!(body["has_data"], true);
        assert!(body["csv"]
            .as_str()
            .expect("csv included")
            .starts_with("Domain;Question ID;"));

        let response = app
            .oneshot(
                Request::post("/api/v1/scan/export")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "answers": {} }).to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let csv = String::from_utf8(bytes.to_vec()).expect("utf-8 csv");
        assert_eq!(csv.lines().count(), 11);
    }

    #[tokio::test]
    async fn survey_endpoint_exposes_configured_survey() {
        let Json(survey) = survey_endpoint(Extension(ScanState::bundled())).await;
        assert_eq!(survey.domains[0].id, "kennis");
    }
}
