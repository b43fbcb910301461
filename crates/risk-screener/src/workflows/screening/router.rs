use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::location::{GeocodingGateway, PlacesGateway};
use super::recorder::AssessmentStore;
use super::report::{questionnaire_view, RuleView};
use super::scoring::RULE_TABLE_VERSION;
use super::service::{ScreeningService, ScreeningSubmission};

/// Router builder exposing the questionnaire and assessment endpoints.
pub fn screening_router<G, P, S>(service: Arc<ScreeningService<G, P, S>>) -> Router
where
    G: GeocodingGateway + 'static,
    P: PlacesGateway + 'static,
    S: AssessmentStore + 'static,
{
    Router::new()
        .route("/api/v1/screening/questionnaire", get(questionnaire_handler))
        .route("/api/v1/screening/rules", get(rules_handler::<G, P, S>))
        .route(
            "/api/v1/screening/assessments",
            post(assessment_handler::<G, P, S>),
        )
        .with_state(service)
}

pub(crate) async fn questionnaire_handler() -> Response {
    (StatusCode::OK, Json(json!({ "questions": questionnaire_view() }))).into_response()
}

pub(crate) async fn rules_handler<G, P, S>(
    State(service): State<Arc<ScreeningService<G, P, S>>>,
) -> Response
where
    G: GeocodingGateway + 'static,
    P: PlacesGateway + 'static,
    S: AssessmentStore + 'static,
{
    let rules: Vec<RuleView> = service.engine().rules().iter().map(RuleView::from).collect();
    let payload = json!({
        "version": RULE_TABLE_VERSION,
        "rules": rules,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn assessment_handler<G, P, S>(
    State(service): State<Arc<ScreeningService<G, P, S>>>,
    Json(submission): Json<ScreeningSubmission>,
) -> Response
where
    G: GeocodingGateway + 'static,
    P: PlacesGateway + 'static,
    S: AssessmentStore + 'static,
{
    // The recording ticket is dropped; the write finishes on its own.
    let outcome = service.assess(submission).await;
    (StatusCode::OK, Json(outcome.report)).into_response()
}
