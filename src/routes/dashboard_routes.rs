use axum::{
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::incident_dto::ReportIncidentRequest;
use crate::dto::ApiResponse;
use crate::middleware::{auth_middleware, incident_reporter_middleware, AuthenticatedUser};
use crate::models::{DashboardSummary, Incident};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router(state: AppState) -> Router<AppState> {
    let incidents = Router::new()
        .route("/incidents", post(report_incident))
        .route_layer(from_fn(incident_reporter_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/dashboard-summary", get(dashboard_summary))
        .merge(incidents)
}

async fn dashboard_summary(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let controller = DashboardController::new(&state);
    let response = controller.summary().await?;
    Ok(Json(response))
}

async fn report_incident(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ReportIncidentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Incident>>), AppError> {
    let controller = DashboardController::new(&state);
    let response = controller.report_incident(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
