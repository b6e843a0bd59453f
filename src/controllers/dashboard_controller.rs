use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::incident_dto::ReportIncidentRequest;
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::{DashboardSummary, Incident};
use crate::repositories::{DashboardStore, IncidentStore, RouteStore};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct DashboardController {
    routes: Arc<dyn RouteStore>,
    incidents: Arc<dyn IncidentStore>,
    dashboard: Arc<dyn DashboardStore>,
}

impl DashboardController {
    pub fn new(state: &AppState) -> Self {
        Self {
            routes: state.routes.clone(),
            incidents: state.incidents.clone(),
            dashboard: state.dashboard.clone(),
        }
    }

    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        Ok(self.dashboard.summary().await?)
    }

    pub async fn report_incident(
        &self,
        reporter: &AuthenticatedUser,
        request: ReportIncidentRequest,
    ) -> AppResult<ApiResponse<Incident>> {
        request.validate()?;

        let route_id = request.route_id.trim();
        if self.routes.find_by_id(route_id).await?.is_none() {
            return Err(AppError::InvalidRoute(format!("Route {} does not exist", route_id)));
        }

        let incident = self
            .incidents
            .create(Incident::new(
                route_id,
                request.description.trim(),
                reporter.user_id.as_str(),
            ))
            .await?;

        info!(
            "⚠️ Incident {} reported on {} by {}",
            incident.id, incident.route_id, incident.reported_by
        );

        Ok(ApiResponse::success_with_message(incident, "Incident reported"))
    }
}
