use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::dto::route_dto::{CreateRouteRequest, DriverRouteResponse, RouteResponse, UpdateRouteRequest};
use crate::dto::ApiResponse;
use crate::models::{Route, DEFAULT_CAPACITY};
use crate::repositories::RouteStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct RouteController {
    routes: Arc<dyn RouteStore>,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            routes: state.routes.clone(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<RouteResponse>> {
        let routes = self.routes.list().await?;
        Ok(routes.into_iter().map(RouteResponse::from).collect())
    }

    pub async fn get_by_id(&self, route_id: &str) -> AppResult<RouteResponse> {
        let route = self
            .routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", route_id))?;

        Ok(route.into())
    }

    pub async fn create(&self, request: CreateRouteRequest) -> AppResult<ApiResponse<RouteResponse>> {
        request.validate()?;

        let route_id = request
            .route_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("R{}", Utc::now().timestamp_millis()));

        let mut route = Route::new(
            route_id,
            request.from.trim(),
            request.to.trim(),
            request.departure.trim(),
        )
        .with_capacity(request.capacity.unwrap_or(DEFAULT_CAPACITY));

        if let Some(driver_id) = request.driver_id {
            route = route.with_driver(driver_id.trim());
        }

        let created = self.routes.create(route).await?;
        info!(
            "🚌 Route {} created: {} -> {} ({} seats)",
            created.route_id, created.from, created.to, created.capacity
        );

        Ok(ApiResponse::success_with_message(
            created.into(),
            "Route created",
        ))
    }

    pub async fn update(
        &self,
        route_id: &str,
        request: UpdateRouteRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        request.validate()?;

        let updated = self
            .routes
            .update(route_id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Route", route_id))?;

        info!("✏️ Route {} updated", updated.route_id);
        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Route updated",
        ))
    }

    pub async fn delete(&self, route_id: &str) -> AppResult<ApiResponse<()>> {
        if !self.routes.delete(route_id).await? {
            return Err(not_found_error("Route", route_id));
        }

        info!("🗑️ Route {} deleted", route_id);
        Ok(ApiResponse::message("Route deleted"))
    }

    /// First route assigned to the driver, if any
    pub async fn driver_route(&self, driver_id: &str) -> AppResult<Option<DriverRouteResponse>> {
        let route = self.routes.find_by_driver(driver_id).await?;
        Ok(route.map(DriverRouteResponse::from))
    }
}
