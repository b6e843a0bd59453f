use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::controllers::route_controller::RouteController;
use crate::dto::booking_dto::{AvailabilityQuery, AvailabilityResponse};
use crate::dto::route_dto::{
    CreateRouteRequest, DriverRouteResponse, DriverSummary, RouteResponse, UpdateRouteRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::{auth_middleware, route_manager_middleware};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `/api/routes`: reads are public, writes need a coordinator or admin
pub fn create_route_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_routes))
        .route("/:id", get(get_route))
        .route("/:id/availability", get(route_availability));

    let managed = Router::new()
        .route("/", post(create_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
        .route_layer(from_fn(route_manager_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware));

    public.merge(managed)
}

/// `/api/driver`
pub fn create_driver_router() -> Router<AppState> {
    Router::new().route("/my-route/:driver_id", get(driver_route))
}

/// `/api/drivers`
pub fn create_drivers_router() -> Router<AppState> {
    Router::new().route("/", get(list_drivers))
}

async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.get_by_id(&id).await?;
    Ok(Json(response))
}

async fn route_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.availability(&id, &query.time).await?;
    Ok(Json(response))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RouteResponse>>), AppError> {
    let controller = RouteController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.delete(&id).await?;
    Ok(Json(response))
}

async fn driver_route(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Json<Option<DriverRouteResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.driver_route(&driver_id).await?;
    Ok(Json(response))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<DriverSummary>>, AppError> {
    let drivers = state.auth.list_drivers().await?;
    Ok(Json(drivers.into_iter().map(DriverSummary::from).collect()))
}
