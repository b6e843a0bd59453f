pub mod auth_routes;
pub mod booking_routes;
pub mod dashboard_routes;
pub mod shuttle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Build the full HTTP application
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_routes::auth_routes())
        .merge(dashboard_routes::create_dashboard_router(state.clone()))
        .nest("/routes", shuttle_routes::create_route_router(state.clone()))
        .nest("/driver", shuttle_routes::create_driver_router())
        .nest("/drivers", shuttle_routes::create_drivers_router())
        .nest("/bookings", booking_routes::create_booking_router(state.clone()));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(cors_layer(&state.config))
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "shuttle_booking",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
