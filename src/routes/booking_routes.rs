use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use http::HeaderName;
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingCreatedResponse, BookingFilters, BookingResponse, CancelBookingResponse,
    CreateBookingRequest,
};
use crate::middleware::{optional_auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};

pub const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:id", get(get_booking))
        .route("/:id", delete(cancel_booking))
        .route_layer(from_fn_with_state(state, optional_auth_middleware))
}

fn request_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    headers
        .get(IDEMPOTENCY_KEY)
        .map(|value| {
            value
                .to_str()
                .map(str::to_string)
                .map_err(|_| validation_error("Idempotency-Key", "Invalid idempotency key"))
        })
        .transpose()
}

async fn create_booking(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    headers: HeaderMap,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), AppError> {
    let token = request_token(&headers)?;
    let controller = BookingController::new(&state);
    let response = controller
        .create(request, user.map(|Extension(u)| u), token)
        .await?;

    let status = if response.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(response)))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.list_by_student(&filters.student_id).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}
