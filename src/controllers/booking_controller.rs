use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{
    AvailabilityResponse, BookingCreatedResponse, BookingResponse, CancelBookingResponse,
    CreateBookingRequest,
};
use crate::middleware::AuthenticatedUser;
use crate::models::NewBooking;
use crate::services::AdmissionService;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_request_token;

pub struct BookingController {
    admission: Arc<AdmissionService>,
}

impl BookingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            admission: state.admission.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateBookingRequest,
        user: Option<AuthenticatedUser>,
        request_token: Option<String>,
    ) -> AppResult<BookingCreatedResponse> {
        request.validate()?;

        if let Some(token) = request_token.as_deref() {
            validate_request_token(token)
                .map_err(|_| validation_error("Idempotency-Key", "Invalid idempotency key"))?;
        }

        let admission = self
            .admission
            .request_booking(NewBooking {
                student_id: request.student_id.trim().to_string(),
                route_id: request.route_id.trim().to_string(),
                time: request.time.trim().to_string(),
                user_id: user.map(|u| u.id),
                request_token,
            })
            .await?;

        let message = if admission.replayed {
            "Booking already recorded"
        } else {
            "Booking confirmed"
        };

        Ok(BookingCreatedResponse {
            success: true,
            message: message.to_string(),
            replayed: admission.replayed,
            booking: admission.booking.into(),
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookingResponse> {
        let booking = self.admission.get_booking(id).await?;
        Ok(booking.into())
    }

    pub async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<BookingResponse>> {
        let student_id = student_id.trim();
        if student_id.is_empty() {
            return Err(validation_error("studentId", "Student ID is required"));
        }

        let bookings = self.admission.list_bookings(student_id).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    pub async fn cancel(&self, id: Uuid) -> AppResult<CancelBookingResponse> {
        let cancellation = self.admission.cancel_booking(id).await?;

        let message = if cancellation.already_cancelled {
            "Booking was already cancelled"
        } else {
            "Booking cancelled"
        };

        Ok(CancelBookingResponse {
            success: true,
            message: message.to_string(),
            already_cancelled: cancellation.already_cancelled,
            booking: cancellation.booking.into(),
        })
    }

    pub async fn availability(&self, route_id: &str, time: &str) -> AppResult<AvailabilityResponse> {
        let time = time.trim();
        if time.is_empty() {
            return Err(validation_error("time", "Time slot is required"));
        }

        let slot = self.admission.availability(route_id, time).await?;
        Ok(slot.into())
    }
}
