use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Booking, BookingStatus};
use crate::services::SlotAvailability;
use crate::utils::validation::validate_not_blank;

// Seat booking request, as posted by the booking form
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(max = 64), custom = "validate_not_blank")]
    pub student_id: String,

    #[validate(length(max = 64), custom = "validate_not_blank")]
    pub route_id: String,

    #[validate(length(max = 32), custom = "validate_not_blank")]
    pub time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilters {
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub student_id: String,
    pub route_id: String,
    pub time: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            student_id: booking.student_id,
            route_id: booking.route_id,
            time: booking.time,
            status: booking.status,
            created_at: booking.created_at,
            cancelled_at: booking.cancelled_at,
        }
    }
}

/// Body of a successful booking request
#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub success: bool,
    pub message: String,
    pub replayed: bool,
    pub booking: BookingResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    pub success: bool,
    pub message: String,
    pub already_cancelled: bool,
    pub booking: BookingResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub route_id: String,
    pub time: String,
    pub capacity: i32,
    pub confirmed: i64,
    pub remaining: i64,
}

impl From<SlotAvailability> for AvailabilityResponse {
    fn from(slot: SlotAvailability) -> Self {
        Self {
            route_id: slot.route_id,
            time: slot.time,
            capacity: slot.capacity,
            confirmed: slot.confirmed,
            remaining: slot.remaining,
        }
    }
}
