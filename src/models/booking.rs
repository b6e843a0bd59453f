//! Booking model
//!
//! A student's seat reservation on a route for one time slot. Maps to the
//! `bookings` table. Bookings are never deleted; cancellation flips the
//! status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Lifecycle state - maps to the `booking_status` enum
///
/// The only transition is `Confirmed -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "booking_status")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Confirmed
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "Confirmed"),
            BookingStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// The `(route, time slot)` pair seat capacity is counted against
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub route_id: String,
    pub time: String,
}

impl SlotKey {
    pub fn new(route_id: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            route_id: route_id.into(),
            time: time.into(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.route_id, self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub student_id: String,
    pub route_id: String,
    #[sqlx(rename = "time_slot")]
    pub time: String,
    pub status: BookingStatus,
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// A fresh Confirmed booking for an admission attempt
    pub fn confirmed(request: NewBooking) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            route_id: request.route_id,
            time: request.time,
            status: BookingStatus::Confirmed,
            user_id: request.user_id,
            request_token: request.request_token,
            created_at: Utc::now(),
            cancelled_at: None,
        }
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.route_id.clone(), self.time.clone())
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// Caller-supplied part of a booking request
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub student_id: String,
    pub route_id: String,
    pub time: String,
    pub user_id: Option<Uuid>,
    pub request_token: Option<String>,
}
