//! Booking admission control
//!
//! Decides whether a booking request fits in its route's seat capacity and
//! records the decision. The count-then-insert step is delegated to
//! [`BookingStore::insert_within_capacity`], which every store implements as a
//! single atomic operation per `(route, time)` slot, so concurrent requests
//! for the same slot can never overshoot capacity.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Booking, NewBooking, Route};
use crate::repositories::{BookingStore, Cancellation, InsertOutcome, RouteStore, StoreError};

#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("route '{0}' does not exist")]
    InvalidRoute(String),

    #[error("no seats left on route {route_id} at {time} (capacity {capacity})")]
    CapacityExceeded {
        route_id: String,
        time: String,
        capacity: i32,
    },

    #[error("booking '{0}' not found")]
    NotFound(Uuid),

    #[error("idempotency key '{token}' was already used for booking {booking_id}")]
    KeyReused { token: String, booking_id: Uuid },

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),
}

/// An accepted booking request
#[derive(Debug, Clone)]
pub struct Admission {
    pub booking: Booking,
    /// The request token matched an earlier booking; nothing new was stored
    pub replayed: bool,
}

/// Seat usage for one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    pub route_id: String,
    pub time: String,
    pub capacity: i32,
    pub confirmed: i64,
    pub remaining: i64,
}

pub struct AdmissionService {
    routes: Arc<dyn RouteStore>,
    bookings: Arc<dyn BookingStore>,
    replay_window: chrono::Duration,
}

impl AdmissionService {
    pub fn new(
        routes: Arc<dyn RouteStore>,
        bookings: Arc<dyn BookingStore>,
        replay_window: chrono::Duration,
    ) -> Self {
        Self {
            routes,
            bookings,
            replay_window,
        }
    }

    async fn route(&self, route_id: &str) -> Result<Route, AdmissionError> {
        self.routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| AdmissionError::InvalidRoute(route_id.to_string()))
    }

    /// Admit or reject a booking request.
    ///
    /// Exactly one booking is stored on success, unless the request token
    /// replays an earlier booking by the same student for the same slot, in
    /// which case that booking is returned.
    pub async fn request_booking(&self, request: NewBooking) -> Result<Admission, AdmissionError> {
        let route = self.route(&request.route_id).await?;
        let candidate = Booking::confirmed(request);
        let slot = candidate.slot();
        let now = Utc::now();
        // a window reaching past the calendar disables replay
        let replay_since = now.checked_sub_signed(self.replay_window).unwrap_or(now);

        debug!(
            "Admission check for {} on {} (capacity {})",
            candidate.student_id, slot, route.capacity
        );

        match self
            .bookings
            .insert_within_capacity(candidate, i64::from(route.capacity), replay_since)
            .await?
        {
            InsertOutcome::Inserted(booking) => {
                info!(
                    "✅ Booking {} confirmed for {} on {}",
                    booking.id,
                    booking.student_id,
                    booking.slot()
                );
                Ok(Admission {
                    booking,
                    replayed: false,
                })
            }
            InsertOutcome::Replayed(booking) => {
                info!("🔁 Booking request replayed, returning {}", booking.id);
                Ok(Admission {
                    booking,
                    replayed: true,
                })
            }
            InsertOutcome::KeyReused(existing) => {
                warn!(
                    "🚫 Idempotency key reused by {} for {}, key belongs to booking {} on {}",
                    existing.student_id,
                    slot,
                    existing.id,
                    existing.slot()
                );
                Err(AdmissionError::KeyReused {
                    token: existing.request_token.clone().unwrap_or_default(),
                    booking_id: existing.id,
                })
            }
            InsertOutcome::Full { confirmed } => {
                warn!(
                    "🚫 {} is full: {} confirmed of {} seats",
                    slot, confirmed, route.capacity
                );
                Err(AdmissionError::CapacityExceeded {
                    route_id: slot.route_id,
                    time: slot.time,
                    capacity: route.capacity,
                })
            }
        }
    }

    /// Cancel a booking, releasing its seat.
    ///
    /// Cancelling an already cancelled booking succeeds without changes.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Cancellation, AdmissionError> {
        let cancellation = self
            .bookings
            .cancel(booking_id)
            .await?
            .ok_or(AdmissionError::NotFound(booking_id))?;

        if cancellation.already_cancelled {
            debug!("Booking {} was already cancelled", booking_id);
        } else {
            info!(
                "❎ Booking {} cancelled, seat released on {}",
                booking_id,
                cancellation.booking.slot()
            );
        }

        Ok(cancellation)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, AdmissionError> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(AdmissionError::NotFound(booking_id))
    }

    pub async fn list_bookings(&self, student_id: &str) -> Result<Vec<Booking>, AdmissionError> {
        Ok(self.bookings.list_by_student(student_id).await?)
    }

    /// Remaining seats on a slot. Advisory only: a later request may still
    /// be rejected.
    pub async fn availability(
        &self,
        route_id: &str,
        time: &str,
    ) -> Result<SlotAvailability, AdmissionError> {
        let route = self.route(route_id).await?;
        let confirmed = self.bookings.count_confirmed(route_id, time).await?;

        Ok(SlotAvailability {
            route_id: route.route_id,
            time: time.to_string(),
            capacity: route.capacity,
            confirmed,
            remaining: (i64::from(route.capacity) - confirmed).max(0),
        })
    }
}
