//! Persistence layer
//!
//! Store traits consumed by the services, with a PostgreSQL implementation
//! per table and an in-memory implementation of all of them.

pub mod booking_repository;
pub mod incident_repository;
pub mod memory_repository;
pub mod route_repository;
pub mod user_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, DashboardSummary, Incident, Route, RoutePatch, User, UserRole};

pub use booking_repository::PgBookingRepository;
pub use incident_repository::PgIncidentRepository;
pub use memory_repository::MemoryStore;
pub use route_repository::PgRouteRepository;
pub use user_repository::PgUserRepository;

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Map a unique-constraint violation to `Conflict`
    pub(crate) fn from_insert(error: sqlx::Error, what: impl Into<String>) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(what.into())
            }
            _ => StoreError::Database(error),
        }
    }
}

/// Result of an atomic conditional insert
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The booking was stored
    Inserted(Booking),
    /// The same student already booked this slot with the same request token
    /// inside the replay window; nothing was stored
    Replayed(Booking),
    /// The student's request token belongs to an earlier booking for a
    /// different slot; nothing was stored
    KeyReused(Booking),
    /// The slot already holds `confirmed` bookings, at or above capacity
    Full { confirmed: i64 },
}

/// Result of cancelling an existing booking
#[derive(Debug, Clone, PartialEq)]
pub struct Cancellation {
    pub booking: Booking,
    pub already_cancelled: bool,
}

#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn find_by_id(&self, route_id: &str) -> Result<Option<Route>, StoreError>;

    /// All routes ordered by id
    async fn list(&self) -> Result<Vec<Route>, StoreError>;

    /// First route (by id) assigned to the driver
    async fn find_by_driver(&self, driver_id: &str) -> Result<Option<Route>, StoreError>;

    async fn create(&self, route: Route) -> Result<Route, StoreError>;

    async fn update(&self, route_id: &str, patch: RoutePatch) -> Result<Option<Route>, StoreError>;

    /// Returns whether a route was removed
    async fn delete(&self, route_id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Confirmed bookings held against `(route_id, time)`
    async fn count_confirmed(&self, route_id: &str, time: &str) -> Result<i64, StoreError>;

    /// Count-and-insert as one indivisible step per `(route_id, time)`.
    ///
    /// Request tokens are scoped to the student. When the booking carries a
    /// token and the same student created a booking with it at or after
    /// `replay_since`, that booking is returned instead: as `Replayed` when it
    /// is for the same slot, as `KeyReused` otherwise. Without a match the
    /// booking is stored only if fewer than `capacity` Confirmed bookings
    /// exist for its slot.
    async fn insert_within_capacity(
        &self,
        booking: Booking,
        capacity: i64,
        replay_since: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// A student's bookings, newest first
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Booking>, StoreError>;

    /// Move a booking to Cancelled. `None` if no booking has that id.
    async fn cancel(&self, id: Uuid) -> Result<Option<Cancellation>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive lookup by login id
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Users holding `role`, ordered by login id
    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, StoreError>;

    /// Fails with `Conflict` if the login id is taken (case-insensitive)
    async fn create(&self, user: User) -> Result<User, StoreError>;
}

#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn create(&self, incident: Incident) -> Result<Incident, StoreError>;
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Route, booking and incident counts from a single snapshot
    async fn summary(&self) -> Result<DashboardSummary, StoreError>;
}
