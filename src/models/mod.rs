//! Domain models
//!
//! Structs mapping the PostgreSQL schema in `migrations/`.

pub mod booking;
pub mod incident;
pub mod route;
pub mod user;

pub use booking::{Booking, BookingStatus, NewBooking, SlotKey};
pub use incident::{DashboardSummary, Incident};
pub use route::{Route, RoutePatch, DEFAULT_CAPACITY, UNASSIGNED_DRIVER};
pub use user::{User, UserRole};
