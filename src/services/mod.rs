//! Business services
//!
//! Booking admission control and authentication.

pub mod admission_service;
pub mod auth_service;

pub use admission_service::{Admission, AdmissionError, AdmissionService, SlotAvailability};
pub use auth_service::{AuthService, AuthSession, DefaultAdmin};
