//! Request and response bodies of the JSON API

pub mod api_response;
pub mod auth_dto;
pub mod booking_dto;
pub mod incident_dto;
pub mod route_dto;

pub use api_response::ApiResponse;
