//! Request handling logic behind the axum routes

pub mod auth_controller;
pub mod booking_controller;
pub mod dashboard_controller;
pub mod route_controller;
