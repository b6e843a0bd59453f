//! Campus shuttle booking service
//!
//! Route and seat booking API with capacity-safe admission control over
//! PostgreSQL or an in-memory store.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
