use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Route, RoutePatch, User};
use crate::utils::validation::validate_not_blank;

// Request to create a route (coordinator form)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    /// Generated as `R<unix millis>` when absent
    #[validate(length(min = 1, max = 64))]
    pub route_id: Option<String>,

    #[validate(length(max = 200), custom = "validate_not_blank")]
    pub from: String,

    #[validate(length(max = 200), custom = "validate_not_blank")]
    pub to: String,

    #[validate(length(max = 32), custom = "validate_not_blank")]
    pub departure: String,

    #[validate(length(min = 1, max = 64))]
    pub driver_id: Option<String>,

    #[validate(range(min = 1, max = 500))]
    pub capacity: Option<i32>,
}

// Partial edit; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    #[validate(length(max = 200), custom = "validate_not_blank")]
    pub from: Option<String>,

    #[validate(length(max = 200), custom = "validate_not_blank")]
    pub to: Option<String>,

    #[validate(length(max = 32), custom = "validate_not_blank")]
    pub departure: Option<String>,

    #[validate(length(max = 64), custom = "validate_not_blank")]
    pub driver_id: Option<String>,

    #[validate(range(min = 1, max = 500))]
    pub capacity: Option<i32>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl From<UpdateRouteRequest> for RoutePatch {
    fn from(request: UpdateRouteRequest) -> Self {
        Self {
            from: trimmed(request.from),
            to: trimmed(request.to),
            departure_time: trimmed(request.departure),
            driver_assigned: trimmed(request.driver_id),
            capacity: request.capacity,
        }
    }
}

/// Route as listed to the booking page
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub driver: String,
    pub capacity: i32,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.route_id,
            from: route.from,
            to: route.to,
            departure: route.departure_time,
            driver: route.driver_assigned,
            capacity: route.capacity,
        }
    }
}

/// A driver's assigned route
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRouteResponse {
    pub route_id: String,
    pub from: String,
    pub to: String,
    pub departure: String,
}

impl From<Route> for DriverRouteResponse {
    fn from(route: Route) -> Self {
        Self {
            route_id: route.route_id,
            from: route.from,
            to: route.to,
            departure: route.departure_time,
        }
    }
}

/// Driver entry for the coordinator's assignment dropdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub user_id: String,
    pub name: String,
}

impl From<User> for DriverSummary {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.full_name,
        }
    }
}
