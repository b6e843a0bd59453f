//! Route model
//!
//! A scheduled shuttle path. Maps to the `routes` table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Driver label used until a coordinator assigns someone
pub const UNASSIGNED_DRIVER: &str = "Unassigned";

/// Seats on a standard campus shuttle
pub const DEFAULT_CAPACITY: i32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: String,
    #[sqlx(rename = "origin")]
    pub from: String,
    #[sqlx(rename = "destination")]
    pub to: String,
    pub departure_time: String,
    pub driver_assigned: String,
    pub capacity: i32,
}

impl Route {
    pub fn new(
        route_id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        departure_time: impl Into<String>,
    ) -> Self {
        Self {
            route_id: route_id.into(),
            from: from.into(),
            to: to.into(),
            departure_time: departure_time.into(),
            driver_assigned: UNASSIGNED_DRIVER.to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_driver(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_assigned = driver_id.into();
        self
    }

    /// Apply a partial edit; `None` fields keep their current value.
    pub fn apply(&mut self, patch: RoutePatch) {
        if let Some(from) = patch.from {
            self.from = from;
        }
        if let Some(to) = patch.to {
            self.to = to;
        }
        if let Some(departure_time) = patch.departure_time {
            self.departure_time = departure_time;
        }
        if let Some(driver) = patch.driver_assigned {
            self.driver_assigned = driver;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
    }
}

/// Partial route edit
#[derive(Debug, Clone, Default)]
pub struct RoutePatch {
    pub from: Option<String>,
    pub to: Option<String>,
    pub departure_time: Option<String>,
    pub driver_assigned: Option<String>,
    pub capacity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_route_defaults() {
        let route = Route::new("R01", "Main Gate", "Faculty of IT", "08:00");
        assert_eq!(route.driver_assigned, UNASSIGNED_DRIVER);
        assert_eq!(route.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_apply_patch_keeps_unset_fields() {
        let mut route = Route::new("R01", "Main Gate", "Faculty of IT", "08:00");
        route.apply(RoutePatch {
            driver_assigned: Some("D100".to_string()),
            capacity: Some(20),
            ..RoutePatch::default()
        });

        assert_eq!(route.from, "Main Gate");
        assert_eq!(route.departure_time, "08:00");
        assert_eq!(route.driver_assigned, "D100");
        assert_eq!(route.capacity, 20);
    }
}
