use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A problem reported against a route by a driver or coordinator
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub route_id: String,
    pub description: String,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
}

impl Incident {
    pub fn new(
        route_id: impl Into<String>,
        description: impl Into<String>,
        reported_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id: route_id.into(),
            description: description.into(),
            reported_by: reported_by.into(),
            created_at: Utc::now(),
        }
    }
}

/// Dashboard counters, read as one snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_routes: i64,
    pub total_bookings: i64,
    pub confirmed_bookings: i64,
    pub total_incidents: i64,
}
