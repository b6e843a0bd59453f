use async_trait::async_trait;
use sqlx::PgPool;

use super::{DashboardStore, IncidentStore, StoreError};
use crate::models::{BookingStatus, DashboardSummary, Incident};

/// Incidents, plus the dashboard counters that span every table
pub struct PgIncidentRepository {
    pool: PgPool,
}

impl PgIncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentStore for PgIncidentRepository {
    async fn create(&self, incident: Incident) -> Result<Incident, StoreError> {
        let created = sqlx::query_as::<_, Incident>(
            r#"
            INSERT INTO incidents (id, route_id, description, reported_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(incident.id)
        .bind(incident.route_id)
        .bind(incident.description)
        .bind(incident.reported_by)
        .bind(incident.created_at)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("Inserted incident row {}", created.id);
        Ok(created)
    }
}

#[async_trait]
impl DashboardStore for PgIncidentRepository {
    async fn summary(&self) -> Result<DashboardSummary, StoreError> {
        // one statement, one snapshot
        let summary = sqlx::query_as::<_, DashboardSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM routes) AS total_routes,
                (SELECT COUNT(*) FROM bookings) AS total_bookings,
                (SELECT COUNT(*) FROM bookings WHERE status = $1) AS confirmed_bookings,
                (SELECT COUNT(*) FROM incidents) AS total_incidents
            "#,
        )
        .bind(BookingStatus::Confirmed)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}
