use async_trait::async_trait;
use sqlx::PgPool;

use super::{RouteStore, StoreError};
use crate::models::{Route, RoutePatch};

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteStore for PgRouteRepository {
    async fn find_by_id(&self, route_id: &str) -> Result<Option<Route>, StoreError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE route_id = $1")
            .bind(route_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    async fn list(&self) -> Result<Vec<Route>, StoreError> {
        let routes = sqlx::query_as::<_, Route>("SELECT * FROM routes ORDER BY route_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(routes)
    }

    async fn find_by_driver(&self, driver_id: &str) -> Result<Option<Route>, StoreError> {
        let route = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE driver_assigned = $1 ORDER BY route_id LIMIT 1",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    async fn create(&self, route: Route) -> Result<Route, StoreError> {
        let route_id = route.route_id.clone();

        let created = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (route_id, origin, destination, departure_time, driver_assigned, capacity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(route.route_id)
        .bind(route.from)
        .bind(route.to)
        .bind(route.departure_time)
        .bind(route.driver_assigned)
        .bind(route.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, format!("route '{}' already exists", route_id)))?;

        log::debug!("Inserted route row {}", created.route_id);
        Ok(created)
    }

    async fn update(&self, route_id: &str, patch: RoutePatch) -> Result<Option<Route>, StoreError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET origin = COALESCE($2, origin),
                destination = COALESCE($3, destination),
                departure_time = COALESCE($4, departure_time),
                driver_assigned = COALESCE($5, driver_assigned),
                capacity = COALESCE($6, capacity)
            WHERE route_id = $1
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(patch.from)
        .bind(patch.to)
        .bind(patch.departure_time)
        .bind(patch.driver_assigned)
        .bind(patch.capacity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    async fn delete(&self, route_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM routes WHERE route_id = $1")
            .bind(route_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
