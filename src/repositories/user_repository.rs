use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreError, UserStore};
use crate::models::{User, UserRole};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(user_id) = LOWER($1)")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, StoreError> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY user_id")
                .bind(role)
                .fetch_all(&self.pool)
                .await?;

        Ok(users)
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let user_id = user.user_id.clone();

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, user_id, full_name, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(user.user_id)
        .bind(user.full_name)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, format!("user id '{}' already exists", user_id)))?;

        Ok(created)
    }
}
