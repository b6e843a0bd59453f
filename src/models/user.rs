//! User model
//!
//! Accounts for students, drivers, coordinators and administrators.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Account role - maps to the `user_role` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    Student,
    Driver,
    Coordinator,
    Admin,
}

impl UserRole {
    /// Roles allowed to create, edit and delete routes
    pub fn manages_routes(self) -> bool {
        matches!(self, UserRole::Coordinator | UserRole::Admin)
    }

    /// Roles allowed to report incidents
    pub fn reports_incidents(self) -> bool {
        !matches!(self, UserRole::Student)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::Student => "Student",
            UserRole::Driver => "Driver",
            UserRole::Coordinator => "Coordinator",
            UserRole::Admin => "Admin",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Login identifier (student ID, driver ID, `ADMIN01`, ...)
    pub user_id: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            full_name: full_name.into(),
            password_hash: password_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }
}
