//! Authentication service
//!
//! Student registration, login with bcrypt-checked passwords and JWT
//! issuance, and the default administrator bootstrap run at startup.

use std::sync::Arc;

use bcrypt::{hash, verify};
use tracing::{info, warn};

use crate::models::{User, UserRole};
use crate::repositories::{StoreError, UserStore};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

/// Credentials for the account created on first start
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub user_id: String,
    pub full_name: String,
    pub password: String,
}

/// Outcome of a successful login
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtConfig,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt,
            bcrypt_cost,
        }
    }

    /// Create the default administrator unless an account with its id
    /// already exists. Safe to run on every start and from several
    /// instances at once; returns whether an account was created.
    pub async fn ensure_default_admin(&self, admin: &DefaultAdmin) -> AppResult<bool> {
        if self.users.find_by_user_id(&admin.user_id).await?.is_some() {
            info!("ℹ️ Default admin {} already exists, skipping creation", admin.user_id);
            return Ok(false);
        }

        let password_hash = hash(&admin.password, self.bcrypt_cost)?;
        let user = User::new(&admin.user_id, &admin.full_name, password_hash, UserRole::Admin);

        match self.users.create(user).await {
            Ok(created) => {
                info!("✅ Default admin created: {}", created.user_id);
                Ok(true)
            }
            // another instance won the race
            Err(StoreError::Conflict(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Self-service student registration
    pub async fn register_student(
        &self,
        user_id: &str,
        full_name: &str,
        password: &str,
    ) -> AppResult<User> {
        if self.users.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::Conflict("User ID already exists".to_string()));
        }

        let password_hash = hash(password, self.bcrypt_cost)?;
        let user = User::new(user_id.trim(), full_name.trim(), password_hash, UserRole::Student);

        let created = self.users.create(user).await?;
        info!("🎓 Student {} registered", created.user_id);
        Ok(created)
    }

    /// Check credentials and issue a token. Unknown ids and wrong passwords
    /// get the same error.
    pub async fn login(&self, user_id: &str, password: &str) -> AppResult<AuthSession> {
        let invalid = || AppError::Unauthorized("Invalid ID or password".to_string());

        let user = self
            .users
            .find_by_user_id(user_id.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify(password, &user.password_hash)? {
            warn!("Failed login for {}", user.user_id);
            return Err(invalid());
        }

        let token = generate_token(user.id, &user.user_id, user.role, &self.jwt)?;
        info!("🔑 {} logged in as {}", user.user_id, user.role);

        Ok(AuthSession { token, user })
    }

    /// Accounts a coordinator can assign to a route
    pub async fn list_drivers(&self) -> AppResult<Vec<User>> {
        Ok(self.users.list_by_role(UserRole::Driver).await?)
    }
}
