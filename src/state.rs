//! Shared application state
//!
//! Services and stores handed to every axum handler.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    BookingStore, DashboardStore, IncidentStore, MemoryStore, PgBookingRepository,
    PgIncidentRepository, PgRouteRepository, PgUserRepository, RouteStore, UserStore,
};
use crate::services::{AdmissionService, AuthService, DefaultAdmin};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub routes: Arc<dyn RouteStore>,
    pub incidents: Arc<dyn IncidentStore>,
    pub dashboard: Arc<dyn DashboardStore>,
    pub admission: Arc<AdmissionService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    fn assemble(
        config: EnvironmentConfig,
        routes: Arc<dyn RouteStore>,
        bookings: Arc<dyn BookingStore>,
        users: Arc<dyn UserStore>,
        incidents: Arc<dyn IncidentStore>,
        dashboard: Arc<dyn DashboardStore>,
    ) -> Self {
        let jwt = JwtConfig::from(&config);
        let admission = AdmissionService::new(routes.clone(), bookings, config.idempotency_window());
        let auth = AuthService::new(users, jwt.clone(), config.bcrypt_cost);

        Self {
            config,
            jwt,
            routes,
            incidents,
            dashboard,
            admission: Arc::new(admission),
            auth: Arc::new(auth),
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        let incidents = Arc::new(PgIncidentRepository::new(pool.clone()));

        Self::assemble(
            config,
            Arc::new(PgRouteRepository::new(pool.clone())),
            Arc::new(PgBookingRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
            incidents.clone(),
            incidents,
        )
    }

    /// State backed by the given in-memory store
    pub fn in_memory(store: Arc<MemoryStore>, config: EnvironmentConfig) -> Self {
        Self::assemble(
            config,
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }

    pub fn default_admin(&self) -> DefaultAdmin {
        DefaultAdmin {
            user_id: self.config.default_admin_id.clone(),
            full_name: self.config.default_admin_name.clone(),
            password: self.config.default_admin_password.clone(),
        }
    }
}
