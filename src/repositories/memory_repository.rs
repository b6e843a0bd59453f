//! In-memory store
//!
//! Implements every store trait over one `RwLock`. Writers take the lock
//! exclusively, so the conditional insert and the status update are atomic
//! with respect to each other. Used when no `DATABASE_URL` is configured and
//! by the test suite.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    BookingStore, Cancellation, DashboardStore, IncidentStore, InsertOutcome, RouteStore,
    StoreError, UserStore,
};
use crate::models::{
    Booking, BookingStatus, DashboardSummary, Incident, Route, RoutePatch, User, UserRole,
};

#[derive(Default)]
struct MemoryState {
    routes: BTreeMap<String, Route>,
    bookings: HashMap<Uuid, Booking>,
    users: HashMap<Uuid, User>,
    incidents: Vec<Incident>,
}

impl MemoryState {
    fn count_confirmed(&self, route_id: &str, time: &str) -> i64 {
        self.bookings
            .values()
            .filter(|b| b.is_confirmed() && b.route_id == route_id && b.time == time)
            .count() as i64
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with `StoreError::Unavailable`, to exercise
    /// persistence failure handling.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is failing writes".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn find_by_id(&self, route_id: &str) -> Result<Option<Route>, StoreError> {
        Ok(self.state.read().await.routes.get(route_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Route>, StoreError> {
        Ok(self.state.read().await.routes.values().cloned().collect())
    }

    async fn find_by_driver(&self, driver_id: &str) -> Result<Option<Route>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .routes
            .values()
            .find(|route| route.driver_assigned == driver_id)
            .cloned())
    }

    async fn create(&self, route: Route) -> Result<Route, StoreError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        if state.routes.contains_key(&route.route_id) {
            return Err(StoreError::Conflict(format!(
                "route '{}' already exists",
                route.route_id
            )));
        }
        state.routes.insert(route.route_id.clone(), route.clone());
        Ok(route)
    }

    async fn update(&self, route_id: &str, patch: RoutePatch) -> Result<Option<Route>, StoreError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        Ok(state.routes.get_mut(route_id).map(|route| {
            route.apply(patch);
            route.clone()
        }))
    }

    async fn delete(&self, route_id: &str) -> Result<bool, StoreError> {
        self.check_writable()?;
        Ok(self.state.write().await.routes.remove(route_id).is_some())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn count_confirmed(&self, route_id: &str, time: &str) -> Result<i64, StoreError> {
        Ok(self.state.read().await.count_confirmed(route_id, time))
    }

    async fn insert_within_capacity(
        &self,
        booking: Booking,
        capacity: i64,
        replay_since: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if let Some(token) = booking.request_token.as_deref() {
            let replay = state
                .bookings
                .values()
                .filter(|b| {
                    b.request_token.as_deref() == Some(token)
                        && b.student_id == booking.student_id
                        && b.created_at >= replay_since
                })
                .max_by_key(|b| b.created_at)
                .cloned();
            if let Some(existing) = replay {
                return Ok(if existing.slot() == booking.slot() {
                    InsertOutcome::Replayed(existing)
                } else {
                    InsertOutcome::KeyReused(existing)
                });
            }
        }

        let confirmed = state.count_confirmed(&booking.route_id, &booking.time);
        if confirmed >= capacity {
            return Ok(InsertOutcome::Full { confirmed });
        }

        state.bookings.insert(booking.id, booking.clone());
        Ok(InsertOutcome::Inserted(booking))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.state.read().await.bookings.get(&id).cloned())
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Booking>, StoreError> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.student_id == student_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn cancel(&self, id: Uuid) -> Result<Option<Cancellation>, StoreError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        let Some(booking) = state.bookings.get_mut(&id) else {
            return Ok(None);
        };

        let already_cancelled = booking.status == BookingStatus::Cancelled;
        if !already_cancelled {
            booking.status = BookingStatus::Cancelled;
            booking.cancelled_at = Some(Utc::now());
        }

        Ok(Some(Cancellation {
            booking: booking.clone(),
            already_cancelled,
        }))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let wanted = user_id.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.user_id.to_lowercase() == wanted)
            .cloned())
    }

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| user.role == role)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        self.check_writable()?;
        let wanted = user.user_id.to_lowercase();
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|existing| existing.user_id.to_lowercase() == wanted)
        {
            return Err(StoreError::Conflict(format!(
                "user id '{}' already exists",
                user.user_id
            )));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl IncidentStore for MemoryStore {
    async fn create(&self, incident: Incident) -> Result<Incident, StoreError> {
        self.check_writable()?;
        self.state.write().await.incidents.push(incident.clone());
        Ok(incident)
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn summary(&self) -> Result<DashboardSummary, StoreError> {
        let state = self.state.read().await;
        Ok(DashboardSummary {
            total_routes: state.routes.len() as i64,
            total_bookings: state.bookings.len() as i64,
            confirmed_bookings: state.bookings.values().filter(|b| b.is_confirmed()).count() as i64,
            total_incidents: state.incidents.len() as i64,
        })
    }
}
