use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use shuttle_booking::config::EnvironmentConfig;
use shuttle_booking::models::{Route, User, UserRole};
use shuttle_booking::repositories::{MemoryStore, RouteStore, UserStore};
use shuttle_booking::utils::jwt::generate_token;
use shuttle_booking::{create_router, AppState};

struct TestApp {
    router: Router,
    state: AppState,
    store: Arc<MemoryStore>,
}

impl TestApp {
    async fn new() -> Self {
        let config = EnvironmentConfig {
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        };
        let store = Arc::new(MemoryStore::new());
        let state = AppState::in_memory(store.clone(), config);

        state
            .auth
            .ensure_default_admin(&state.default_admin())
            .await
            .unwrap();

        RouteStore::create(
            store.as_ref(),
            Route::new("R01", "Main Gate", "Faculty of IT", "08:00")
                .with_capacity(2)
                .with_driver("D01"),
        )
        .await
        .unwrap();

        Self {
            router: create_router(state.clone()),
            state,
            store,
        }
    }

    fn token_for(&self, user_id: &str, role: UserRole) -> String {
        generate_token(Uuid::new_v4(), user_id, role, &self.state.jwt).unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn book(&self, student: &str, route: &str, time: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/bookings",
            None,
            &[],
            Some(json!({ "studentId": student, "routeId": route, "time": time })),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_booking_flow_respects_capacity() {
    let app = TestApp::new().await;

    let (status, first) = app.book("S1", "R01", "08:00").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["success"], true);
    assert_eq!(first["booking"]["status"], "Confirmed");

    let (status, _) = app.book("S2", "R01", "08:00").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.book("S3", "R01", "08:00").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");

    let first_id = first["booking"]["id"].as_str().unwrap().to_string();
    let (status, cancelled) = app
        .send(Method::DELETE, &format!("/api/bookings/{}", first_id), None, &[], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["alreadyCancelled"], false);
    assert_eq!(cancelled["booking"]["status"], "Cancelled");

    let (status, _) = app.book("S4", "R01", "08:00").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancelling_twice_succeeds() {
    let app = TestApp::new().await;
    let (_, created) = app.book("S1", "R01", "08:00").await;
    let uri = format!("/api/bookings/{}", created["booking"]["id"].as_str().unwrap());

    app.send(Method::DELETE, &uri, None, &[], None).await;
    let (status, body) = app.send(Method::DELETE, &uri, None, &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alreadyCancelled"], true);
}

#[tokio::test]
async fn test_cancel_unknown_booking_is_not_found() {
    let app = TestApp::new().await;
    let uri = format!("/api/bookings/{}", Uuid::new_v4());
    let (status, body) = app.send(Method::DELETE, &uri, None, &[], None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_route_is_bad_request() {
    let app = TestApp::new().await;
    let (status, body) = app.book("S1", "R-does-not-exist", "08:00").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ROUTE");

    let (_, summary) = app
        .send(Method::GET, "/api/dashboard-summary", None, &[], None)
        .await;
    assert_eq!(summary["totalBookings"], 0);
}

#[tokio::test]
async fn test_blank_student_id_is_validation_error() {
    let app = TestApp::new().await;
    let (status, body) = app.book("   ", "R01", "08:00").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_idempotency_key_replays_booking() {
    let app = TestApp::new().await;
    let request = json!({ "studentId": "S1", "routeId": "R01", "time": "08:00" });
    let headers = [("idempotency-key", "retry-abc-1")];

    let (status, first) = app
        .send(Method::POST, "/api/bookings", None, &headers, Some(request.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["replayed"], false);

    let (status, second) = app
        .send(Method::POST, "/api/bookings", None, &headers, Some(request))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["replayed"], true);
    assert_eq!(second["booking"]["id"], first["booking"]["id"]);

    let (_, bookings) = app
        .send(Method::GET, "/api/bookings?studentId=S1", None, &[], None)
        .await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_idempotency_key_is_scoped_to_student() {
    let app = TestApp::new().await;
    let headers = [("idempotency-key", "1")];

    let (status, first) = app
        .send(
            Method::POST,
            "/api/bookings",
            None,
            &headers,
            Some(json!({ "studentId": "S1", "routeId": "R01", "time": "08:00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = app
        .send(
            Method::POST,
            "/api/bookings",
            None,
            &headers,
            Some(json!({ "studentId": "S2", "routeId": "R01", "time": "08:00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["replayed"], false);
    assert_eq!(second["booking"]["studentId"], "S2");
    assert_ne!(second["booking"]["id"], first["booking"]["id"]);

    let (_, bookings) = app
        .send(Method::GET, "/api/bookings?studentId=S2", None, &[], None)
        .await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_idempotency_key_reused_for_other_slot_conflicts() {
    let app = TestApp::new().await;
    let headers = [("idempotency-key", "form-1")];

    let (status, _) = app
        .send(
            Method::POST,
            "/api/bookings",
            None,
            &headers,
            Some(json!({ "studentId": "S1", "routeId": "R01", "time": "08:00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/bookings",
            None,
            &headers,
            Some(json!({ "studentId": "S1", "routeId": "R01", "time": "17:00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (_, bookings) = app
        .send(Method::GET, "/api/bookings?studentId=S1", None, &[], None)
        .await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_availability_endpoint() {
    let app = TestApp::new().await;
    app.book("S1", "R01", "08:00").await;

    let (status, body) = app
        .send(Method::GET, "/api/routes/R01/availability?time=08:00", None, &[], None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 2);
    assert_eq!(body["confirmed"], 1);
    assert_eq!(body["remaining"], 1);
}

#[tokio::test]
async fn test_route_writes_require_manager_role() {
    let app = TestApp::new().await;
    let new_route = json!({
        "routeId": "R02",
        "from": "Library",
        "to": "Dormitory B",
        "departure": "09:30",
        "capacity": 30
    });

    let (status, _) = app
        .send(Method::POST, "/api/routes", None, &[], Some(new_route.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let student = app.token_for("S1", UserRole::Student);
    let (status, body) = app
        .send(Method::POST, "/api/routes", Some(&student), &[], Some(new_route.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let coordinator = app.token_for("C01", UserRole::Coordinator);
    let (status, body) = app
        .send(Method::POST, "/api/routes", Some(&coordinator), &[], Some(new_route))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], "R02");
    assert_eq!(body["data"]["driver"], "Unassigned");

    let (status, routes) = app.send(Method::GET, "/api/routes", None, &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(routes.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_route_update_and_delete() {
    let app = TestApp::new().await;
    let admin = app.token_for("ADMIN01", UserRole::Admin);

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/routes/R01",
            Some(&admin),
            &[],
            Some(json!({ "capacity": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["capacity"], 10);
    assert_eq!(body["data"]["from"], "Main Gate");

    let (status, _) = app
        .send(Method::DELETE, "/api/routes/R01", Some(&admin), &[], None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/routes/R01", None, &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::DELETE, "/api/routes/R01", Some(&admin), &[], None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_route_update_rejects_blank_fields() {
    let app = TestApp::new().await;
    let admin = app.token_for("ADMIN01", UserRole::Admin);

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/routes/R01",
            Some(&admin),
            &[],
            Some(json!({ "from": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/routes/R01",
            Some(&admin),
            &[],
            Some(json!({ "to": "  Library  " })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["to"], "Library");
    assert_eq!(body["data"]["from"], "Main Gate");
}

#[tokio::test]
async fn test_create_route_with_invalid_capacity() {
    let app = TestApp::new().await;
    let admin = app.token_for("ADMIN01", UserRole::Admin);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/routes",
            Some(&admin),
            &[],
            Some(json!({ "from": "A", "to": "B", "departure": "10:00", "capacity": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_driver_route_lookup() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::GET, "/api/driver/my-route/D01", None, &[], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["routeId"], "R01");

    let (status, body) = app
        .send(Method::GET, "/api/driver/my-route/D99", None, &[], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_drivers_list_for_assignment() {
    let app = TestApp::new().await;
    for user in [
        User::new("D02", "Rafa", "hash", UserRole::Driver),
        User::new("D01", "Mira", "hash", UserRole::Driver),
        User::new("C01", "Coordinator", "hash", UserRole::Coordinator),
    ] {
        UserStore::create(app.store.as_ref(), user).await.unwrap();
    }

    let (status, body) = app.send(Method::GET, "/api/drivers", None, &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "userId": "D01", "name": "Mira" },
            { "userId": "D02", "name": "Rafa" },
        ])
    );
}

#[tokio::test]
async fn test_default_admin_can_login() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            &[],
            Some(json!({ "userId": "admin01", "password": "admin123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["role"], "Admin");
    assert!(body["token"].as_str().is_some());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            &[],
            Some(json!({ "userId": "ADMIN01", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new().await;
    let registration = json!({ "name": "Ada Student", "userId": "S100", "password": "secret1" });

    let (status, body) = app
        .send(Method::POST, "/api/register", None, &[], Some(registration.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "Student");

    let (status, _) = app
        .send(Method::POST, "/api/register", None, &[], Some(registration))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            &[],
            Some(json!({ "userId": "S100", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "Student");
}

#[tokio::test]
async fn test_incident_reporting_updates_dashboard() {
    let app = TestApp::new().await;
    let incident = json!({ "routeId": "R01", "description": "Flat tyre near the library" });

    let student = app.token_for("S1", UserRole::Student);
    let (status, _) = app
        .send(Method::POST, "/api/incidents", Some(&student), &[], Some(incident.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let driver = app.token_for("D01", UserRole::Driver);
    let (status, body) = app
        .send(Method::POST, "/api/incidents", Some(&driver), &[], Some(incident))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["reportedBy"], "D01");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/incidents",
            Some(&driver),
            &[],
            Some(json!({ "routeId": "R77", "description": "Wrong stop" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ROUTE");

    app.book("S1", "R01", "08:00").await;

    let (status, summary) = app
        .send(Method::GET, "/api/dashboard-summary", None, &[], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalRoutes"], 1);
    assert_eq!(summary["totalBookings"], 1);
    assert_eq!(summary["confirmedBookings"], 1);
    assert_eq!(summary["totalIncidents"], 1);
}

#[tokio::test]
async fn test_store_failure_returns_persistence_error() {
    let app = TestApp::new().await;
    app.store.set_failing(true);

    let (status, body) = app.book("S1", "R01", "08:00").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PERSISTENCE_ERROR");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/bookings",
            Some("not-a-jwt"),
            &[],
            Some(json!({ "studentId": "S1", "routeId": "R01", "time": "08:00" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
