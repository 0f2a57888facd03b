//! Router-level test harness: tempfile SQLite, optional wiremock calendar.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use openhouse_api::{routes, AppContext};
use openhouse_domain::Config;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub router: Router,
    pub context: Arc<AppContext>,
    _dir: TempDir,
}

/// Application over a fresh database, calendar integration disabled.
pub fn spawn_app() -> TestApp {
    spawn_with(|_| {})
}

/// Application wired against a mock calendar server.
pub fn spawn_app_with_calendar(server: &MockServer) -> TestApp {
    let uri = server.uri();
    spawn_with(move |config| {
        config.calendar.enabled = true;
        config.calendar.client_id = Some("client-id".into());
        config.calendar.client_secret = Some("client-secret".into());
        config.calendar.refresh_token = Some("refresh-token".into());
        config.calendar.api_base = Some(uri.clone());
        config.calendar.token_url = Some(format!("{uri}/token"));
    })
}

fn spawn_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let mut config = Config::default();
    config.database.path = dir.path().join("test.db").to_string_lossy().into_owned();
    config.calendar.enabled = false;
    customize(&mut config);

    let context = Arc::new(AppContext::new(config).expect("context"));
    TestApp { router: routes::router(context.clone()), context, _dir: dir }
}

/// Mount the token endpoint plus a free calendar (empty busy list) and a
/// working event-insert endpoint.
pub async fn mount_free_calendar(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/freeBusy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "calendars": { "jane@agency.com": { "busy": [] } }
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/calendars/jane@agency.com/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt-1",
            "htmlLink": "https://calendar.example/evt-1",
        })))
        .mount(server)
        .await;
}

/// Drive one request through the router and decode the JSON body.
pub async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request built");

    let response = router.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collected");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// A bookable agent payload working every day of the week, UTC 09:00-17:00.
pub fn agent_payload(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "calendar_id": email,
        "working_days": [
            "monday", "tuesday", "wednesday", "thursday", "friday",
            "saturday", "sunday"
        ],
        "working_hours": { "start": "09:00:00", "end": "17:00:00" },
        "meeting_duration_min": 60,
        "buffer_min": 15,
        "timezone": "UTC",
        "is_active": true,
    })
}

pub fn property_payload(address: &str) -> Value {
    json!({
        "address": address,
        "price": 450000.0,
        "bedrooms": 3,
        "bathrooms": 2.0,
        "sqft": 1600,
        "property_type": "house",
    })
}

pub fn booking_payload(name: &str, email: &str, property_id: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "+15550100",
        "property_id": property_id,
    })
}

/// Seed a property through the API, returning its id.
pub async fn seed_property(router: &Router, address: &str) -> String {
    let (status, body) =
        request(router, Method::POST, "/api/properties", Some(property_payload(address))).await;
    assert_eq!(status, StatusCode::CREATED, "property seeded: {body}");
    body["property"]["id"].as_str().expect("property id").to_string()
}

/// Seed an agent through the API.
pub async fn seed_agent(router: &Router, name: &str, email: &str) {
    let (status, body) =
        request(router, Method::POST, "/api/agents", Some(agent_payload(name, email))).await;
    assert_eq!(status, StatusCode::CREATED, "agent seeded: {body}");
}
