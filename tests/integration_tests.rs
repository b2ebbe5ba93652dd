use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use tablier::config::AppConfig;
use tablier::db;
use tablier::services::notify::MailProvider;
use tablier::state::AppState;
use tablier::workflow::TransitionTable;

// ── Mock Mailer ──

struct MockMailer {
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
    fail: bool,
}

impl MockMailer {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }
}

#[async_trait]
impl MailProvider for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<String> {
        if self.fail {
            anyhow::bail!("provider rejected the message");
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok("mock-message-1".to_string())
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
        default_venue: "main".to_string(),
        max_guests: 20,
        default_country_code: "91".to_string(),
        mail_api_url: "http://localhost:0".to_string(),
        mail_api_key: "".to_string(),
        mail_from: "reservations@example.com".to_string(),
        allowed_transitions: None,
    }
}

fn test_state() -> Arc<AppState> {
    test_state_with_mailer(MockMailer::new()).0
}

fn test_state_with_mailer(
    mailer: MockMailer,
) -> (Arc<AppState>, Arc<Mutex<Vec<(String, String, String)>>>) {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    let sent = Arc::clone(&mailer.sent);
    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        mailer: Box::new(mailer),
        transitions: TransitionTable::default(),
    });
    (state, sent)
}

fn app(state: Arc<AppState>) -> Router {
    tablier::router(state)
}

fn booking_body(guests: i32, male: Option<i32>, female: Option<i32>) -> String {
    let mut body = serde_json::json!({
        "name": "A. Guest",
        "email": "a@x.com",
        "phone": "9876543210",
        "date": "2025-06-23",
        "time": "7:00 PM",
        "guests": guests,
    });
    if let Some(m) = male {
        body["male_guests"] = serde_json::json!(m);
    }
    if let Some(f) = female {
        body["female_guests"] = serde_json::json!(f);
    }
    body.to_string()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap()
}

fn admin_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", "Bearer test-token")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Creates a reservation through the public endpoint and returns its id.
async fn create_reservation(state: &Arc<AppState>) -> String {
    let res = app(state.clone())
        .oneshot(post_json(
            "/api/reservations",
            booking_body(2, None, None),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = body_json(res).await;
    assert_eq!(json["status"], "pending");
    json["id"].as_str().unwrap().to_string()
}

// ── Booking Form ──

#[tokio::test]
async fn test_valid_submission_creates_pending_reservation() {
    let state = test_state();
    let id = create_reservation(&state).await;

    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], id.as_str());
    assert_eq!(rows[0]["status"], "pending");
    assert_eq!(rows[0]["name"], "A. Guest");
    assert_ne!(rows[0]["created_at"], "");
}

#[tokio::test]
async fn test_missing_required_field_rejected() {
    let state = test_state();

    let body = serde_json::json!({
        "name": "",
        "email": "a@x.com",
        "phone": "9876543210",
        "date": "2025-06-23",
        "time": "7:00 PM",
        "guests": 2,
    })
    .to_string();

    let res = app(state.clone())
        .oneshot(post_json("/api/reservations", body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(res).await;
    assert!(json["error"].as_str().unwrap().contains("name"));

    // Nothing persisted
    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_time_slot_rejected() {
    let state = test_state();

    let body = serde_json::json!({
        "name": "A. Guest",
        "email": "a@x.com",
        "phone": "9876543210",
        "date": "2025-06-23",
        "time": "3:33 AM",
        "guests": 2,
    })
    .to_string();

    let res = app(state)
        .oneshot(post_json("/api/reservations", body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_gender_mismatch_blocks_submission() {
    let state = test_state();

    let res = app(state.clone())
        .oneshot(post_json(
            "/api/reservations",
            booking_body(4, Some(1), Some(2)),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(res).await;
    assert!(json["error"].as_str().unwrap().contains("add up"));

    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 0, "nothing persisted");
}

#[tokio::test]
async fn test_male_exceeds_female_distinct_error() {
    let state = test_state();

    let res = app(state.clone())
        .oneshot(post_json(
            "/api/reservations",
            booking_body(4, Some(3), Some(1)),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(res).await;
    assert!(
        json["error"].as_str().unwrap().contains("exceed"),
        "expected the male-exceeds-female message, got: {}",
        json["error"]
    );

    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 0, "reservation not created");
}

#[tokio::test]
async fn test_slots_endpoint_lists_enumeration() {
    let state = test_state();
    let res = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/reservations/slots")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let slots: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(slots.contains(&"7:00 PM"));
    assert!(slots.contains(&"12:00 PM"));
}

// ── Admin auth ──

#[tokio::test]
async fn test_admin_requires_auth() {
    let state = test_state();
    let res = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/admin/reservations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_wrong_token() {
    let state = test_state();
    let res = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/admin/status")
                .header("Authorization", "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// ── Status workflow ──

#[tokio::test]
async fn test_confirm_changes_only_status_and_updated_at() {
    let state = test_state();
    let id = create_reservation(&state).await;

    let res = app(state.clone())
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let before = body_json(res).await;
    let before = &before.as_array().unwrap()[0];
    let created_at = before["created_at"].as_str().unwrap().to_string();

    // Let the clock tick so updated_at visibly advances.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let res = app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/status"),
            r#"{"status":"confirmed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["status"], "confirmed");

    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let after = body_json(res).await;
    let after = &after.as_array().unwrap()[0];

    assert_eq!(after["status"], "confirmed");
    assert_eq!(after["name"], "A. Guest");
    assert_eq!(after["email"], "a@x.com");
    assert_eq!(after["phone"], "9876543210");
    assert_eq!(after["date"], "2025-06-23");
    assert_eq!(after["time"], "7:00 PM");
    assert_eq!(after["guests"], 2);
    assert_eq!(after["created_at"], created_at.as_str());
    assert_ne!(after["updated_at"], created_at.as_str());
}

#[tokio::test]
async fn test_disallowed_transition_rejected() {
    let state = test_state();
    let id = create_reservation(&state).await;

    // pending → completed is not in the default table
    let res = app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/status"),
            r#"{"status":"completed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let json = body_json(res).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("pending") && error.contains("completed"));

    // Row untouched
    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap()[0]["status"], "pending");
}

#[tokio::test]
async fn test_no_path_back_to_pending() {
    let state = test_state();
    let id = create_reservation(&state).await;

    for step in ["confirmed", "completed"] {
        let res = app(state.clone())
            .oneshot(admin_post(
                &format!("/api/admin/reservations/{id}/status"),
                &format!(r#"{{"status":"{step}"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = app(state)
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/status"),
            r#"{"status":"pending"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_set_status_unknown_id() {
    let state = test_state();
    let res = app(state)
        .oneshot(admin_post(
            "/api/admin/reservations/no-such-id/status",
            r#"{"status":"confirmed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Notification dispatch ──

#[tokio::test]
async fn test_notify_email_sends_confirmation() {
    let (state, sent) = test_state_with_mailer(MockMailer::new());
    let id = create_reservation(&state).await;

    let res = app(state)
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/notify"),
            r#"{"channel":"email"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["message_id"], "mock-message-1");

    let messages = sent.lock().unwrap();
    assert_eq!(messages.len(), 1);
    let (to, _subject, body) = &messages[0];
    assert_eq!(to, "a@x.com");
    assert!(body.contains("Date: 2025-06-23"));
    assert!(body.contains("Time: 7:00 PM"));
    assert!(!body.contains("Special Requests"), "no dangling section");
    assert!(!body.contains("Add-ons"));
}

#[tokio::test]
async fn test_notify_email_failure_surfaces_to_operator() {
    let mut mailer = MockMailer::new();
    mailer.fail = true;
    let (state, _) = test_state_with_mailer(mailer);
    let id = create_reservation(&state).await;

    let res = app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/notify"),
            r#"{"channel":"email"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    // Reservation unchanged by the failed send
    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap()[0]["status"], "pending");
}

#[tokio::test]
async fn test_notify_deep_link_normalizes_phone() {
    let state = test_state();
    let id = create_reservation(&state).await;

    let res = app(state)
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/notify"),
            r#"{"channel":"deep-link"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let url = json["url"].as_str().unwrap();
    assert!(
        url.starts_with("https://wa.me/919876543210?text="),
        "got: {url}"
    );
    assert!(!url.contains(' '));
}

#[tokio::test]
async fn test_notify_unknown_id() {
    let state = test_state();
    let res = app(state)
        .oneshot(admin_post(
            "/api/admin/reservations/no-such-id/notify",
            r#"{"channel":"email"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Admin console ──

#[tokio::test]
async fn test_empty_list_is_ok() {
    let state = test_state();
    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_status_filter() {
    let state = test_state();
    let id = create_reservation(&state).await;
    create_reservation(&state).await;

    let res = app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/status"),
            r#"{"status":"confirmed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app(state)
        .oneshot(admin_get("/api/admin/reservations?status=confirmed"))
        .await
        .unwrap();
    let json = body_json(res).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_admin_status_counts() {
    let state = test_state();
    let id = create_reservation(&state).await;
    create_reservation(&state).await;

    app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/status"),
            r#"{"status":"cancelled"}"#,
        ))
        .await
        .unwrap();

    let res = app(state)
        .oneshot(admin_get("/api/admin/status"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["venue_id"], "main");
    assert_eq!(json["pending"], 1);
    assert_eq!(json["cancelled"], 1);
    assert_eq!(json["confirmed"], 0);
}

#[tokio::test]
async fn test_assign_table_shows_in_notification() {
    let (state, sent) = test_state_with_mailer(MockMailer::new());
    let id = create_reservation(&state).await;

    let res = app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/table"),
            r#"{"table_number":"T4"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app(state)
        .oneshot(admin_post(
            &format!("/api/admin/reservations/{id}/notify"),
            r#"{"channel":"email"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let messages = sent.lock().unwrap();
    assert!(messages[0].2.contains("Table Number: T4"));
}

// ── Venue scoping ──

#[tokio::test]
async fn test_venue_scoping_isolates_tenants() {
    let state = test_state();

    let mut body: serde_json::Value =
        serde_json::from_str(&booking_body(2, None, None)).unwrap();
    body["venue_id"] = serde_json::json!("rooftop");
    let res = app(state.clone())
        .oneshot(post_json("/api/reservations", body.to_string()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Default venue sees nothing
    let res = app(state.clone())
        .oneshot(admin_get("/api/admin/reservations"))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 0);

    // The rooftop venue sees the row
    let res = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/admin/reservations")
                .header("Authorization", "Bearer test-token")
                .header("x-venue-id", "rooftop")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(res).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["venue_id"], "rooftop");
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let res = app(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
