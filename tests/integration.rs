//! End-to-end tests for the leave engine HTTP API.
//!
//! This test suite drives the router the way a client would:
//! - Decomposition around holidays and weekends
//! - Self, team and approver views
//! - Per-record approval outcomes
//! - Session isolation between concurrent users
//! - Holiday lookup

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use leave_engine::api::{AppState, SESSION_HEADER, create_router};
use leave_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

async fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/leave").expect("Failed to load config");
    let state = AppState::new(config).await.expect("Failed to build state");
    create_router(state)
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = session {
        builder = builder.header(SESSION_HEADER, token);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn post(router: &Router, uri: &str, session: &str, body: Value) -> (StatusCode, Value) {
    call(router, "POST", uri, Some(session), Some(body)).await
}

async fn login(router: &Router, username: &str) -> String {
    let (status, body) = call(
        router,
        "POST",
        "/login",
        None,
        Some(json!({ "username": username })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}: {}", username, body);
    body["session_id"].as_str().unwrap().to_string()
}

async fn apply(router: &Router, session: &str, username: &str, leaves: Value) -> Value {
    let (status, body) = post(
        router,
        "/leaves/apply",
        session,
        json!({ "username": username, "leaves": leaves }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "apply failed: {}", body);
    body
}

fn spans(records: &Value) -> Vec<(String, String)> {
    records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["start_date"].as_str().unwrap().to_string(),
                r["end_date"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn span(start: &str, end: &str) -> (String, String) {
    (start.to_string(), end.to_string())
}

fn record_count(documents: &Value) -> usize {
    documents
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["leaves"].as_array().unwrap().len())
        .sum()
}

fn usernames(documents: &Value) -> Vec<String> {
    let mut names: Vec<String> = documents
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["username"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Decomposition
// =============================================================================

#[tokio::test]
async fn test_week_with_midweek_holiday_becomes_two_records() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;

    // Mon 2026-03-02 to Fri 2026-03-06, Holi on Wednesday
    let body = apply(
        &router,
        &asha,
        "asha",
        json!([{ "start_date": "2026-03-02", "end_date": "2026-03-06" }]),
    )
    .await;

    assert_eq!(body["matched_count"], 1);
    assert_eq!(
        spans(&body["records"]),
        vec![
            span("2026-03-02", "2026-03-03"),
            span("2026-03-05", "2026-03-06")
        ]
    );
    for record in body["records"].as_array().unwrap() {
        assert!(record["approved"].is_null());
        assert_eq!(record["approver"], "ravi");
    }
}

#[tokio::test]
async fn test_friday_to_monday_skips_weekend() {
    let router = create_router_for_test().await;
    let chen = login(&router, "chen").await;

    let body = apply(
        &router,
        &chen,
        "chen",
        json!([{ "start_date": "2026-01-16", "end_date": "2026-01-19" }]),
    )
    .await;

    assert_eq!(
        spans(&body["records"]),
        vec![
            span("2026-01-16", "2026-01-16"),
            span("2026-01-19", "2026-01-19")
        ]
    );
    assert_eq!(body["records"][0]["approver"], "meera");
}

#[tokio::test]
async fn test_leave_on_a_holiday_produces_no_records() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;

    // Republic Day
    let body = apply(
        &router,
        &asha,
        "asha",
        json!([{ "start_date": "2026-01-26", "end_date": "2026-01-26" }]),
    )
    .await;

    assert_eq!(body["matched_count"], 1);
    assert!(body["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_multiple_intervals_keep_submission_order() {
    let router = create_router_for_test().await;
    let bilal = login(&router, "bilal").await;

    let body = apply(
        &router,
        &bilal,
        "bilal",
        json!([
            { "start_date": "2026-03-02", "end_date": "2026-03-02" },
            { "start_date": "2026-01-12", "end_date": "2026-01-16" }
        ]),
    )
    .await;

    assert_eq!(
        spans(&body["records"]),
        vec![
            span("2026-03-02", "2026-03-02"),
            span("2026-01-12", "2026-01-16")
        ]
    );
}

#[tokio::test]
async fn test_inverted_interval_aborts_whole_application() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;

    let (status, body) = post(
        &router,
        "/leaves/apply",
        &asha,
        json!({
            "username": "asha",
            "leaves": [
                { "start_date": "2026-01-12", "end_date": "2026-01-16" },
                { "start_date": "2026-01-23", "end_date": "2026-01-19" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RANGE");

    // Nothing from the valid first interval was stored
    let (status, documents) = call(&router, "GET", "/leaves", Some(&asha), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record_count(&documents), 0);
}

#[tokio::test]
async fn test_applied_records_appear_in_self_view() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;

    apply(
        &router,
        &asha,
        "asha",
        json!([{ "start_date": "2026-03-02", "end_date": "2026-03-06" }]),
    )
    .await;
    apply(
        &router,
        &asha,
        "asha",
        json!([{ "start_date": "2026-01-19", "end_date": "2026-01-19" }]),
    )
    .await;

    let (status, documents) = call(&router, "GET", "/leaves", Some(&asha), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&documents), vec!["asha"]);
    assert_eq!(record_count(&documents), 3);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_concurrent_sessions_keep_their_own_identity() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;
    let chen = login(&router, "chen").await;

    // A later login must not change what an earlier session sees
    let (_, asha_view) = call(&router, "GET", "/leaves", Some(&asha), None).await;
    let (_, chen_view) = call(&router, "GET", "/leaves", Some(&chen), None).await;

    assert_eq!(usernames(&asha_view), vec!["asha"]);
    assert_eq!(usernames(&chen_view), vec!["chen"]);
}

#[tokio::test]
async fn test_logout_only_closes_own_session() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;
    let chen = login(&router, "chen").await;

    let (status, _) = call(&router, "POST", "/logout", Some(&asha), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&router, "GET", "/leaves", Some(&asha), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&router, "GET", "/leaves", Some(&chen), None).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Team view
// =============================================================================

#[tokio::test]
async fn test_team_view_lists_every_team_member() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;
    let bilal = login(&router, "bilal").await;

    apply(
        &router,
        &bilal,
        "bilal",
        json!([{ "start_date": "2026-01-19", "end_date": "2026-01-23" }]),
    )
    .await;

    let (status, documents) = post(
        &router,
        "/leaves/team",
        &asha,
        json!({ "username": "asha", "team": "platform" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&documents), vec!["asha", "bilal", "ravi"]);
    assert_eq!(record_count(&documents), 1);
}

#[tokio::test]
async fn test_team_view_rejects_mismatched_caller() {
    let router = create_router_for_test().await;
    let chen = login(&router, "chen").await;

    let (status, body) = post(
        &router,
        "/leaves/team",
        &chen,
        json!({ "username": "bilal", "team": "platform" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_team_view_uses_verified_team() {
    let router = create_router_for_test().await;
    let chen = login(&router, "chen").await;

    // chen claims to be on platform but the session says payments
    let (status, documents) = post(
        &router,
        "/leaves/team",
        &chen,
        json!({ "username": "chen", "team": "platform" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&documents), vec!["chen"]);
}

// =============================================================================
// Approval and approver view
// =============================================================================

#[tokio::test]
async fn test_approval_flow_reports_each_decision() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;
    let bilal = login(&router, "bilal").await;
    let ravi = login(&router, "ravi").await;

    let asha_body = apply(
        &router,
        &asha,
        "asha",
        json!([{ "start_date": "2026-03-02", "end_date": "2026-03-06" }]),
    )
    .await;
    let bilal_body = apply(
        &router,
        &bilal,
        "bilal",
        json!([{ "start_date": "2026-01-19", "end_date": "2026-01-23" }]),
    )
    .await;

    let first = asha_body["records"][0]["id"].clone();
    let second = asha_body["records"][1]["id"].clone();
    let unknown = json!("9b2f7a3e-1c55-4e0a-8d6f-2a9c1b7e4d10");

    let (status, body) = post(
        &router,
        "/leaves/approve",
        &ravi,
        json!({
            "username": "asha",
            "decisions": [
                { "leave_id": first, "approved": true },
                { "leave_id": unknown, "approved": true },
                { "leave_id": first, "approved": false }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reports = body["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["outcome"], "applied");
    assert_eq!(reports[0]["state"], true);
    assert_eq!(reports[1]["outcome"], "not_found");
    // The first decision wins
    assert_eq!(reports[2]["outcome"], "already_decided");
    assert_eq!(reports[2]["state"], true);

    let bilal_record = bilal_body["records"][0]["id"].clone();
    let (status, body) = post(
        &router,
        "/leaves/approve",
        &ravi,
        json!({
            "username": "bilal",
            "decisions": [{ "leave_id": bilal_record, "approved": false }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reports"][0]["state"], false);

    // Asha's second record is untouched
    let (_, documents) = call(&router, "GET", "/leaves", Some(&asha), None).await;
    let leaves = documents[0]["leaves"].as_array().unwrap();
    let untouched = leaves.iter().find(|r| r["id"] == second).unwrap();
    assert!(untouched["approved"].is_null());
}

#[tokio::test]
async fn test_approver_view_filters_partition_unfiltered_view() {
    let router = create_router_for_test().await;
    let asha = login(&router, "asha").await;
    let bilal = login(&router, "bilal").await;
    let ravi = login(&router, "ravi").await;

    let asha_body = apply(
        &router,
        &asha,
        "asha",
        json!([{ "start_date": "2026-03-02", "end_date": "2026-03-06" }]),
    )
    .await;
    let bilal_body = apply(
        &router,
        &bilal,
        "bilal",
        json!([{ "start_date": "2026-01-19", "end_date": "2026-01-23" }]),
    )
    .await;

    post(
        &router,
        "/leaves/approve",
        &ravi,
        json!({
            "username": "asha",
            "decisions": [{ "leave_id": asha_body["records"][0]["id"], "approved": true }]
        }),
    )
    .await;
    post(
        &router,
        "/leaves/approve",
        &ravi,
        json!({
            "username": "bilal",
            "decisions": [{ "leave_id": bilal_body["records"][0]["id"], "approved": false }]
        }),
    )
    .await;

    let view = |status: Option<&str>| {
        let body = match status {
            Some(s) => json!({ "approver_name": "ravi", "status": s }),
            None => json!({ "approver_name": "ravi" }),
        };
        let router = router.clone();
        let ravi = ravi.clone();
        async move { post(&router, "/leaves/applications", &ravi, body).await }
    };

    let (status, all) = view(None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&all), vec!["asha", "bilal"]);
    assert_eq!(record_count(&all), 3);

    let (_, approved) = view(Some("approved")).await;
    assert_eq!(usernames(&approved), vec!["asha"]);
    assert_eq!(record_count(&approved), 1);

    let (_, rejected) = view(Some("rejected")).await;
    assert_eq!(usernames(&rejected), vec!["bilal"]);
    assert_eq!(record_count(&rejected), 1);

    let (_, pending) = view(Some("pending")).await;
    assert_eq!(usernames(&pending), vec!["asha"]);
    assert_eq!(record_count(&pending), 1);

    assert_eq!(
        record_count(&approved) + record_count(&rejected) + record_count(&pending),
        record_count(&all)
    );
}

#[tokio::test]
async fn test_approver_view_only_shows_assigned_records() {
    let router = create_router_for_test().await;
    let ravi = login(&router, "ravi").await;
    let meera = login(&router, "meera").await;

    // Ravi's own leave goes to meera
    apply(
        &router,
        &ravi,
        "ravi",
        json!([{ "start_date": "2026-01-12", "end_date": "2026-01-13" }]),
    )
    .await;

    let (status, _) = post(
        &router,
        "/leaves/applications",
        &ravi,
        json!({ "approver_name": "ravi" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, documents) = post(
        &router,
        "/leaves/applications",
        &meera,
        json!({ "approver_name": "meera", "status": "pending" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&documents), vec!["ravi"]);
    assert_eq!(documents[0]["leaves"][0]["approver"], "meera");
}

#[tokio::test]
async fn test_approver_view_with_no_matching_state_is_not_found() {
    let router = create_router_for_test().await;
    let chen = login(&router, "chen").await;
    let meera = login(&router, "meera").await;

    apply(
        &router,
        &chen,
        "chen",
        json!([{ "start_date": "2026-01-12", "end_date": "2026-01-12" }]),
    )
    .await;

    let (status, body) = post(
        &router,
        "/leaves/applications",
        &meera,
        json!({ "approver_name": "meera", "status": "approved" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Holidays
// =============================================================================

#[tokio::test]
async fn test_holidays_endpoint_lists_configured_calendar() {
    let router = create_router_for_test().await;

    let (status, body) = call(
        &router,
        "POST",
        "/holidays",
        None,
        Some(json!({ "country": "IN", "year": 2026 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let holidays = body.as_array().unwrap();
    assert_eq!(holidays.len(), 7);
    assert!(
        holidays
            .iter()
            .any(|h| h["date"] == "2026-03-04" && h["name"] == "Holi")
    );
}

#[tokio::test]
async fn test_holidays_for_unknown_year_is_empty() {
    let router = create_router_for_test().await;

    let (status, body) = call(
        &router,
        "POST",
        "/holidays",
        None,
        Some(json!({ "country": "IN", "year": 1999 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
