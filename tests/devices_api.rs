mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use device_manager::db::queries;
use device_manager::domain::DeviceState;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

use common::{seed, test_app, test_pool};

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // Extractor rejections answer in plain text
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        location,
        body,
    }
}

async fn stored_state(pool: &SqlitePool, id: &str) -> Option<i64> {
    queries::get_device(pool, id)
        .await
        .unwrap()
        .map(|row| row.state)
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_success() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let call_time = Utc::now().trunc_subsecs(6);

    let response = send(
        &app,
        Method::POST,
        "/devices",
        Some(json!({ "name": "Test name", "brand": "Test brand" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&id).is_ok());
    assert_eq!(response.location, Some(format!("/devices/{}", id)));

    let row = queries::get_device(&pool, &id).await.unwrap().unwrap();
    assert_eq!(row.name.as_deref(), Some("Test name"));
    assert_eq!(row.brand.as_deref(), Some("Test brand"));
    assert_eq!(row.state, DeviceState::Available.code());
    assert!(row.creation_time >= call_time);
}

#[tokio::test]
async fn create_accepts_state_in_any_case() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());

    for label in ["in-use", "IN-USE"] {
        let response = send(
            &app,
            Method::POST,
            "/devices",
            Some(json!({ "name": "n", "brand": "b", "state": label })),
        )
        .await;

        assert_eq!(response.status, StatusCode::CREATED);
        let id = response.body["id"].as_str().unwrap();
        assert_eq!(stored_state(&pool, id).await, Some(DeviceState::InUse.code()));
    }
}

#[tokio::test]
async fn create_with_unknown_state_is_rejected() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());

    let response = send(
        &app,
        Method::POST,
        "/devices",
        Some(json!({ "name": "n", "brand": "b", "state": "unknown" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["title"], "Invalid state");
    assert_eq!(
        response.body["detail"],
        "Invalid device state: 'unknown'. Use: available, in-use, inactive"
    );
}

#[tokio::test]
async fn create_without_fields_stores_nulls() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());

    let response = send(&app, Method::POST, "/devices", Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_str().unwrap();
    let row = queries::get_device(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.name, None);
    assert_eq!(row.brand, None);
}

// ─── Read ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_returns_summary() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let device = seed(&pool, "Phone", "Acme", DeviceState::Inactive, Utc::now()).await;

    let response = send(&app, Method::GET, &format!("/devices/{}", device.id()), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], device.id().to_string());
    assert_eq!(response.body["name"], "Phone");
    assert_eq!(response.body["brand"], "Acme");
    assert_eq!(response.body["state"], "inactive");
    assert!(response.body["creationTime"].is_string());
}

#[tokio::test]
async fn get_missing_device_is_404() {
    let app = test_app(test_pool().await);

    let response = send(&app, Method::GET, &format!("/devices/{}", Uuid::new_v4()), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_with_malformed_id_is_rejected() {
    let app = test_app(test_pool().await);

    let response = send(&app, Method::GET, "/devices/not-a-uuid", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.is_string());
}

// ─── List ────────────────────────────────────────────────────────────────────

async fn seed_six(pool: &SqlitePool) -> DateTime<Utc> {
    let base = Utc::now() - Duration::hours(1);
    let fixtures = [
        ("d0", "Acme", DeviceState::Available),
        ("d1", "Acme", DeviceState::InUse),
        ("d2", "Globex", DeviceState::Inactive),
        ("d3", "Globex", DeviceState::InUse),
        ("d4", "Acme", DeviceState::Available),
        ("d5", "Initech", DeviceState::Inactive),
    ];
    for (i, (name, brand, state)) in fixtures.into_iter().enumerate() {
        seed(pool, name, brand, state, base + Duration::minutes(i as i64)).await;
    }
    base
}

fn names(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn list_filters_by_state() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    seed_six(&pool).await;

    let response = send(&app, Method::GET, "/devices?state=in-use", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalCount"], 2);
    assert_eq!(names(&response.body), vec!["d3", "d1"]);
    for item in response.body["items"].as_array().unwrap() {
        assert_eq!(item["state"], "in-use");
    }
}

#[tokio::test]
async fn list_defaults_return_everything_newest_first() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    seed_six(&pool).await;

    let response = send(&app, Method::GET, "/devices", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(names(&response.body), vec!["d5", "d4", "d3", "d2", "d1", "d0"]);
}

#[tokio::test]
async fn list_filters_by_brand_and_pages() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    seed_six(&pool).await;

    let first = send(&app, Method::GET, "/devices?brand=Acme&page=1&pageSize=2", None).await;
    let second = send(&app, Method::GET, "/devices?brand=Acme&page=2&pageSize=2", None).await;

    assert_eq!(names(&first.body), vec!["d4", "d1"]);
    assert_eq!(names(&second.body), vec!["d0"]);
    assert_eq!(second.body["totalCount"], 1);
}

async fn seed_many(pool: &SqlitePool, count: i64) {
    let base = Utc::now() - Duration::hours(1);
    for i in 0..count {
        seed(pool, &format!("bulk {}", i), "Bulk", DeviceState::Available, base + Duration::seconds(i)).await;
    }
}

#[tokio::test]
async fn list_honours_page_size_above_default() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    seed_many(&pool, 60).await;

    let response = send(&app, Method::GET, "/devices?pageSize=60", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 60);
    assert_eq!(response.body["totalCount"], 60);
}

#[tokio::test]
async fn list_without_page_size_uses_default() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    seed_many(&pool, 60).await;

    let response = send(&app, Method::GET, "/devices", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalCount"], 50);
}

#[tokio::test]
async fn list_with_unknown_state_is_rejected() {
    let app = test_app(test_pool().await);

    let response = send(&app, Method::GET, "/devices?state=broken", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["detail"],
        "Invalid device state: 'broken'. Use: available, in-use, inactive"
    );
}

#[tokio::test]
async fn list_with_non_positive_page_is_rejected() {
    let app = test_app(test_pool().await);

    let response = send(&app, Method::GET, "/devices?page=0", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_state_only_keeps_name_and_brand() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let device = seed(&pool, "Phone", "Acme", DeviceState::Available, Utc::now()).await;
    let uri = format!("/devices/{}", device.id());

    let response = send(&app, Method::PUT, &uri, Some(json!({ "state": "inactive" }))).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let body = send(&app, Method::GET, &uri, None).await.body;
    assert_eq!(body["name"], "Phone");
    assert_eq!(body["brand"], "Acme");
    assert_eq!(body["state"], "inactive");
}

#[tokio::test]
async fn update_rename_and_mark_in_use_together() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let device = seed(&pool, "Old", "Acme", DeviceState::Available, Utc::now()).await;
    let uri = format!("/devices/{}", device.id());

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "New", "state": "in-use" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let body = send(&app, Method::GET, &uri, None).await.body;
    assert_eq!(body["name"], "New");
    assert_eq!(body["state"], "in-use");
}

#[tokio::test]
async fn update_of_in_use_device_changes_nothing() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let device = seed(&pool, "Locked", "Acme", DeviceState::InUse, Utc::now()).await;
    let uri = format!("/devices/{}", device.id());

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Renamed", "state": "available" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["detail"], "Cannot rename a device that is in use.");
    let body = send(&app, Method::GET, &uri, None).await.body;
    assert_eq!(body["name"], "Locked");
    assert_eq!(body["state"], "in-use");
}

#[tokio::test]
async fn update_state_of_in_use_device_is_allowed() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let device = seed(&pool, "Locked", "Acme", DeviceState::InUse, Utc::now()).await;
    let uri = format!("/devices/{}", device.id());

    let response = send(&app, Method::PUT, &uri, Some(json!({ "state": "available" }))).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(
        stored_state(&pool, &device.id().to_string()).await,
        Some(DeviceState::Available.code())
    );
}

#[tokio::test]
async fn update_missing_device_is_404() {
    let app = test_app(test_pool().await);

    let response = send(
        &app,
        Method::PUT,
        &format!("/devices/{}", Uuid::new_v4()),
        Some(json!({ "name": "x" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_unknown_state_is_rejected_before_loading() {
    let app = test_app(test_pool().await);

    let response = send(
        &app,
        Method::PUT,
        &format!("/devices/{}", Uuid::new_v4()),
        Some(json!({ "state": "nope" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_in_use_device_is_refused() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let device = seed(&pool, "Busy", "Acme", DeviceState::InUse, Utc::now()).await;

    let response = send(&app, Method::DELETE, &format!("/devices/{}", device.id()), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["detail"], "Cannot delete a device that is in use.");
    assert!(stored_state(&pool, &device.id().to_string()).await.is_some());
}

#[tokio::test]
async fn delete_available_device() {
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let device = seed(&pool, "Spare", "Acme", DeviceState::Available, Utc::now()).await;
    let uri = format!("/devices/{}", device.id());

    let response = send(&app, Method::DELETE, &uri, None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, Method::GET, &uri, None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_device_is_404() {
    let app = test_app(test_pool().await);

    let response = send(&app, Method::DELETE, &format!("/devices/{}", Uuid::new_v4()), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app(test_pool().await);

    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
