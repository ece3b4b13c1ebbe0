use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{JwtVerifier, ServerState};

const SECRET: &[u8] = b"api-test-secret";
const AUDIENCE: &str = "https://expenses.test/api";

async fn app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    server::router(ServerState {
        engine: Arc::new(engine),
        verifier: Arc::new(JwtVerifier::hs256(SECRET, AUDIENCE, None)),
    })
}

fn token_for(user: &str) -> String {
    let claims = json!({
        "sub": user,
        "aud": AUDIENCE,
        "exp": Utc::now().timestamp() + 3600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn coffee() -> Value {
    json!({
        "type": "Expense",
        "title": "Coffee",
        "amount": 4.5,
        "category": "Food",
        "date": "2024-01-01",
        "notes": ""
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(user)));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn root_reports_running_without_auth() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense Tracker Backend Running");
}

#[tokio::test]
async fn create_then_list_is_scoped_to_the_caller() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/api/expenses", Some("abc"), Some(coffee())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Expense created successfully");
    assert_eq!(body["data"]["userId"], "abc");
    let created = body["data"].clone();

    let (status, body) = send(&app, "GET", "/api/expenses", Some("xyz"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(&app, "GET", "/api/expenses", Some("abc"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0], created);
    assert_eq!(body["data"][0]["title"], "Coffee");
    assert_eq!(body["data"][0]["amount"], 4.5);
    assert_eq!(body["data"][0]["notes"], "");
    assert_eq!(body["data"][0]["date"], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn client_supplied_owner_is_overridden() {
    let app = app().await;
    let mut payload = coffee();
    payload["userId"] = json!("victim");

    let (status, body) = send(&app, "POST", "/api/expenses", Some("abc"), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["userId"], "abc");

    let (_, body) = send(&app, "GET", "/api/expenses", Some("victim"), None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn requests_without_valid_credentials_are_unauthorized() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/expenses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .uri("/api/expenses")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/api/expenses", None, Some(coffee())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_payload_is_rejected_with_first_rule() {
    let app = app().await;
    let mut payload = coffee();
    payload["amount"] = json!(-5);
    payload["category"] = json!("Rent");

    let (status, body) = send(&app, "POST", "/api/expenses", Some("abc"), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"amount\" must be a positive number");

    let (_, body) = send(&app, "GET", "/api/expenses", Some("abc"), None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/expenses")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for("abc")))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_replaces_owned_record() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/api/expenses", Some("abc"), Some(coffee())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let created_at = body["data"]["createdAt"].clone();

    let mut payload = coffee();
    payload["title"] = json!("Espresso");
    payload["amount"] = json!(3);
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/expenses/{id}"),
        Some("abc"),
        Some(payload),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense updated successfully");
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["title"], "Espresso");
    assert_eq!(body["data"]["amount"], 3.0);
    assert_eq!(body["data"]["createdAt"], created_at);
}

#[tokio::test]
async fn invalid_update_is_rejected_before_lookup() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/api/expenses", Some("abc"), Some(coffee())).await;
    let created = body["data"].clone();
    let id = created["id"].as_str().unwrap().to_string();

    let mut payload = coffee();
    payload["amount"] = json!(0);

    let uri = format!("/api/expenses/{id}");
    let (status, body) = send(&app, "PUT", &uri, Some("abc"), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"amount\" must be a positive number");

    let (_, body) = send(&app, "GET", "/api/expenses", Some("abc"), None).await;
    assert_eq!(body["data"][0], created);

    let missing = "/api/expenses/00000000-0000-4000-8000-000000000000";
    let (status, body) = send(&app, "PUT", missing, Some("abc"), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"amount\" must be a positive number");
}

#[tokio::test]
async fn update_and_delete_of_foreign_records_are_not_found() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/api/expenses", Some("abc"), Some(coffee())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/expenses/{id}");

    let (status, body) = send(&app, "PUT", &uri, Some("xyz"), Some(coffee())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");

    let (status, body) = send(&app, "DELETE", &uri, Some("xyz"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");

    let (_, body) = send(&app, "GET", "/api/expenses", Some("abc"), None).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn delete_succeeds_once() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/api/expenses", Some("abc"), Some(coffee())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/expenses/{id}");

    let (status, body) = send(&app, "DELETE", &uri, Some("abc"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense deleted successfully");
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, _) = send(&app, "DELETE", &uri, Some("abc"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_uuid_ids_are_not_found() {
    let app = app().await;
    let (status, body) = send(&app, "DELETE", "/api/expenses/12345", Some("abc"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");
}
