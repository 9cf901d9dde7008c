use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use docrest::memory::InMemoryStore;
use docrest::store::DocumentStore;
use docrest_server::config::StoreBackendKind;
use docrest_server::{AppConfig, AppState, build_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let config = AppConfig {
        store_backend: StoreBackendKind::Memory,
        ..AppConfig::default()
    };
    let store = DocumentStore::new(InMemoryStore::new());

    build_router(Arc::new(AppState::new(config, store)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn timestamp(value: &Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(value.as_str().unwrap()).unwrap()
}

fn alice() -> Value {
    json!({
        "name": "Alice",
        "title": "Capt",
        "rank": 1,
        "points": 0,
        "attack": { "pistol": 1, "bomb": 0, "dynamite": 0 },
        "defence": 2,
        "status": "Scull",
        "matches": 0,
        "won": 0,
        "approval": "Pending",
        "profile_image": "x",
    })
}

fn named(name: &str, status: &str) -> Value {
    let mut user = alice();
    user["name"] = json!(name);
    user["status"] = json!(status);
    user
}

#[tokio::test]
async fn test_create_then_update_scenario() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/users/", Some(alice())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("User created successfully"));

    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["data"]["created_at"], body["data"]["updated_at"]);
    assert_eq!(body["data"]["attack"]["pistol"], json!(1));

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/users/{id}"),
        Some(json!({ "points": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], json!("User updated successfully"));
    assert_eq!(updated["data"]["points"], json!(5));
    assert_eq!(updated["data"]["name"], json!("Alice"));
    assert_eq!(updated["data"]["created_at"], body["data"]["created_at"]);
    assert!(timestamp(&updated["data"]["updated_at"]) > timestamp(&updated["data"]["created_at"]));

    let (status, fetched) = send(&app, Method::GET, &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["message"], json!("User retrieved successfully"));
    assert_eq!(fetched["data"], updated["data"]);
}

#[tokio::test]
async fn test_rapid_updates_keep_advancing_updated_at() {
    let app = app();

    let (_, body) = send(&app, Method::POST, "/api/users", Some(alice())).await;
    let uri = format!("/api/users/{}", body["data"]["id"].as_str().unwrap());
    let mut previous = timestamp(&body["data"]["updated_at"]);

    for points in [1, 2] {
        let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "points": points }))).await;
        assert_eq!(status, StatusCode::OK);

        let stamp = timestamp(&updated["data"]["updated_at"]);
        assert!(stamp > previous);
        previous = stamp;
    }
}

#[tokio::test]
async fn test_create_validation_failures_are_400() {
    let app = app();

    let mut negative = alice();
    negative["rank"] = json!(-1);
    let (status, body) = send(&app, Method::POST, "/api/users", Some(negative)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert!(body["message"].as_str().unwrap().contains("rank"));

    let mut forged = alice();
    forged["id"] = json!("abc");
    let (status, body) = send(&app, Method::POST, "/api/users", Some(forged)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));

    let (status, body) = send(&app, Method::POST, "/api/users", Some(named("Bob", "Free"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/users")
                .header("content-type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_missing_users_are_404() {
    let app = app();

    for id in ["not-an-id", "65a1b2c3d4e5f60718293a4b"] {
        let uri = format!("/api/users/{id}");

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("User not found"));
        assert_eq!(body["code"], json!("NOT_FOUND"));

        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "points": 1 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_list_pagination_and_search() {
    let app = app();

    for (name, status) in [
        ("Ripple Rick", "Scull"),
        ("Bob", "Ripple"),
        ("Carol", "Jail"),
        ("Dave", "Scull"),
        ("Erin", "Jail"),
    ] {
        let (code, _) = send(&app, Method::POST, "/api/users", Some(named(name, status))).await;
        assert_eq!(code, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::GET, "/api/users?skip=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Users retrieved successfully"));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["name"], json!("Carol"));
    assert_eq!(
        body["pagination"],
        json!({ "page": 2, "size": 2, "total": 5, "pages": 3 })
    );

    let (_, body) = send(&app, Method::GET, "/api/users?search=RIPPLE", None).await;
    let names = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Ripple Rick", "Bob"]);
    assert_eq!(body["pagination"]["total"], json!(5));
}

#[tokio::test]
async fn test_empty_list_and_bad_params() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "size": 100, "total": 0, "pages": 0 })
    );

    let (status, body) = send(&app, Method::GET, "/api/users?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));

    let (status, _) = send(&app, Method::GET, "/api/users?limit=1001", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/users?skip=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/users?skip=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_delete_removes_user() {
    let app = app();

    let (_, body) = send(&app, Method::POST, "/api/users", Some(alice())).await;
    let uri = format!("/api/users/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "User deleted successfully" })
    );

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_routes_and_fallback() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["message"], json!("PadelUG API is running!"));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ready"));

    let (status, body) = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
