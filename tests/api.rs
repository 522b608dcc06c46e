use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use contact_service::adapters::mail_relay::{MailRelay, OutgoingEmail};
use contact_service::api;
use contact_service::common::state::AppState;
use contact_service::repositories::credentials::CredentialStore;
use contact_service::repositories::messages;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct FakeRelay {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl MailRelay for FakeRelay {
    fn sender_name(&self) -> &str {
        "SK Digitale"
    }

    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("connection refused");
        }
        self.sent.lock().unwrap().push(email.to.clone());
        Ok(())
    }
}

async fn app(relay: Option<Arc<FakeRelay>>) -> Router {
    app_with_password_file(relay).await.0
}

async fn app_with_password_file(relay: Option<Arc<FakeRelay>>) -> (Router, PathBuf) {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    messages::initialize_schema(&db).await.unwrap();
    let password_file =
        std::env::temp_dir().join(format!("contact-service-api-{}.pw", uuid::Uuid::new_v4()));
    let state = AppState {
        db,
        credentials: Arc::new(CredentialStore::new(
            "admin".to_string(),
            "1234".to_string(),
            password_file.clone(),
            4,
        )),
        mail_relay: relay.map(|relay| relay as Arc<dyn MailRelay>),
    };
    (api::app(state), password_file)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn submit(app: &Router, name: &str, subject: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/messages",
        Some(json!({
            "name": name,
            "email": format!("{}@x.com", name.to_lowercase()),
            "subject": subject,
            "body": "Bonjour",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn message_lifecycle() {
    let app = app(None).await;
    submit(&app, "Marie", "Question").await;
    let id = submit(&app, "Jean", "Devis").await;

    let (status, listed) = call(&app, Method::GET, "/api/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"], id.as_str());
    assert_eq!(listed[0]["isRead"], false);

    let (_, before) = call(&app, Method::GET, "/api/messages/stats/summary", None).await;
    assert_eq!(before["total"], 2);
    assert_eq!(before["unread"], 2);
    assert_eq!(before["today"], 2);

    let uri = format!("/api/messages/{id}/read");
    let (status, toggled) = call(&app, Method::PATCH, &uri, Some(json!({ "isRead": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled, json!({ "success": true, "isRead": true }));

    let (_, after) = call(&app, Method::GET, "/api/messages/stats/summary", None).await;
    assert_eq!(after["unread"], 1);
    assert_eq!(after["read"], 1);

    // no body flips the current state
    let (_, toggled) = call(&app, Method::PATCH, &uri, None).await;
    assert_eq!(toggled["isRead"], false);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/messages/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::DELETE, &format!("/api/messages/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (_, listed) = call(&app, Method::GET, "/api/messages", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let app = app(None).await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({ "nom": "Jean", "email": "j@x.com", "sujet": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: subject, body");

    let (status, _) = call(&app, Method::POST, "/api/messages", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = call(&app, Method::GET, "/api/messages", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn search_and_filter_query() {
    let app = app(None).await;
    submit(&app, "Jean", "Devis").await;
    submit(&app, "Marie", "Maintenance").await;

    let (_, listed) = call(&app, Method::GET, "/api/messages?search=DEVIS&filter=unread", None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Jean");

    let (_, listed) = call(&app, Method::GET, "/api/messages?filter=read", None).await;
    assert_eq!(listed, json!([]));

    let (status, _) = call(&app, Method::GET, "/api/messages?filter=starred", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_downloads_csv() {
    let app = app(None).await;
    submit(&app, "Jean", "Devis").await;

    let request = Request::builder()
        .uri("/api/messages/export")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("Date,Name,Email,Subject,Message,Status\n"));
    assert!(csv.contains(",Jean,jean@x.com,Devis,Bonjour,Unread"));
}

#[tokio::test]
async fn reply_flow() {
    let relay = Arc::new(FakeRelay::default());
    let app = app(Some(relay.clone())).await;
    let id = submit(&app, "Jean", "Devis").await;
    let uri = format!("/api/messages/{id}/reply");

    let (status, _) = call(&app, Method::POST, &uri, Some(json!({ "response": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/messages/missing/reply",
        Some(json!({ "response": "Merci" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "response": "Merci" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reply sent to jean@x.com");
    assert_eq!(relay.sent.lock().unwrap().as_slice(), ["jean@x.com"]);

    let (_, listed) = call(&app, Method::GET, "/api/messages", None).await;
    assert_eq!(listed[0]["isRead"], true);
}

#[tokio::test]
async fn reply_failures_are_server_errors() {
    let app_without_relay = app(None).await;
    let id = submit(&app_without_relay, "Jean", "Devis").await;
    let (status, body) = call(
        &app_without_relay,
        Method::POST,
        &format!("/api/messages/{id}/reply"),
        Some(json!({ "response": "Merci" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "mail.not_configured");

    let failing = Arc::new(FakeRelay {
        fail: true,
        ..Default::default()
    });
    let app = app(Some(failing)).await;
    let id = submit(&app, "Jean", "Devis").await;
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/messages/{id}/reply"),
        Some(json!({ "response": "Merci" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "mail.delivery_failed");
    assert_eq!(body["details"], "connection refused");

    let (_, listed) = call(&app, Method::GET, "/api/messages", None).await;
    assert_eq!(listed[0]["isRead"], false);
}

#[tokio::test]
async fn admin_login_and_password_change() {
    let (app, password_file) = app_with_password_file(None).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "username": "admin", "password": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "redirect": "/messages" }));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "username": "admin", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password.");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/change-password",
        Some(json!({ "currentPassword": "1234", "newPassword": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/change-password",
        Some(json!({ "currentPassword": "wrong", "newPassword": "abcd" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/change-password",
        Some(json!({ "currentPassword": "1234", "newPassword": "abcd" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "username": "admin", "password": "abcd" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    tokio::fs::remove_file(&password_file).await.unwrap();
}
