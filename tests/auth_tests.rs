mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{StubProvider, app_with, json_body, post_json};
use sysmon_relay::services::auth::AuthService;
use sysmon_relay::error::AppError;
use tower::util::ServiceExt;

#[tokio::test]
async fn register_validates_input() {
    let auth = AuthService::new();

    let err = auth.register("ann@example.com", "pass", "  ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(m) if m == "Name is required"));

    let err = auth.register("ann", "pass", "Ann").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(m) if m == "Please enter a valid email address"));

    let err = auth.register("ann@example.com", "abc", "Ann").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(m) if m == "Password must be at least 4 characters long"
    ));

    // Nothing was stored.
    let err = auth.login("ann@example.com", "pass").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let auth = AuthService::new();
    auth.register("ann@example.com", "pass", "Ann").await.unwrap();
    let err = auth.register("ann@example.com", "other", "Ann Two").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The original account is untouched.
    assert!(auth.login("ann@example.com", "other").await.is_err());
    assert_eq!(auth.login("ann@example.com", "pass").await.unwrap().user.name, "Ann");
}

#[tokio::test]
async fn login_checks_credentials() {
    let auth = AuthService::new();
    let registered = auth.register("ann@example.com", "pass", "Ann").await.unwrap();

    let err = auth.login("ann@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = auth.login("ann@example.com", "").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(m) if m == "Password is required"));

    let session = auth.login("ann@example.com", "pass").await.unwrap();
    assert_ne!(session.token, registered.token);
    assert_eq!(session.user, registered.user);

    // Both sessions stay valid until logged out.
    assert!(auth.current_session(&registered.token).await.is_some());
    assert!(auth.current_session(&session.token).await.is_some());
}

#[tokio::test]
async fn http_register_session_logout() {
    let app = app_with(StubProvider::replying("ok"));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            r#"{"email": "bob@example.com", "password": "hunter2", "name": "Bob"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["user"].get("password").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let with_token = |method: &str, uri: &str| {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(with_token("GET", "/api/auth/session")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["email"], "bob@example.com");

    let response = app.clone().oneshot(with_token("POST", "/api/auth/logout")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(with_token("GET", "/api/auth/session")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn http_login_failures() {
    let app = app_with(StubProvider::replying("ok"));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            r#"{"email": "nobody@example.com", "password": "pass"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Invalid email or password");

    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            r#"{"email": "bad", "password": "pass", "name": "X"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["success"], false);
}
