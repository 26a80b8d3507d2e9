mod common;

use axum::http::StatusCode;
use orders_backend::domain::repositories::{TokenRepository, UserRepository};
use serde_json::{Value, json};

#[tokio::test]
async fn test_login_success() {
    let app = common::make_app();
    common::create_active_user(&app.store, "name2@mail.com").await;

    let response = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "name2@mail.com", "password": common::PASSWORD }))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["Status"], true);
    assert_eq!(body["Token"].as_str().unwrap().len(), 40);
}

#[tokio::test]
async fn test_login_returns_same_token_twice() {
    let app = common::make_app();
    common::create_active_user(&app.store, "name2@mail.com").await;
    let credentials = json!({ "email": "name2@mail.com", "password": common::PASSWORD });

    let first = app
        .server
        .post("/api/v1/user/login")
        .json(&credentials)
        .await
        .json::<Value>();
    let second = app
        .server
        .post("/api/v1/user/login")
        .json(&credentials)
        .await
        .json::<Value>();

    assert_eq!(first["Token"], second["Token"]);
    assert_eq!(TokenRepository::count(app.store.as_ref()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = common::make_app();
    common::create_active_user(&app.store, "name2@mail.com").await;

    app.server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "NAME2@mail.com", "password": common::PASSWORD }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = common::make_app();
    common::create_active_user(&app.store, "name2@mail.com").await;

    let response = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "name2@mail.com", "password": "wrong-password" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body = response.json::<Value>();
    assert_eq!(body["Status"], false);
    assert!(body.get("Errors").is_some());
    assert!(body.get("Token").is_none());
}

#[tokio::test]
async fn test_login_unknown_email_same_response_as_wrong_password() {
    let app = common::make_app();
    common::create_active_user(&app.store, "name2@mail.com").await;

    let unknown = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "ghost@mail.com", "password": common::PASSWORD }))
        .await;
    let wrong = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "name2@mail.com", "password": "wrong-password" }))
        .await;

    assert_eq!(unknown.status_code(), wrong.status_code());
    assert_eq!(unknown.json::<Value>(), wrong.json::<Value>());
}

#[tokio::test]
async fn test_login_inactive_user() {
    let app = common::make_app();
    let user = common::create_active_user(&app.store, "name2@mail.com").await;
    app.store.set_active(user.id, false).await.unwrap();

    app.server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "name2@mail.com", "password": common::PASSWORD }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_missing_password_fails_before_credential_check() {
    let app = common::make_app();
    common::create_active_user(&app.store, "name2@mail.com").await;

    let response = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "name2@mail.com" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["Status"], false);
    assert!(body["Errors"].get("password").is_some());
    assert_eq!(TokenRepository::count(app.store.as_ref()).await.unwrap(), 0);
}
