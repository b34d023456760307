mod common;

use auth::Claims;
use common::TestApp;
use credential_service::domain::user::ports::UserRepository;
use credential_service::outbound::repositories::JsonFileUserRepository;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "email": "a@x.com",
            "password": "secret1",
            "name": "Alice"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["name"], "Alice");
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("password").is_none());

    let contents = app.store.contents();
    let stored = &contents["users"][0];
    assert_eq!(stored["email"], "a@x.com");
    assert_eq!(stored["name"], "Alice");
    let hash = stored["passwordHash"].as_str().unwrap();
    assert!(!hash.is_empty());
    assert_ne!(hash, "secret1");
    assert!(stored.get("password").is_none());
}

#[tokio::test]
async fn test_register_empty_password() {
    let app = TestApp::spawn().await;

    let response = app.register("a@x.com", "").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.store.contents(), json!({ "users": [] }));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    let first = app.register("a@x.com", "secret1").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.register("a@x.com", "secret2").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = second.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));

    assert_eq!(app.store.contents()["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations() {
    let app = TestApp::spawn().await;

    let attempts = (0..5).map(|i| app.register("race@x.com", if i % 2 == 0 { "a" } else { "b" }));
    let statuses: Vec<StatusCode> = join_all(attempts)
        .await
        .into_iter()
        .map(|response| response.status())
        .collect();

    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CREATED).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(),
        4
    );
    assert_eq!(app.store.contents()["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_success_token_subject_is_email() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "secret1").await;

    let response = app.login("a@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["token"].as_str().expect("Missing token");
    assert!(body["data"]["expires_at"].is_string());

    let claims: Claims = app.jwt_handler.decode(token).expect("Invalid token");
    assert_eq!(claims.sub, "a@x.com");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "secret1").await;

    let wrong_password = app.login("a@x.com", "wrong").await;
    let unknown_user = app.login("nobody@x.com", "secret1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_user: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "secret1").await;

    let body: serde_json::Value = app.login("a@x.com", "secret1").await.json().await.unwrap();
    let token = body["data"]["token"].as_str().unwrap();

    let response = app
        .get_authenticated("/api/auth/me", token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let me: serde_json::Value = response.json().await.unwrap();
    assert_eq!(me["data"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_me_with_forged_token() {
    let app = TestApp::spawn().await;

    let forged = auth::JwtHandler::new(b"some-other-secret-at-least-32-bytes!!")
        .unwrap()
        .encode(&Claims::for_subject("a@x.com", chrono::Duration::hours(1)))
        .unwrap();

    let response = app
        .get_authenticated("/api/auth/me", &forged)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = TestApp::spawn().await;

    let issued = chrono::Utc::now() - chrono::Duration::seconds(3602);
    let expired = app
        .jwt_handler
        .encode(&Claims::issued_at(
            "a@x.com",
            issued,
            chrono::Duration::seconds(3600),
        ))
        .unwrap();

    let response = app
        .get_authenticated("/api/auth/me", &expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registrations_survive_restart() {
    let app = TestApp::spawn().await;
    for i in 0..3 {
        app.register(&format!("user{}@x.com", i), "pw").await;
    }

    let reopened = JsonFileUserRepository::open(&app.store.path)
        .await
        .expect("Failed to reopen store");

    let emails: Vec<String> = reopened
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(emails, vec!["user0@x.com", "user1@x.com", "user2@x.com"]);
}

#[tokio::test]
async fn test_mortgage_repayments() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/mortgage/repayments")
        .json(&json!({
            "principal": 200000,
            "annual_rate_percent": 6,
            "term_years": 30,
            "repayment_type": "repayment"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["monthly_payment"], json!(1199.1));
}
