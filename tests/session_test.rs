mod common;

use bleau::api::session::{Session, SessionConfig};
use bleau::error::{ApiError, AppError};
use common::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sign_in_success_sets_identifiers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .and(body_partial_json(json!({
            "credentials": {
                "personalAccessTokenName": "ci-token",
                "personalAccessTokenSecret": "s3cr3t",
                "site": {"contentUrl": "marketing"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {
                "token": TOKEN,
                "site": {"id": SITE_UUID, "contentUrl": "marketing"},
                "user": {"id": "user-1"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(session_config(&server)).unwrap();
    assert!(session.authenticate().await.unwrap());
    assert!(session.is_authenticated());
    assert_eq!(session.auth_token(), Some(TOKEN));
    assert_eq!(session.site_uuid(), Some(SITE_UUID));
    assert_eq!(session.user_id(), Some("user-1"));
    assert_eq!(
        session.headers().get("x-tableau-auth").map(|v| v.to_str().unwrap()),
        Some(TOKEN)
    );
}

#[tokio::test]
async fn test_sign_in_rejected_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "401001", "summary": "Signin Error", "detail": "Invalid token"}
        })))
        .mount(&server)
        .await;

    let mut session = Session::new(session_config(&server)).unwrap();
    assert!(!session.authenticate().await.unwrap());
    assert!(!session.is_authenticated());
    assert!(session.headers().get("x-tableau-auth").is_none());
}

#[tokio::test]
async fn test_sign_in_without_token_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"credentials": {}})))
        .mount(&server)
        .await;

    let mut session = Session::new(session_config(&server)).unwrap();
    assert!(!session.authenticate().await.unwrap());
    assert!(!session.is_authenticated());
    assert!(session.site_uuid().is_none());
}

#[tokio::test]
async fn test_sign_in_non_json_body_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&server)
        .await;

    let mut session = Session::new(session_config(&server)).unwrap();
    assert!(!session.authenticate().await.unwrap());
    assert!(!session.is_authenticated());
    assert!(session.headers().get("x-tableau-auth").is_none());
}

#[tokio::test]
async fn test_sign_in_unreachable_server_is_transport_error() {
    let config = SessionConfig::new("http://127.0.0.1:9", "ci-token", "s3cr3t").with_timeout(5);
    let mut session = Session::new(config).unwrap();
    let result = session.authenticate().await;
    assert!(matches!(
        result,
        Err(AppError::Api(ApiError::Transport { .. }))
    ));
}

#[tokio::test]
async fn test_sign_out_sends_token_and_clears_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNOUT_PATH))
        .and(header("x-tableau-auth", TOKEN))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = resumed_session(&server);
    assert!(session.sign_out().await);
    assert!(!session.is_authenticated());
    assert!(session.site_uuid().is_none());
}

#[tokio::test]
async fn test_sign_out_clears_state_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNOUT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = resumed_session(&server);
    assert!(!session.sign_out().await);
    assert!(!session.is_authenticated());
    assert!(session.auth_token().is_none());
}

#[tokio::test]
async fn test_sign_out_clears_state_when_unreachable() {
    let config = SessionConfig::new("http://127.0.0.1:9", "ci-token", "s3cr3t").with_timeout(5);
    let mut session = Session::new(config).unwrap();
    session.resume(TOKEN, SITE_UUID);

    assert!(!session.sign_out().await);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_sign_out_without_session_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNOUT_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::new(session_config(&server)).unwrap();
    assert!(session.sign_out().await);
}

#[tokio::test]
async fn test_sign_in_then_sign_out_round() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    Mock::given(method("POST"))
        .and(path(SIGNOUT_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut session = Session::new(session_config(&server)).unwrap();
    assert!(session.authenticate().await.unwrap());
    assert!(session.sign_out().await);
    assert!(!session.is_authenticated());
}
