#![allow(dead_code)]

use bleau::api::session::{Session, SessionConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "tok-123";
pub const SITE_UUID: &str = "site-uuid-1";
pub const SIGNIN_PATH: &str = "/api/3.19/auth/signin";
pub const SIGNOUT_PATH: &str = "/api/3.19/auth/signout";

pub fn session_config(server: &MockServer) -> SessionConfig {
    SessionConfig::new(server.uri(), "ci-token", "s3cr3t").with_site("marketing")
}

pub async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {
                "token": TOKEN,
                "site": {"id": SITE_UUID, "contentUrl": "marketing"},
                "user": {"id": "user-1"}
            }
        })))
        .mount(server)
        .await;
}

/// Session already signed in against `server` without a network call
pub fn resumed_session(server: &MockServer) -> Session {
    let mut session = Session::new(session_config(server)).expect("valid config");
    session.resume(TOKEN, SITE_UUID);
    session
}
