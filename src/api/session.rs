use crate::api::models::{SignInRequest, SignInResponse};
use crate::error::{ApiError, AppError};
use crate::utils::error_helpers::{
    convert_request_error, convert_timeout_error, extract_error_detail,
};
use crate::utils::validation::{validate_non_empty, validate_url};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "3.19";
pub const AUTH_HEADER: &str = "X-Tableau-Auth";
const USER_AGENT: &str = concat!("bleau/", env!("CARGO_PKG_VERSION"));

/// Connection settings for one Tableau server and site
#[derive(Clone)]
pub struct SessionConfig {
    pub server_url: String,
    pub token_name: String,
    pub token_secret: String,
    /// Site content URL; `None` signs in to the default site
    pub site_id: Option<String>,
    pub api_version: String,
    /// Client-side request timeout; `None` leaves requests unbounded
    pub timeout_secs: Option<u64>,
}

impl SessionConfig {
    pub fn new(
        server_url: impl Into<String>,
        token_name: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            token_name: token_name.into(),
            token_secret: token_secret.into(),
            site_id: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: None,
        }
    }

    pub fn with_site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("server_url", &self.server_url)
            .field("token_name", &self.token_name)
            .field("token_secret", &"<redacted>")
            .field("site_id", &self.site_id)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Token and site uuid are only ever held together
#[derive(Clone)]
struct AuthState {
    token: String,
    site_uuid: String,
    user_id: Option<String>,
}

/// An authenticated (or not yet authenticated) connection to Tableau Server
pub struct Session {
    client: Client,
    config: SessionConfig,
    auth: Option<AuthState>,
}

impl Session {
    /// Validate the configuration and build the HTTP client.
    ///
    /// No request is sent until [`Session::authenticate`].
    pub fn new(mut config: SessionConfig) -> Result<Self, AppError> {
        validate_url(&config.server_url)?;
        validate_non_empty("Token name", &config.token_name)?;
        validate_non_empty("Token secret", &config.token_secret)?;

        config.server_url = config.server_url.trim_end_matches('/').to_string();

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| convert_request_error(e, "client_init"))?;

        Ok(Session {
            client,
            config,
            auth: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn site_uuid(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.site_uuid.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.auth.as_ref().and_then(|a| a.user_id.as_deref())
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    pub fn site_id(&self) -> &str {
        self.config.site_id.as_deref().unwrap_or_default()
    }

    pub fn api_version(&self) -> &str {
        &self.config.api_version
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.config.timeout_secs
    }

    /// Adopt a token obtained elsewhere, e.g. by another process
    pub fn resume(&mut self, token: impl Into<String>, site_uuid: impl Into<String>) {
        self.auth = Some(AuthState {
            token: token.into(),
            site_uuid: site_uuid.into(),
            user_id: None,
        });
    }

    /// Headers sent with every request; the auth header only while signed in
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.auth_token() {
            if let Ok(value) = HeaderValue::from_str(token) {
                headers.insert(HeaderName::from_static("x-tableau-auth"), value);
            }
        }

        headers
    }

    /// Path prefix for versioned REST endpoints, e.g. `/api/3.19`
    pub fn rest_path(&self, suffix: &str) -> String {
        format!("/api/{}{}", self.config.api_version, suffix)
    }

    /// Classify a failed send: a timeout when one is configured and hit,
    /// otherwise a transport error carrying the reqwest error
    pub fn request_error(&self, error: reqwest::Error, endpoint: &str) -> ApiError {
        match self.config.timeout_secs {
            Some(secs) if error.is_timeout() => convert_timeout_error(endpoint, secs),
            _ => convert_request_error(error, endpoint),
        }
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.server_url, path);
        self.client.request(method, url).headers(self.headers())
    }

    /// Sign in with the configured personal access token.
    ///
    /// Returns `Ok(false)` when the server rejects the credentials or answers
    /// with an unusable body; only transport failures are errors.
    pub async fn authenticate(&mut self) -> Result<bool, AppError> {
        let endpoint = self.rest_path("/auth/signin");
        let payload = SignInRequest::personal_access_token(
            &self.config.token_name,
            &self.config.token_secret,
            self.config.site_id.as_deref(),
        );

        log::debug!("POST {}{}", self.config.server_url, endpoint);
        let response = self
            .build_request(Method::POST, &endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.request_error(e, &endpoint))?;

        let status = response.status();

        if status == StatusCode::OK {
            let body = match response.json::<SignInResponse>().await {
                Ok(body) => body,
                Err(e) => {
                    log::warn!("Authentication failed: unreadable sign-in response: {}", e);
                    self.auth = None;
                    return Ok(false);
                }
            };

            let credentials = body.credentials;
            let site_uuid = credentials.site.and_then(|s| s.id);
            match (credentials.token, site_uuid) {
                (Some(token), Some(site_uuid)) => {
                    log::info!(
                        "Signed in to {} (site '{}')",
                        self.config.server_url,
                        self.site_id()
                    );
                    self.auth = Some(AuthState {
                        token,
                        site_uuid,
                        user_id: credentials.user.map(|u| u.id),
                    });
                    Ok(true)
                }
                _ => {
                    log::warn!(
                        "Authentication failed: sign-in response is missing the token or site id"
                    );
                    self.auth = None;
                    Ok(false)
                }
            }
        } else {
            let error_text = response.text().await.unwrap_or_default();
            if status == StatusCode::UNAUTHORIZED {
                log::warn!(
                    "Authentication failed: 401 {}",
                    extract_error_detail(&error_text)
                );
            } else {
                log::warn!("Authentication failed: {}", status.as_u16());
            }
            self.auth = None;
            Ok(false)
        }
    }

    /// Sign out and forget the token.
    ///
    /// Local state is cleared whatever the server answers. Returns whether the
    /// server acknowledged with 204 No Content.
    pub async fn sign_out(&mut self) -> bool {
        if !self.is_authenticated() {
            return true;
        }

        let endpoint = self.rest_path("/auth/signout");
        log::debug!("POST {}{}", self.config.server_url, endpoint);
        let result = self.build_request(Method::POST, &endpoint).send().await;

        self.auth = None;

        match result {
            Ok(response) => {
                let acknowledged = response.status() == StatusCode::NO_CONTENT;
                if acknowledged {
                    log::info!("Signed out of {}", self.config.server_url);
                } else {
                    log::warn!("Sign-out returned {}", response.status().as_u16());
                }
                acknowledged
            }
            Err(e) => {
                log::warn!("Sign-out request failed: {}", e);
                false
            }
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth_status = if self.is_authenticated() {
            "authenticated"
        } else {
            "not authenticated"
        };
        write!(
            f,
            "Session(server={}, site={}, {})",
            self.config.server_url,
            self.site_id(),
            auth_status
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("server_url", &self.config.server_url)
            .field("token_name", &self.config.token_name)
            .field("site_id", &self.site_id())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
