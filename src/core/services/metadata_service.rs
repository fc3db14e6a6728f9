use crate::AppError;
use crate::api::models::GraphqlRequest;
use crate::api::session::Session;
use crate::error::{ApiError, AuthError, QueryError, ValidationError};
use crate::utils::error_helpers::{convert_json_error, map_status_error};
use reqwest::header::RETRY_AFTER;
use reqwest::{Method, StatusCode};
use serde_json::Value;

pub const METADATA_PATH: &str = "/api/metadata/graphql";

/// Client for the Tableau Metadata (GraphQL) API
pub struct MetadataService<'a> {
    session: &'a Session,
}

impl<'a> MetadataService<'a> {
    pub fn new(session: &'a Session) -> Result<Self, AppError> {
        if !session.is_authenticated() {
            return Err(AuthError::NotAuthenticated.into());
        }
        Ok(Self { session })
    }

    /// Run a GraphQL query and return the decoded body unchanged.
    ///
    /// A body carrying a top-level `errors` array is an error even on 200.
    pub async fn query(&self, query: &str, variables: Option<&Value>) -> Result<Value, AppError> {
        if query.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "Query".to_string(),
            }
            .into());
        }

        let variables = variables.filter(|v| !is_empty_object(v));
        let payload = GraphqlRequest { query, variables };

        log::debug!("POST {}", METADATA_PATH);
        let response = self
            .session
            .build_request(Method::POST, METADATA_PATH)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.session.request_error(e, METADATA_PATH))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(ApiError::RateLimited {
                endpoint: METADATA_PATH.to_string(),
                retry_after,
            }
            .into());
        }

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                endpoint: METADATA_PATH.to_string(),
                body,
            }
            .into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::BAD_REQUEST {
                if let Some(errors) = errors_envelope(&body) {
                    return Err(QueryError::Syntax { errors }.into());
                }
            }
            return Err(map_status_error(status.as_u16(), &body, METADATA_PATH).into());
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| convert_json_error(e, METADATA_PATH))?;

        if let Some(errors) = data.get("errors") {
            return Err(QueryError::Execution {
                errors: errors.clone(),
            }
            .into());
        }

        Ok(data)
    }
}

fn is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty()) || value.is_null()
}

fn errors_envelope(body: &str) -> Option<Value> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut v| v.get_mut("errors").map(Value::take))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::SessionConfig;
    use serde_json::json;

    #[test]
    fn test_requires_authenticated_session() {
        let session = Session::new(SessionConfig::new(
            "http://tableau.invalid",
            "ci-token",
            "secret",
        ))
        .unwrap();
        assert!(matches!(
            MetadataService::new(&session),
            Err(AppError::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_request() {
        let mut session = Session::new(SessionConfig::new(
            "http://tableau.invalid",
            "ci-token",
            "secret",
        ))
        .unwrap();
        session.resume("token", "site-uuid");
        let service = MetadataService::new(&session).unwrap();

        let result = service.query("", None).await;
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::EmptyField { .. }))
        ));
        let result = service.query("  \n", Some(&json!({"id": 1}))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_errors_envelope() {
        let body = r#"{"errors": [{"message": "Syntax Error"}]}"#;
        assert_eq!(
            errors_envelope(body),
            Some(json!([{"message": "Syntax Error"}]))
        );
        assert_eq!(errors_envelope(r#"{"data": {}}"#), None);
        assert_eq!(errors_envelope("not json"), None);
    }

    #[test]
    fn test_is_empty_object() {
        assert!(is_empty_object(&json!({})));
        assert!(is_empty_object(&Value::Null));
        assert!(!is_empty_object(&json!({"luid": "abc"})));
    }
}
