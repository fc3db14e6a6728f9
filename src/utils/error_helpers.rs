use crate::api::models::ErrorEnvelope;
use crate::error::ApiError;

/// Helper functions for standardizing error conversions across the codebase.
/// Convert reqwest errors to ApiError with endpoint context
///
/// The reqwest error is kept as the source so callers can inspect it unchanged.
pub fn convert_request_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    ApiError::Transport {
        endpoint: endpoint.to_string(),
        source: error,
    }
}

/// Convert timeout errors to ApiError with endpoint context
pub fn convert_timeout_error(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: impl std::fmt::Display, endpoint: &str) -> ApiError {
    ApiError::InvalidResponse {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Pull the human readable detail out of a Tableau REST error body.
///
/// Falls back to the summary, then to the raw body.
pub fn extract_error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope
            .error
            .detail
            .or(envelope.error.summary)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Map a non-success REST status to the matching `ApiError`.
///
/// 404 is left to callers, which know which resource was asked for.
pub fn map_status_error(status: u16, body: &str, endpoint: &str) -> ApiError {
    match status {
        401 => ApiError::Unauthorized {
            status,
            endpoint: endpoint.to_string(),
            server_message: extract_error_detail(body),
        },
        403 => ApiError::Forbidden {
            endpoint: endpoint.to_string(),
            detail: extract_error_detail(body),
        },
        _ => ApiError::Http {
            status,
            endpoint: endpoint.to_string(),
            message: extract_error_detail(body),
        },
    }
}
