use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("AuthError: {0}")]
    Auth(#[from] AuthError),
    #[error("QueryError: {0}")]
    Query(#[from] QueryError),
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("ChartError: {0}")]
    Chart(#[from] ChartError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Authentication failed: {server_message}")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
    #[error("Permission denied: {detail}")]
    Forbidden { endpoint: String, detail: String },
    #[error("{resource} not found: {id}")]
    NotFound {
        resource: String,
        id: String,
        detail: String,
    },
    #[error("Rate limited. Retry after {retry_after} seconds")]
    RateLimited {
        endpoint: String,
        retry_after: String,
    },
    #[error("Server error: {status} {body}")]
    Server {
        status: u16,
        endpoint: String,
        body: String,
    },
    #[error("Unexpected response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Session must be authenticated")]
    NotAuthenticated,
    #[error("Sign-in rejected by the server")]
    SignInRejected,
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("GraphQL syntax error: {errors}")]
    Syntax { errors: Value },
    #[error("GraphQL execution error: {errors}")]
    Execution { errors: Value },
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid URL '{url}': URL must start with http:// or https://")]
    InvalidUrl { url: String },
    #[error("{field} cannot be empty")]
    EmptyField { field: String },
    #[error("Invalid JSON for {field}: {message}")]
    InvalidJson { field: String, message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String, hint: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration save failed: {message}")]
    ConfigSaveFailed { message: String },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("Failed to read secret: {message}")]
    SecretInput { message: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum ChartError {
    #[error("Column '{column}' not found")]
    MissingColumn { column: String },
    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Column '{column}' has a non-numeric value at row {row}")]
    NonNumeric { column: String, row: usize },
    #[error("Unsupported table shape: {0}")]
    UnsupportedShape(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Transport { .. } => ErrorSeverity::Critical,
                ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } => ErrorSeverity::High,
                ApiError::Server { .. } => ErrorSeverity::High,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Auth(_) => ErrorSeverity::High,
            AppError::Query(_) => ErrorSeverity::Medium,
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Chart(_) => ErrorSeverity::Low,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Auth(AuthError::NotAuthenticated) => Some(
                "Call authenticate() before using the workbook or metadata services".to_string(),
            ),
            AppError::Auth(AuthError::SignInRejected) => Some(
                "Check the token name, TABLEAU_PAT_SECRET and site id, then run 'bleau auth check'"
                    .to_string(),
            ),
            AppError::Api(ApiError::RateLimited { retry_after, .. }) => {
                Some(format!("Wait {} seconds before retrying", retry_after))
            }
            AppError::Api(ApiError::Transport { .. } | ApiError::Timeout { .. }) => {
                Some("Check your network connection and the Tableau server URL".to_string())
            }
            AppError::Api(ApiError::NotFound { .. }) => {
                Some("'bleau workbooks list' to see the available workbooks".to_string())
            }
            AppError::Config(ConfigError::MissingField { hint, .. }) => Some(hint.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_display() {
        let api_err = ApiError::RateLimited {
            endpoint: "/api/metadata/graphql".to_string(),
            retry_after: "30".to_string(),
        };
        assert_eq!(format!("{}", api_err), "Rate limited. Retry after 30 seconds");

        let api_err = ApiError::NotFound {
            resource: "Workbook".to_string(),
            id: "wb-1".to_string(),
            detail: "Workbook not found".to_string(),
        };
        assert_eq!(format!("{}", api_err), "Workbook not found: wb-1");

        let api_err = ApiError::Forbidden {
            endpoint: "endpoint".to_string(),
            detail: "Insufficient permissions".to_string(),
        };
        assert!(format!("{}", api_err).contains("Insufficient permissions"));
    }

    #[test]
    fn test_query_error_carries_envelope() {
        let errors = json!([{"message": "Cannot query field"}]);
        let query_err = QueryError::Syntax {
            errors: errors.clone(),
        };
        if let QueryError::Syntax { errors: carried } = &query_err {
            assert_eq!(carried, &errors);
        }
        assert!(format!("{}", query_err).starts_with("GraphQL syntax error"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::EmptyField {
            field: "query".to_string(),
        };
        assert_eq!(format!("{}", err), "query cannot be empty");

        let app_err = AppError::from(ValidationError::InvalidUrl {
            url: "ftp://x".to_string(),
        });
        assert_eq!(
            format!("{}", app_err),
            "ValidationError: Invalid URL 'ftp://x': URL must start with http:// or https://"
        );
    }

    #[test]
    fn test_cli_error_display() {
        let app_err = AppError::from(CliError::InvalidArguments("Nothing to set".to_string()));
        assert_eq!(
            format!("{}", app_err),
            "CliError: Invalid arguments: Nothing to set"
        );
        assert_eq!(app_err.severity(), ErrorSeverity::Medium);
        assert!(app_err.troubleshooting_hint().is_none());
    }

    #[test]
    fn test_severity_levels() {
        let app_err = AppError::Api(ApiError::Server {
            status: 503,
            endpoint: "endpoint".to_string(),
            body: "down".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::High);

        let app_err = AppError::Auth(AuthError::NotAuthenticated);
        assert_eq!(app_err.severity(), ErrorSeverity::High);

        let app_err = AppError::Chart(ChartError::MissingColumn {
            column: "x".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_troubleshooting_hint() {
        let app_err = AppError::Api(ApiError::RateLimited {
            endpoint: "endpoint".to_string(),
            retry_after: "unknown".to_string(),
        });
        assert_eq!(
            app_err.troubleshooting_hint(),
            Some("Wait unknown seconds before retrying".to_string())
        );

        let app_err = AppError::Query(QueryError::Execution { errors: json!([]) });
        assert!(app_err.troubleshooting_hint().is_none());
    }
}
