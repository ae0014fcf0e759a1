//! Error types for the Realty MCP Server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when talking to the listing backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Backend returned an error status code
    #[error("Backend error (status {status}): {message}")]
    ApiError {
        status: u16,
        /// Backend error code (e.g. `23505` for unique violations)
        code: Option<String>,
        message: String,
    },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The operation needs a signed-in user and none is configured
    #[error("Sign in required: {0}")]
    SignInRequired(String),

    /// A user action failed; carries the message to show for it
    #[error("{0}")]
    ActionFailed(String),

    /// Generic backend error with context
    #[error("Backend error: {0}")]
    Other(String),
}

impl BackendError {
    /// Backend error code, when the backend reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::ApiError { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether this is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        self.code() == Some("23505")
    }

    /// Message suitable for showing to the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::ApiError { message, .. } => message.clone(),
            BackendError::InvalidRequest(message) => message.clone(),
            BackendError::SignInRequired(message) | BackendError::ActionFailed(message) => {
                message.clone()
            }
            BackendError::NotFound(what) => format!("{} not found", what),
            other => other.to_string(),
        }
    }
}

impl From<FilterError> for BackendError {
    fn from(err: FilterError) -> Self {
        BackendError::InvalidRequest(err.to_string())
    }
}

impl From<crate::domain::ValidationError> for BackendError {
    fn from(err: crate::domain::ValidationError) -> Self {
        BackendError::InvalidRequest(err.to_string())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Failed to load .env file
    #[error("Failed to load .env file: {0}")]
    DotenvError(String),

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Errors produced while turning search form input into query predicates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Price range was not `min-max`, `min+` or the `any` sentinel
    #[error("Invalid price range: {0}")]
    InvalidPriceRange(String),

    /// Bedroom count was not a whole number
    #[error("Invalid bedroom count: {0}")]
    InvalidBedrooms(String),

    /// Unknown sort key
    #[error("Unknown sort order: {0}")]
    InvalidSort(String),

    /// Unknown property type
    #[error("Unknown property type: {0}")]
    InvalidPropertyType(String),

    /// Filter state in a link could not be decoded
    #[error("Invalid filter state: {0}")]
    InvalidState(String),
}

/// Convenience type alias for Results with BackendError
pub type BackendResult<T> = Result<T, BackendError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with FilterError
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::NotFound("property".to_string());
        assert_eq!(err.to_string(), "Resource not found: property");

        let err = ConfigError::MissingVar("REALTY_BACKEND_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: REALTY_BACKEND_KEY"
        );

        let err = FilterError::InvalidPriceRange("cheap".to_string());
        assert_eq!(err.to_string(), "Invalid price range: cheap");
    }

    #[test]
    fn test_api_error_variants() {
        let err = BackendError::ApiError {
            status: 409,
            code: Some("23505".to_string()),
            message: "duplicate key value violates unique constraint".to_string(),
        };
        assert!(err.to_string().contains("409"));
        assert!(err.is_duplicate());
        assert_eq!(
            err.user_message(),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_filter_error_converts_to_invalid_request() {
        let err: BackendError = FilterError::InvalidBedrooms("lots".to_string()).into();
        match err {
            BackendError::InvalidRequest(msg) => assert!(msg.contains("lots")),
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_user_message_for_sign_in() {
        let err = BackendError::SignInRequired("Please sign in to save properties.".into());
        assert_eq!(err.user_message(), "Please sign in to save properties.");
    }
}
