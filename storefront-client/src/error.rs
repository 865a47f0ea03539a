//! Client error types

use std::collections::HashMap;

use serde_json::Value;
use shared::order::FieldErrors;
use shared::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error envelope
    #[error("{message} (code {code})")]
    Api {
        code: ErrorCode,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// Form rejected before any request was made
    #[error("Validation failed: {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Admin call without a session
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Error code reported by the server, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            ClientError::Validation(_) => Some(ErrorCode::ValidationFailed),
            ClientError::NotSignedIn => Some(ErrorCode::NotAuthenticated),
            _ => None,
        }
    }

    /// Field messages for a validation failure, local or from the server
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors.clone()),
            ClientError::Api {
                code: ErrorCode::ValidationFailed,
                details: Some(details),
                ..
            } => Some(FieldErrors::from_details(details)),
            _ => None,
        }
    }

    /// The session is missing or no longer accepted
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.code(),
            Some(
                ErrorCode::NotAuthenticated
                    | ErrorCode::TokenExpired
                    | ErrorCode::TokenInvalid
                    | ErrorCode::TokenRevoked
            )
        )
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::Api {
            code: err.code,
            message: err.message,
            details: err.details,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_validation_exposes_fields() {
        let app = AppError::validation("Please fix the highlighted fields")
            .with_detail("phone", "Enter a valid mobile number");
        let err = ClientError::from(app);

        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("phone"), Some("Enter a valid mobile number"));
    }

    #[test]
    fn auth_errors() {
        assert!(ClientError::from(AppError::token_revoked()).is_auth_error());
        assert!(ClientError::NotSignedIn.is_auth_error());
        assert!(!ClientError::from(AppError::order_not_found("1")).is_auth_error());
    }
}
