//! [`AppError`] and the [`ApiResponse`] envelope

use std::collections::HashMap;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::codes::{ErrorCategory, ErrorCode};

/// Error returned by handlers and decoded by the client
///
/// `details` holds structured context: one entry per field for
/// `ValidationFailed`, the id for `OrderNotFound`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn order_not_found(id: impl Into<String>) -> Self {
        Self::new(ErrorCode::OrderNotFound).with_detail("id", id.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn token_revoked() -> Self {
        Self::new(ErrorCode::TokenRevoked)
    }

    pub fn too_many_requests() -> Self {
        Self::new(ErrorCode::TooManyRequests)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Response body of every API route
///
/// `code` is 0 on success. Error envelopes carry no `data` and may carry
/// `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: ErrorCode::Success.message().to_string(),
            data: Some(data),
            details: None,
        }
    }

    /// A missing code counts as success
    pub fn is_success(&self) -> bool {
        self.code.is_none_or(|c| c == ErrorCode::Success.code())
    }

    /// Rebuild the [`AppError`] behind an error envelope
    ///
    /// Codes this build does not know become [`ErrorCode::Unknown`].
    pub fn into_error(self) -> AppError {
        let code = self
            .code
            .and_then(|c| ErrorCode::try_from(c).ok())
            .unwrap_or(ErrorCode::Unknown);
        AppError {
            code,
            message: self.message,
            details: self.details,
        }
    }

    fn status(&self) -> StatusCode {
        if self.is_success() {
            return StatusCode::OK;
        }
        self.code
            .and_then(|c| ErrorCode::try_from(c).ok())
            .map_or(StatusCode::INTERNAL_SERVER_ERROR, |c| c.http_status())
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn ok() -> Self {
        Self {
            data: None,
            ..Self::success(())
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error");
        }
        ApiResponse::<()>::from(self).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_and_details() {
        let err = AppError::new(ErrorCode::OrderSelectionEmpty);
        assert_eq!(err.message, "No orders selected");
        assert!(err.details.is_none());

        let err = AppError::validation("Please fix the highlighted fields")
            .with_detail("phone", "Enter a valid mobile number")
            .with_detail("name", "Enter your name");
        let details = err.details.unwrap();
        assert_eq!(details["phone"], "Enter a valid mobile number");
        assert_eq!(details.len(), 2);
    }

    #[test]
    fn order_not_found_carries_id() {
        let err = AppError::order_not_found("42");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.details.unwrap()["id"], "42");
    }

    #[test]
    fn success_envelope() {
        let response = ApiResponse::success(vec!["a"]);
        assert!(response.is_success());
        assert_eq!(response.status(), StatusCode::OK);

        let json = serde_json::to_value(ApiResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "code": 0, "message": "OK" }));
    }

    #[test]
    fn error_envelope_round_trip() {
        let response: ApiResponse<String> = AppError::order_not_found("7").into();
        assert!(!response.is_success());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":4001"));
        assert!(!json.contains("\"data\""));

        let back = serde_json::from_str::<ApiResponse<String>>(&json)
            .unwrap()
            .into_error();
        assert_eq!(back.code, ErrorCode::OrderNotFound);
        assert_eq!(back.details.unwrap()["id"], "7");
    }

    #[test]
    fn unknown_code_from_newer_server() {
        let parsed: ApiResponse<()> =
            serde_json::from_str(r#"{"code":7777,"message":"odd"}"#).unwrap();
        assert_eq!(parsed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = parsed.into_error();
        assert_eq!(err.code, ErrorCode::Unknown);
        assert_eq!(err.message, "odd");
    }
}
