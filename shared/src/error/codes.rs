//! Numeric error codes
//!
//! Every code is declared once in the table below together with its HTTP
//! status and default message. The leading digit gives the category.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

macro_rules! error_codes {
    ($(
        $(#[$doc:meta])*
        $name:ident = $value:literal, $status:ident, $message:literal;
    )*) => {
        /// Error code carried in the `code` field of every response
        ///
        /// Serialized as a plain number.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $name = $value, )*
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$name),*];

            /// Default English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )*
                }
            }

            pub fn http_status(&self) -> StatusCode {
                match self {
                    $( ErrorCode::$name => StatusCode::$status, )*
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )*
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx general
    Success = 0, OK, "OK";
    /// Code not known to this build
    Unknown = 1, INTERNAL_SERVER_ERROR, "An unknown error occurred";
    /// Form fields rejected; `details` maps field to message
    ValidationFailed = 2, UNPROCESSABLE_ENTITY, "Validation failed";
    AlreadyExists = 4, CONFLICT, "Resource already exists";
    /// Body or query could not be decoded
    InvalidRequest = 5, BAD_REQUEST, "Invalid request";
    InvalidFormat = 6, BAD_REQUEST, "Invalid format";
    TooManyRequests = 9, TOO_MANY_REQUESTS, "Too many requests, try again later";

    // 1xxx sign-in
    NotAuthenticated = 1001, UNAUTHORIZED, "Authentication required";
    InvalidCredentials = 1002, UNAUTHORIZED, "Invalid email or password";
    TokenExpired = 1003, UNAUTHORIZED, "Token has expired";
    TokenInvalid = 1004, UNAUTHORIZED, "Token is invalid";
    /// Token was signed out
    TokenRevoked = 1005, UNAUTHORIZED, "Token has been revoked";

    // 4xxx orders
    OrderNotFound = 4001, NOT_FOUND, "Order not found";
    /// Only pending -> confirmed is allowed
    OrderInvalidTransition = 4002, CONFLICT, "Order status change is not allowed";
    OrderSelectionEmpty = 4003, BAD_REQUEST, "No orders selected";

    // 6xxx product
    ProductNotFound = 6001, NOT_FOUND, "Product not found";

    // 9xxx system
    InternalError = 9001, INTERNAL_SERVER_ERROR, "Internal server error";
    DatabaseError = 9002, INTERNAL_SERVER_ERROR, "Database error";
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number outside the code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

/// Group of a code, taken from its leading digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Order,
    Product,
    /// 9xxx and anything unassigned
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Auth,
            4 => Self::Order,
            6 => Self::Product,
            _ => Self::System,
        }
    }
}
