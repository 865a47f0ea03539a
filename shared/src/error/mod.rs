//! Error codes, [`AppError`] and the [`ApiResponse`] envelope
//!
//! Code ranges: 0xxx general, 1xxx sign-in, 4xxx orders, 6xxx product,
//! 9xxx system.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::validation("Please fix the highlighted fields")
//!     .with_detail("phone", "Enter a valid mobile number");
//!
//! let response: ApiResponse<()> = err.into();
//! assert_eq!(response.code, Some(ErrorCode::ValidationFailed.code()));
//! ```

mod codes;
mod types;

pub use codes::{ErrorCategory, ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
