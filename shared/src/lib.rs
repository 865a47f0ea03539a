//! Shared types for the storefront
//!
//! Models, order list logic (filter, stats, CSV export, validation,
//! price parsing), error codes and API DTOs used by both the server and
//! the client library.

pub mod client;
pub mod error;
pub mod models;
pub mod order;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Order, OrderStatus, Product};
