//! Storefront Client - HTTP client and UI state for the storefront
//!
//! Network calls to the storefront server, the order form used on the
//! product page and the admin dashboard state.

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod form;
pub mod http;

pub use api::{AdminApi, StorefrontApi};
pub use auth::{AuthWatcher, Session};
pub use config::ClientConfig;
pub use dashboard::{AdminDashboard, RefreshOutcome};
pub use debounce::Debouncer;
pub use error::{ClientError, ClientResult};
pub use form::OrderForm;
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::client::{BulkAction, BulkResult, LoginResponse, OrderListResponse, ProductView};
pub use shared::order::{OrderFilter, StatusFilter};
pub use shared::{Order, OrderStatus};
