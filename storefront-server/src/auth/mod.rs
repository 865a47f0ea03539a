//! Admin authentication
//!
//! - [`AdminAccount`] - configured admin credentials (argon2)
//! - [`JwtService`] - session tokens
//! - [`RevokedTokens`] - sign-out revocation list
//! - [`require_admin_auth`] - middleware for `/api/admin`
//! - [`RateLimiter`] - per-IP limits on sign-in, orders and notifications

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod revocation;

pub use jwt::{Claims, CurrentAdmin, IssuedToken, JwtConfig, JwtError, JwtService};
pub use middleware::require_admin_auth;
pub use password::{AdminAccount, hash_password, verify_password};
pub use rate_limit::{RateLimiter, login_rate_limit, notify_rate_limit, order_rate_limit};
pub use revocation::RevokedTokens;
