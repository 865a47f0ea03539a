//! Data models
//!
//! Shared between storefront-server and storefront-client (via API).
//! Order ids are snowflake i64 values carried as strings.

pub mod order;
pub mod product;
pub mod timestamp;

// Re-exports
pub use order::*;
pub use product::*;
