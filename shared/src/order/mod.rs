//! Order list logic shared by server and client
//!
//! - [`filter`]: status / day range / search filter
//! - [`stats`]: total, pending and confirmed counts
//! - [`csv`]: CSV export of a filtered list
//! - [`validation`]: order form rules with per-field messages
//! - [`price`]: price text parsing and display

pub mod csv;
pub mod filter;
pub mod price;
pub mod stats;
pub mod validation;

pub use csv::{escape_cell, orders_to_csv};
pub use filter::{OrderFilter, StatusFilter};
pub use price::{format_amount, parse_price};
pub use stats::OrderStats;
pub use validation::{FieldErrors, OrderSubmission};
