//! Order Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Order lifecycle status
///
/// The only transition is `Pending -> Confirmed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
        }
    }

    /// Whether moving to `next` is allowed. Staying put counts as allowed
    /// so repeated confirms are no-ops.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, _) | (OrderStatus::Confirmed, OrderStatus::Confirmed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            other => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("unknown order status: {other}"),
            )),
        }
    }
}

/// Order entity
///
/// Older documents used camelCase keys; those are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default, alias = "productId")]
    pub product_id: Option<String>,
    #[serde(default, alias = "productTitle")]
    pub product_title: String,
    #[serde(default, alias = "unitPrice")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default, alias = "totalPrice")]
    pub total_price: Decimal,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "createdAt", with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Mark the order confirmed. Returns `true` when the status changed.
    pub fn confirm(&mut self) -> bool {
        if self.is_pending() {
            self.status = OrderStatus::Confirmed;
            true
        } else {
            false
        }
    }

    /// Newest first, orders without a timestamp last, ties by id descending
    pub fn cmp_newest_first(a: &Order, b: &Order) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (&a.created_at, &b.created_at) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| cmp_ids_desc(&a.id, &b.id))
    }
}

/// Numeric ids compare numerically, anything else falls back to text
fn cmp_ids_desc(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        _ => b.cmp(a),
    }
}
