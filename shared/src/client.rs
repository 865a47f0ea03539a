//! Request/response types shared between server and client
//!
//! Payloads of the `data` field of [`crate::error::ApiResponse`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Order, Product};
use crate::order::OrderStats;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Signed-in admin (`GET /api/auth/me`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminInfo {
    pub email: String,
}

// =============================================================================
// Storefront DTOs
// =============================================================================

/// `GET /api/product`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub product: Product,
    /// Parsed selling price
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<Decimal>,
    /// Analytics site id, present when page events are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_id: Option<String>,
}

// =============================================================================
// Admin order DTOs
// =============================================================================

/// `GET /api/admin/orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderListResponse {
    /// Filtered orders, newest first
    pub orders: Vec<Order>,
    /// Counters over the unfiltered collection
    pub stats: OrderStats,
    /// Number of orders after filtering
    pub shown: usize,
}

/// Action applied to a selection of orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Confirm,
    Delete,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Confirm => "confirm",
            BulkAction::Delete => "delete",
        }
    }
}

/// `POST /api/admin/orders/bulk`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRequest {
    pub action: BulkAction,
    pub ids: Vec<String>,
}

/// Outcome of a batch operation
///
/// `affected` lists ids whose state changed (or were removed), `missing`
/// lists ids that did not exist. Already confirmed orders appear in
/// neither list on a confirm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub affected: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bulk_request_wire_shape() {
        let req: BulkRequest = serde_json::from_value(json!({
            "action": "delete",
            "ids": ["1", "2"]
        }))
        .unwrap();
        assert_eq!(req.action, BulkAction::Delete);
        assert_eq!(req.ids, ["1", "2"]);

        let unknown = json!({ "action": "archive", "ids": [] });
        assert!(serde_json::from_value::<BulkRequest>(unknown).is_err());
    }

    #[test]
    fn product_view_omits_absent_pixel() {
        let view = ProductView {
            product: Product::builtin(),
            unit_price: Decimal::from(1650),
            regular_price: None,
            pixel_id: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("pixel_id").is_none());
        assert_eq!(json["unit_price"], 1650.0);
    }
}
