//! Seams between the UI-side state and the server
//!
//! [`crate::HttpClient`] implements both traits; tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use shared::Order;
use shared::client::{BulkAction, BulkResult, OrderListResponse, ProductView};
use shared::order::{OrderFilter, OrderSubmission};

use crate::ClientResult;

/// Public storefront calls
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn product(&self) -> ClientResult<ProductView>;

    async fn submit_order(&self, submission: &OrderSubmission) -> ClientResult<Order>;
}

/// Admin calls used by the dashboard
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<OrderListResponse>;

    async fn confirm_order(&self, id: &str) -> ClientResult<Order>;

    async fn delete_order(&self, id: &str) -> ClientResult<Order>;

    async fn bulk(&self, action: BulkAction, ids: &[String]) -> ClientResult<BulkResult>;
}
