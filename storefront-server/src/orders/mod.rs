//! Orders
//!
//! - [`OrderStorage`] - redb document store
//! - [`build_order`] - turn a validated submission into a stored order

pub mod storage;

pub use storage::{MEMORY_STORE, OrderStorage, StorageError, StorageResult};

use chrono::Utc;
use shared::order::OrderSubmission;
use shared::{Order, OrderStatus, Product};

/// New pending order for `submission`, priced from `product`
///
/// The unit price comes from the catalog, never from the client.
pub fn build_order(submission: OrderSubmission, product: &Product) -> Order {
    let unit_price = product.unit_price();
    Order {
        id: shared::util::new_order_id(),
        product_id: Some(product.id.clone()),
        product_title: product.title.clone(),
        unit_price,
        quantity: submission.quantity,
        total_price: unit_price * rust_decimal::Decimal::from(submission.quantity),
        name: submission.name,
        phone: submission.phone,
        address: submission.address,
        status: OrderStatus::Pending,
        created_at: Some(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn build_order_prices_from_catalog() {
        let submission = OrderSubmission {
            product_id: Some("prod-001".into()),
            quantity: 3,
            name: "Rahim".into(),
            phone: "01712345678".into(),
            address: "Dhaka".into(),
        };
        let order = build_order(submission, &Product::builtin());

        assert_eq!(order.unit_price, Decimal::from(1650));
        assert_eq!(order.total_price, Decimal::from(4950));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.product_id.as_deref(), Some("prod-001"));
        assert!(order.created_at.is_some());
        assert!(!order.id.is_empty());
    }
}
