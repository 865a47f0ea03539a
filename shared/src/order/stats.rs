//! Order counters for the dashboard header

use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
}

impl OrderStats {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        orders
            .into_iter()
            .fold(Self::default(), |mut stats, order| {
                stats.total += 1;
                match order.status {
                    OrderStatus::Pending => stats.pending += 1,
                    OrderStatus::Confirmed => stats.confirmed += 1,
                }
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.into(),
            product_id: None,
            product_title: String::new(),
            unit_price: Decimal::ZERO,
            quantity: 1,
            total_price: Decimal::ZERO,
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn counts_by_status() {
        let orders = vec![
            order("1", OrderStatus::Pending),
            order("2", OrderStatus::Confirmed),
            order("3", OrderStatus::Pending),
        ];
        let stats = OrderStats::from_orders(&orders);
        assert_eq!(
            stats,
            OrderStats {
                total: 3,
                pending: 2,
                confirmed: 1
            }
        );
        assert_eq!(OrderStats::from_orders(std::iter::empty()), OrderStats::default());
    }
}
