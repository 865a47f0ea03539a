//! Outbound order notification
//!
//! After an order is stored, a JSON summary is POSTed to `NOTIFY_URL`.
//! Delivery runs on a detached task: failures are logged and never reach
//! the customer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::Order;

/// Body sent to the notification endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub order_id: String,
    pub product_title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl From<&Order> for OrderNotification {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            product_title: order.product_title.clone(),
            unit_price: order.unit_price,
            quantity: order.quantity,
            total_price: order.total_price,
            name: order.name.clone(),
            phone: order.phone.clone(),
            address: order.address.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl Notifier {
    pub fn new(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }

    pub fn disabled() -> Self {
        Self::new(reqwest::Client::new(), None)
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Fire-and-forget notification for a new order
    pub fn notify(&self, order: &Order) {
        if !self.is_enabled() {
            return;
        }
        let notifier = self.clone();
        let payload = OrderNotification::from(order);
        tokio::spawn(async move {
            if let Err(e) = notifier.deliver(&payload).await {
                tracing::warn!(
                    order_id = %payload.order_id,
                    error = %e,
                    "Order notification failed"
                );
            }
        });
    }

    /// Send one notification and wait for the response
    pub async fn deliver(&self, payload: &OrderNotification) -> Result<(), reqwest::Error> {
        let Some(url) = &self.url else {
            return Ok(());
        };
        self.client
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(order_id = %payload.order_id, "Order notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::State, routing::post};
    use shared::OrderStatus;
    use tokio::sync::mpsc;

    fn order() -> Order {
        Order {
            id: "42".into(),
            product_id: Some("prod-001".into()),
            product_title: "Heater Jug".into(),
            unit_price: Decimal::from(1650),
            quantity: 2,
            total_price: Decimal::from(3300),
            name: "Rahim".into(),
            phone: "01712345678".into(),
            address: "Dhaka".into(),
            status: OrderStatus::Pending,
            created_at: None,
        }
    }

    async fn receiver() -> (String, mpsc::UnboundedReceiver<serde_json::Value>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new()
            .route(
                "/hook",
                post(
                    |State(tx): State<mpsc::UnboundedSender<serde_json::Value>>,
                     Json(body): Json<serde_json::Value>| async move {
                        let _ = tx.send(body);
                    },
                ),
            )
            .with_state(tx);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/hook"), rx)
    }

    #[test]
    fn payload_is_camel_case() {
        let json = serde_json::to_value(OrderNotification::from(&order())).unwrap();
        assert_eq!(json["orderId"], "42");
        assert_eq!(json["productTitle"], "Heater Jug");
        assert_eq!(json["totalPrice"], 3300.0);
        assert!(json.get("order_id").is_none());
    }

    #[tokio::test]
    async fn notify_posts_in_background() {
        let (url, mut rx) = receiver().await;
        let notifier = Notifier::new(reqwest::Client::new(), Some(url));

        notifier.notify(&order());

        let body = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body["orderId"], "42");
        assert_eq!(body["quantity"], 2);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error_not_a_panic() {
        let notifier = Notifier::new(
            reqwest::Client::new(),
            Some("http://127.0.0.1:1/nowhere".into()),
        );
        assert!(notifier.deliver(&OrderNotification::from(&order())).await.is_err());
    }

    #[tokio::test]
    async fn disabled_notifier_does_nothing() {
        let notifier = Notifier::disabled();
        assert!(!notifier.is_enabled());
        notifier.notify(&order());
        assert!(notifier.deliver(&OrderNotification::from(&order())).await.is_ok());
    }
}
