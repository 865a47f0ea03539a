//! Analytics pixel
//!
//! Server-side `PageView` and `Purchase` events for the configured pixel.
//! Without `PIXEL_ID` every call is a no-op.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::PixelConfig;

/// Standard pixel events
#[derive(Debug, Clone, PartialEq)]
pub enum PixelEvent {
    PageView,
    Purchase { value: Decimal, currency: String },
}

impl PixelEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PixelEvent::PageView => "PageView",
            PixelEvent::Purchase { .. } => "Purchase",
        }
    }

    fn custom_data(&self) -> Option<Value> {
        match self {
            PixelEvent::PageView => None,
            PixelEvent::Purchase { value, currency } => {
                Some(json!({ "value": value, "currency": currency }))
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct EventBatch<'a> {
    data: [EventRecord<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct EventRecord<'a> {
    event_name: &'a str,
    event_time: i64,
    action_source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_data: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct PixelClient {
    client: reqwest::Client,
    endpoint: Option<String>,
    pixel_id: Option<String>,
    access_token: Option<String>,
    currency: String,
}

impl PixelClient {
    pub fn new(client: reqwest::Client, config: &PixelConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint_url(),
            pixel_id: config.pixel_id.clone(),
            access_token: config.access_token.clone(),
            currency: config.currency.clone(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(reqwest::Client::new(), &PixelConfig::disabled())
    }

    pub fn pixel_id(&self) -> Option<&str> {
        self.pixel_id.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn page_view(&self) {
        self.track(PixelEvent::PageView, None);
    }

    /// `Purchase` for a stored order, deduplicated by order id
    pub fn purchase(&self, order_id: &str, value: Decimal) {
        let event = PixelEvent::Purchase {
            value,
            currency: self.currency.clone(),
        };
        self.track(event, Some(order_id.to_string()));
    }

    /// Fire-and-forget event
    pub fn track(&self, event: PixelEvent, event_id: Option<String>) {
        if !self.is_enabled() {
            return;
        }
        let pixel = self.clone();
        tokio::spawn(async move {
            if let Err(e) = pixel.send(&event, event_id.as_deref()).await {
                tracing::warn!(event = event.name(), error = %e, "Pixel event failed");
            }
        });
    }

    pub async fn send(
        &self,
        event: &PixelEvent,
        event_id: Option<&str>,
    ) -> Result<(), reqwest::Error> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(());
        };
        let body = self.batch(event, event_id);
        self.client
            .post(endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(event = event.name(), "Pixel event sent");
        Ok(())
    }

    fn batch<'a>(&'a self, event: &'a PixelEvent, event_id: Option<&'a str>) -> EventBatch<'a> {
        EventBatch {
            data: [EventRecord {
                event_name: event.name(),
                event_time: chrono::Utc::now().timestamp(),
                action_source: "website",
                event_id,
                custom_data: event.custom_data(),
            }],
            access_token: self.access_token.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PixelConfig {
        PixelConfig {
            pixel_id: Some("123".into()),
            endpoint: Some("http://127.0.0.1:1/{pixel_id}/events".into()),
            access_token: Some("tok".into()),
            currency: "BDT".into(),
        }
    }

    #[test]
    fn purchase_body_shape() {
        let pixel = PixelClient::new(reqwest::Client::new(), &config());
        let event = PixelEvent::Purchase {
            value: Decimal::from(3300),
            currency: "BDT".into(),
        };
        let body = serde_json::to_value(pixel.batch(&event, Some("42"))).unwrap();

        assert_eq!(body["data"][0]["event_name"], "Purchase");
        assert_eq!(body["data"][0]["event_id"], "42");
        assert_eq!(body["data"][0]["custom_data"]["currency"], "BDT");
        assert_eq!(body["data"][0]["custom_data"]["value"], 3300.0);
        assert_eq!(body["access_token"], "tok");
    }

    #[test]
    fn page_view_has_no_custom_data() {
        let pixel = PixelClient::new(reqwest::Client::new(), &config());
        let body = serde_json::to_value(pixel.batch(&PixelEvent::PageView, None)).unwrap();
        assert_eq!(body["data"][0]["event_name"], "PageView");
        assert!(body["data"][0].get("custom_data").is_none());
        assert!(body["data"][0].get("event_id").is_none());
    }

    #[test]
    fn endpoint_uses_pixel_id() {
        let pixel = PixelClient::new(reqwest::Client::new(), &config());
        assert!(pixel.is_enabled());
        assert_eq!(pixel.endpoint.as_deref(), Some("http://127.0.0.1:1/123/events"));
        assert_eq!(pixel.pixel_id(), Some("123"));
    }

    #[tokio::test]
    async fn disabled_pixel_is_noop() {
        let pixel = PixelClient::disabled();
        assert!(!pixel.is_enabled());
        pixel.page_view();
        assert!(pixel.send(&PixelEvent::PageView, None).await.is_ok());
    }
}
