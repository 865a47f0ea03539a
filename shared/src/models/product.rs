//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::order::price::parse_price;

/// The product offered on the storefront page
///
/// `price` and `regular_price` keep the display text (it may use Bengali
/// digits and thousands separators); use [`Product::unit_price`] for math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "price_text")]
    pub price: String,
    #[serde(default, alias = "regularPrice", deserialize_with = "optional_price_text")]
    pub regular_price: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Parsed selling price, `0` when the text is not a number
    pub fn unit_price(&self) -> Decimal {
        parse_price(&self.price)
    }

    pub fn regular_unit_price(&self) -> Option<Decimal> {
        self.regular_price.as_deref().map(parse_price)
    }

    /// Built-in product used when no catalog file is configured
    pub fn builtin() -> Self {
        Self {
            id: "prod-001".to_string(),
            title: "হিটার জগ গরম পানির সহজ সমাধান!".to_string(),
            description: "শীতের সকালে বা অফিসে চা-কফির সময় গরম পানি চাই? এই স্মার্ট হিটার জগ দিচ্ছে ৫৫° অটো টেম্পারেচার কন্ট্রোল সুবিধা।".to_string(),
            price: "১,৬৫০".to_string(),
            regular_price: Some("২,৩৫০".to_string()),
            images: vec![
                "/images/heater-jug-1.jpg".to_string(),
                "/images/heater-jug-2.jpg".to_string(),
            ],
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceText {
    Text(String),
    Number(serde_json::Number),
}

impl From<PriceText> for String {
    fn from(value: PriceText) -> Self {
        match value {
            PriceText::Text(s) => s,
            PriceText::Number(n) => n.to_string(),
        }
    }
}

/// Catalog files may carry the price as a number; numbers pass through
fn price_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    PriceText::deserialize(deserializer).map(String::from)
}

fn optional_price_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<PriceText>::deserialize(deserializer)?.map(String::from))
}
