//! Order form validation
//!
//! Rules run on the client before submitting and again on the server.
//! Failures come back as a field -> message map so a form can show them
//! inline.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Customer name
pub const MAX_NAME_LEN: usize = 200;

/// Phone number as typed (spaces, dashes and country code allowed)
pub const MAX_PHONE_LEN: usize = 100;

/// Delivery address
pub const MAX_ADDRESS_LEN: usize = 500;

/// Minimum digits a phone number must contain
pub const MIN_PHONE_DIGITS: usize = 10;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 999;

/// Order form payload (`POST /api/orders`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OrderSubmission {
    #[serde(default, alias = "productId")]
    pub product_id: Option<String>,
    #[validate(range(min = 1, max = 999, message = "Choose between 1 and 999"))]
    pub quantity: u32,
    #[validate(
        custom(function = "not_blank", message = "Enter your name"),
        length(max = 200, message = "Name is too long")
    )]
    pub name: String,
    #[validate(
        custom(function = "enough_phone_digits", message = "Enter a valid mobile number"),
        length(max = 100, message = "Phone number is too long")
    )]
    pub phone: String,
    #[validate(
        custom(function = "not_blank", message = "Enter your delivery address"),
        length(max = 500, message = "Address is too long")
    )]
    pub address: String,
}

impl OrderSubmission {
    /// Trim text fields before storing
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.address = self.address.trim().to_string();
        self.product_id = self
            .product_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        self
    }

    /// Run every rule and collect one message per failing field
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn enough_phone_digits(value: &str) -> Result<(), ValidationError> {
    if phone_digits(value) < MIN_PHONE_DIGITS {
        return Err(ValidationError::new("phone_digits"));
    }
    Ok(())
}

/// Number of ASCII digits in a phone string
pub fn phone_digits(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

/// Field name -> first failing message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rebuild from the `details` of a `ValidationFailed` response
    pub fn from_details(details: &HashMap<String, Value>) -> Self {
        let mut errors = Self::new();
        for (field, value) in details {
            if let Some(message) = value.as_str() {
                errors.insert(field.clone(), message);
            }
        }
        errors
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            if let Some(first) = list.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                out.insert(field.to_string(), message);
            }
        }
        out
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        errors.0.into_iter().fold(
            AppError::validation("Please fix the highlighted fields"),
            |err, (field, message)| err.with_detail(field, message),
        )
    }
}
