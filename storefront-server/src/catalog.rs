//! Product catalog
//!
//! The storefront sells one product. It is read from `PRODUCT_FILE` (a
//! JSON `Product` document) when set, otherwise the built-in listing is
//! used.

use std::path::Path;

use rust_decimal::Decimal;
use shared::{AppError, ErrorCode, Product};

use crate::core::{Result, ServerError};

#[derive(Debug, Clone)]
pub struct ProductCatalog {
    product: Product,
}

impl ProductCatalog {
    pub fn new(product: Product) -> Result<Self> {
        if product.unit_price() <= Decimal::ZERO {
            return Err(ServerError::Catalog(format!(
                "product {} has no usable price ({:?})",
                product.id, product.price
            )));
        }
        Ok(Self { product })
    }

    pub fn builtin() -> Self {
        Self {
            product: Product::builtin(),
        }
    }

    /// Load from `PRODUCT_FILE`, falling back to the built-in product
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let product: Product = serde_json::from_str(&raw).map_err(|e| {
            ServerError::Catalog(format!("failed to parse {}: {e}", path.display()))
        })?;
        tracing::info!(product_id = %product.id, "Loaded product from {}", path.display());
        Self::new(product)
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Product an order refers to; no id means the storefront product
    pub fn resolve(&self, product_id: Option<&str>) -> std::result::Result<&Product, AppError> {
        match product_id {
            None => Ok(&self.product),
            Some(id) if id == self.product.id => Ok(&self.product),
            Some(id) => Err(AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {id} not found"),
            )
            .with_detail("product_id", id)),
        }
    }
}
