//! Storefront product
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/product | GET | none |

use axum::{Router, extract::State, routing::get};
use shared::client::ProductView;

use crate::core::ServerState;
use crate::{ApiResponse, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/product", get(get_product))
}

/// Product with parsed prices; counts as a page view
async fn get_product(State(state): State<ServerState>) -> AppResult<ApiResponse<ProductView>> {
    let product = state.catalog.product().clone();

    state.pixel.page_view();

    Ok(ApiResponse::success(ProductView {
        unit_price: product.unit_price(),
        regular_price: product.regular_unit_price(),
        pixel_id: state.pixel.pixel_id().map(str::to_string),
        product,
    }))
}
