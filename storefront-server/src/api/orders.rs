//! Order submission
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders | POST | none, 10/min per IP |
//! | /api/notify | POST | none, 60/min per IP |
//!
//! `/api/notify` is only served while `NOTIFY_URL` points back at this
//! server.

use axum::{Router, extract::State, middleware, routing::post};
use shared::Order;
use shared::order::OrderSubmission;

use crate::api::extract::AppJson;
use crate::auth::{notify_rate_limit, order_rate_limit};
use crate::core::ServerState;
use crate::orders::build_order;
use crate::services::OrderNotification;
use crate::{ApiResponse, AppError, AppResult};

pub fn router(state: &ServerState) -> Router<ServerState> {
    let submit = Router::new()
        .route("/api/orders", post(create_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            order_rate_limit,
        ));

    if !state.config.notify_receiver_enabled() {
        return submit;
    }

    let receiver = Router::new()
        .route("/api/notify", post(receive_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            notify_rate_limit,
        ));
    submit.merge(receiver)
}

/// Validate, price and store a new order
async fn create_order(
    State(state): State<ServerState>,
    AppJson(submission): AppJson<OrderSubmission>,
) -> AppResult<ApiResponse<Order>> {
    let submission = submission.normalized();
    submission.check().map_err(AppError::from)?;

    let product = state.catalog.resolve(submission.product_id.as_deref())?;
    let order = build_order(submission, product);

    state.orders.insert(&order)?;

    tracing::info!(
        order_id = %order.id,
        quantity = order.quantity,
        total = %order.total_price,
        "Order placed"
    );

    state.notifier.notify(&order);
    state.pixel.purchase(&order.id, order.total_price);

    Ok(ApiResponse::success(order))
}

/// Default notification target: record the order summary in the log
async fn receive_notification(
    AppJson(notification): AppJson<OrderNotification>,
) -> AppResult<ApiResponse<()>> {
    tracing::info!(
        target: "notify",
        order_id = %notification.order_id,
        product = %notification.product_title,
        quantity = notification.quantity,
        total = %notification.total_price,
        name = %notification.name,
        phone = %notification.phone,
        "New order notification"
    );
    Ok(ApiResponse::ok())
}
