//! Admin order management
//!
//! Every route requires an admin token.
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /api/admin/orders | GET | filtered list + counters |
//! | /api/admin/orders/stats | GET | counters |
//! | /api/admin/orders/export.csv | GET | filtered list as CSV |
//! | /api/admin/orders/bulk | POST | confirm / delete a selection |
//! | /api/admin/orders/{id} | GET, DELETE | one order |
//! | /api/admin/orders/{id}/confirm | POST | pending -> confirmed |

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use shared::client::{BulkAction, BulkRequest, BulkResult, OrderListResponse};
use shared::order::{OrderFilter, OrderStats, orders_to_csv};
use shared::{ErrorCode, Order};

use crate::api::extract::{AppJson, AppQuery};
use crate::auth::{CurrentAdmin, require_admin_auth};
use crate::core::ServerState;
use crate::{ApiResponse, AppError, AppResult};

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/admin/orders", routes()).route_layer(
        middleware::from_fn_with_state(state.clone(), require_admin_auth),
    )
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list))
        .route("/stats", get(stats))
        .route("/export.csv", get(export_csv))
        .route("/bulk", post(bulk))
        .route("/{id}", get(get_by_id).delete(delete))
        .route("/{id}/confirm", post(confirm))
}

/// Orders newest first with the filter applied; counters cover everything
async fn list(
    State(state): State<ServerState>,
    AppQuery(filter): AppQuery<OrderFilter>,
) -> AppResult<ApiResponse<OrderListResponse>> {
    let all = state.orders.list()?;
    let stats = OrderStats::from_orders(&all);
    let orders = filter.apply(&all);

    Ok(ApiResponse::success(OrderListResponse {
        shown: orders.len(),
        orders,
        stats,
    }))
}

async fn stats(State(state): State<ServerState>) -> AppResult<ApiResponse<OrderStats>> {
    Ok(ApiResponse::success(state.orders.stats()?))
}

async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state
        .orders
        .get(&id)?
        .ok_or_else(|| AppError::order_not_found(&id))?;
    Ok(ApiResponse::success(order))
}

async fn confirm(
    State(state): State<ServerState>,
    admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.orders.confirm(&id)?;
    tracing::info!(order_id = %id, admin = %admin.email, "Order confirmed");
    Ok(ApiResponse::success(order))
}

async fn delete(
    State(state): State<ServerState>,
    admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.orders.delete(&id)?;
    tracing::info!(order_id = %id, admin = %admin.email, "Order deleted");
    Ok(ApiResponse::success(order))
}

async fn bulk(
    State(state): State<ServerState>,
    admin: CurrentAdmin,
    AppJson(req): AppJson<BulkRequest>,
) -> AppResult<ApiResponse<BulkResult>> {
    if req.ids.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::OrderSelectionEmpty,
            "Select at least one order",
        ));
    }

    let result = match req.action {
        BulkAction::Confirm => state.orders.confirm_many(&req.ids)?,
        BulkAction::Delete => state.orders.delete_many(&req.ids)?,
    };

    tracing::info!(
        action = req.action.as_str(),
        requested = req.ids.len(),
        affected = result.affected.len(),
        missing = result.missing.len(),
        admin = %admin.email,
        "Bulk order update"
    );

    Ok(ApiResponse::success(result))
}

/// CSV download of the filtered list
async fn export_csv(
    State(state): State<ServerState>,
    AppQuery(filter): AppQuery<OrderFilter>,
) -> AppResult<Response> {
    let orders = filter.apply(&state.orders.list()?);
    let body = orders_to_csv(&orders);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"orders.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}
