//! Admin dashboard state
//!
//! [`AdminDashboard`] mirrors the order collection and applies the
//! filter bar locally. Remote calls go through [`AdminApi`]; local state
//! only changes after the server has accepted the change, so the mirror
//! never shows something the store does not hold.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use shared::client::{BulkAction, BulkResult};
use shared::order::{OrderFilter, OrderStats, StatusFilter, orders_to_csv};
use shared::{AppError, ErrorCode, Order};

use crate::ClientResult;
use crate::api::AdminApi;
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};

/// Result of [`AdminDashboard::refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub total: usize,
    /// Orders that appeared since the previous non-empty fetch
    pub new_orders: usize,
}

impl RefreshOutcome {
    pub fn has_new_orders(&self) -> bool {
        self.new_orders > 0
    }
}

pub struct AdminDashboard<A: AdminApi> {
    api: A,
    orders: Vec<Order>,
    filter: OrderFilter,
    search_input: String,
    search: Debouncer<String>,
    selected: BTreeSet<String>,
    prev_count: usize,
}

impl<A: AdminApi> AdminDashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            orders: Vec::new(),
            filter: OrderFilter::default(),
            search_input: String::new(),
            search: Debouncer::new(SEARCH_DEBOUNCE),
            selected: BTreeSet::new(),
            prev_count: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Every mirrored order, newest first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    /// Fetch the whole collection and replace the mirror
    ///
    /// The first non-empty fetch only sets the baseline for the
    /// new-order count.
    pub async fn refresh(&mut self) -> ClientResult<RefreshOutcome> {
        let list = self.api.list_orders(&OrderFilter::default()).await?;
        self.orders = list.orders;

        let total = self.orders.len();
        let new_orders = if self.prev_count > 0 && total > self.prev_count {
            total - self.prev_count
        } else {
            0
        };
        self.prev_count = total;

        let before = self.selected.len();
        let orders = &self.orders;
        self.selected.retain(|id| orders.iter().any(|o| &o.id == id));
        if self.selected.len() != before {
            tracing::debug!(dropped = before - self.selected.len(), "Pruned stale selection");
        }

        if new_orders > 0 {
            tracing::info!(new_orders, total, "New orders arrived");
        }
        Ok(RefreshOutcome { total, new_orders })
    }

    // ========== Filter bar ==========

    /// Text as typed; applied once typing pauses
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_input = term.into();
        self.search.push(self.search_input.clone());
    }

    /// Apply the search term if the quiet period has passed
    pub fn poll_search(&mut self) -> bool {
        match self.search.ready() {
            Some(term) => {
                self.filter.search = term;
                true
            }
            None => false,
        }
    }

    /// Wait for the quiet period and apply the pending search term
    pub async fn settle_search(&mut self) -> bool {
        match self.search.settle().await {
            Some(term) => {
                self.filter.search = term;
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.filter.from = from;
        self.filter.to = to;
    }

    pub fn clear_dates(&mut self) {
        self.set_date_range(None, None);
    }

    /// Zone used for day boundaries, minutes east of UTC
    pub fn set_offset_minutes(&mut self, minutes: i32) {
        self.filter.offset = minutes;
    }

    /// Mirrored orders passing the current filter
    pub fn visible(&self) -> Vec<Order> {
        self.filter.apply(&self.orders)
    }

    /// Counters over the whole mirror, not just the visible rows
    pub fn stats(&self) -> OrderStats {
        OrderStats::from_orders(&self.orders)
    }

    // ========== Single order ==========

    pub async fn confirm(&mut self, id: &str) -> ClientResult<()> {
        self.api.confirm_order(id).await?;
        if let Some(order) = self.orders.iter_mut().find(|o| o.id == id) {
            order.confirm();
        }
        Ok(())
    }

    /// Delete remotely, then drop the order from the list and selection
    ///
    /// An order the store no longer knows is dropped locally too before
    /// the error is returned.
    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        match self.api.delete_order(id).await {
            Ok(_) => {
                self.forget(id);
                Ok(())
            }
            Err(e) if e.code() == Some(ErrorCode::OrderNotFound) => {
                self.forget(id);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn forget(&mut self, id: &str) {
        self.orders.retain(|o| o.id != id);
        self.selected.remove(id);
    }

    // ========== Selection ==========

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Flip one row; unknown ids are ignored
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) && self.orders.iter().any(|o| o.id == id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn select_all_visible(&mut self) {
        let visible = self.visible();
        self.selected.extend(visible.into_iter().map(|o| o.id));
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // ========== Bulk actions ==========

    /// Confirm the selection
    ///
    /// Every submitted id the store still has ends up confirmed, including
    /// ones already confirmed elsewhere that `affected` leaves out.
    pub async fn bulk_confirm(&mut self) -> ClientResult<BulkResult> {
        let (submitted, result) = self.bulk(BulkAction::Confirm).await?;
        for order in self
            .orders
            .iter_mut()
            .filter(|o| submitted.contains(&o.id) && !result.missing.contains(&o.id))
        {
            order.confirm();
        }
        Ok(result)
    }

    pub async fn bulk_delete(&mut self) -> ClientResult<BulkResult> {
        let (submitted, result) = self.bulk(BulkAction::Delete).await?;
        for id in &submitted {
            self.forget(id);
        }
        Ok(result)
    }

    /// Run the action over the selection; ids the store does not have
    /// are dropped from the mirror and the selection is cleared.
    /// Returns the submitted ids along with the store's report.
    async fn bulk(&mut self, action: BulkAction) -> ClientResult<(Vec<String>, BulkResult)> {
        if self.selected.is_empty() {
            return Err(AppError::new(ErrorCode::OrderSelectionEmpty).into());
        }
        let ids: Vec<String> = self.selected.iter().cloned().collect();
        let result = self.api.bulk(action, &ids).await?;

        for id in &result.missing {
            self.forget(id);
        }
        self.selected.clear();

        tracing::info!(
            action = action.as_str(),
            affected = result.affected.len(),
            missing = result.missing.len(),
            "Bulk action applied"
        );
        Ok((ids, result))
    }

    // ========== Export ==========

    /// CSV of the visible rows
    pub fn export_csv(&self) -> String {
        orders_to_csv(&self.visible())
    }

    pub async fn write_csv(&self, path: impl AsRef<Path>) -> ClientResult<usize> {
        let visible = self.visible();
        tokio::fs::write(path.as_ref(), orders_to_csv(&visible)).await?;
        tracing::info!(rows = visible.len(), path = %path.as_ref().display(), "CSV written");
        Ok(visible.len())
    }
}

impl<A: AdminApi + std::fmt::Debug> std::fmt::Debug for AdminDashboard<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDashboard")
            .field("api", &self.api)
            .field("orders", &self.orders.len())
            .field("filter", &self.filter)
            .field("selected", &self.selected)
            .finish()
    }
}
