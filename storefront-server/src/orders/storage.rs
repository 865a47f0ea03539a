//! redb-based order store
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `orders` | `order_id` | JSON-serialized `Order` |
//! | `revoked_tokens` | `jti` | token expiry, see [`RevokedTokens`](crate::auth::RevokedTokens) |
//!
//! Every write opens its own transaction. Batch operations touch all ids
//! inside one transaction, so either every change lands or none does.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::client::BulkResult;
use shared::order::OrderStats;
use shared::{AppError, ErrorCode, Order, OrderStatus};
use thiserror::Error;

/// `STORE_PATH` value selecting the in-memory backend
pub const MEMORY_STORE: &str = ":memory:";

/// key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already exists: {0}")]
    Duplicate(String),

    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => AppError::order_not_found(id),
            StorageError::Duplicate(id) => AppError::with_message(
                ErrorCode::AlreadyExists,
                format!("Order {id} already exists"),
            )
            .with_detail("id", id),
            StorageError::InvalidTransition { id, from, to } => AppError::with_message(
                ErrorCode::OrderInvalidTransition,
                format!("Order cannot move from {from} to {to}"),
            )
            .with_detail("id", id),
            other => {
                tracing::error!(error = %other, "Order storage failure");
                AppError::database(other.to_string())
            }
        }
    }
}

/// Order store backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for OrderStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStorage").finish_non_exhaustive()
    }
}

impl OrderStorage {
    /// Open the store named by `STORE_PATH`
    ///
    /// [`MEMORY_STORE`] selects the in-memory backend; anything else is a
    /// file path whose parent directory is created if needed.
    pub fn open_path(path: &str) -> StorageResult<Self> {
        if path == MEMORY_STORE {
            return Self::open_in_memory();
        }
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Handle on the underlying database for sibling tables
    pub(crate) fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    // ========== Single order operations ==========

    /// Store a new order
    pub fn insert(&self, order: &Order) -> StorageResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            if table.get(order.id.as_str())?.is_some() {
                return Err(StorageError::Duplicate(order.id.clone()));
            }
            table.insert(order.id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All orders, newest first (orders without a timestamp last)
    pub fn list(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::with_capacity(table.len()? as usize);
        for result in table.iter()? {
            let (_key, value) = result?;
            orders.push(serde_json::from_slice::<Order>(value.value())?);
        }

        orders.sort_by(Order::cmp_newest_first);
        Ok(orders)
    }

    pub fn count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.len()?)
    }

    pub fn stats(&self) -> StorageResult<OrderStats> {
        Ok(OrderStats::from_orders(&self.list()?))
    }

    /// Set an order's status
    ///
    /// Only `pending -> confirmed` is a change. Setting the current status
    /// again returns the order untouched; anything else is rejected.
    pub fn update_status(&self, id: &str, status: OrderStatus) -> StorageResult<Order> {
        let write_txn = self.db.begin_write()?;
        let order = {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            let existing = table.get(id)?.map(|guard| guard.value().to_vec());
            let Some(bytes) = existing else {
                return Err(StorageError::OrderNotFound(id.to_string()));
            };
            let mut order: Order = serde_json::from_slice(&bytes)?;

            if order.status == status {
                return Ok(order);
            }
            if !order.status.can_transition_to(status) {
                return Err(StorageError::InvalidTransition {
                    id: id.to_string(),
                    from: order.status,
                    to: status,
                });
            }

            order.status = status;
            table.insert(id, serde_json::to_vec(&order)?.as_slice())?;
            order
        };
        write_txn.commit()?;
        Ok(order)
    }

    pub fn confirm(&self, id: &str) -> StorageResult<Order> {
        self.update_status(id, OrderStatus::Confirmed)
    }

    /// Remove an order, returning what was stored
    pub fn delete(&self, id: &str) -> StorageResult<Order> {
        let write_txn = self.db.begin_write()?;
        let order = {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            let removed = table.remove(id)?.map(|guard| guard.value().to_vec());
            match removed {
                Some(bytes) => serde_json::from_slice::<Order>(&bytes)?,
                None => return Err(StorageError::OrderNotFound(id.to_string())),
            }
        };
        write_txn.commit()?;
        Ok(order)
    }

    // ========== Batch operations ==========

    /// Confirm every pending order in `ids`
    ///
    /// `affected` lists orders that moved to confirmed; already confirmed
    /// orders are left alone and appear in neither list.
    pub fn confirm_many(&self, ids: &[String]) -> StorageResult<BulkResult> {
        let mut result = BulkResult::default();
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            for id in dedup(ids) {
                let existing = table.get(id)?.map(|guard| guard.value().to_vec());
                let Some(bytes) = existing else {
                    result.missing.push(id.to_string());
                    continue;
                };
                let mut order: Order = serde_json::from_slice(&bytes)?;
                if order.confirm() {
                    table.insert(id, serde_json::to_vec(&order)?.as_slice())?;
                    result.affected.push(id.to_string());
                }
            }
        }
        write_txn.commit()?;
        Ok(result)
    }

    /// Delete every order in `ids`
    pub fn delete_many(&self, ids: &[String]) -> StorageResult<BulkResult> {
        let mut result = BulkResult::default();
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            for id in dedup(ids) {
                if table.remove(id)?.is_some() {
                    result.affected.push(id.to_string());
                } else {
                    result.missing.push(id.to_string());
                }
            }
        }
        write_txn.commit()?;
        Ok(result)
    }
}

/// Unique ids in first-seen order
fn dedup(ids: &[String]) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(move |id| seen.insert(*id))
}
