//! Revoked token ids
//!
//! Sign-out stores the token's `jti` until the token would have expired
//! anyway. The list lives in the `revoked_tokens` table of the order
//! database, so a restart with the same signing secret keeps signed-out
//! tokens out. Entries past their expiry are pruned periodically.

use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableError};

use crate::orders::{OrderStorage, StorageResult};

/// key = jti, value = exp (unix seconds)
const REVOKED_TOKENS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("revoked_tokens");

#[derive(Clone)]
pub struct RevokedTokens {
    db: Arc<Database>,
}

impl std::fmt::Debug for RevokedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevokedTokens").finish_non_exhaustive()
    }
}

impl RevokedTokens {
    /// Revocation list sharing the order store's database
    pub fn new(storage: &OrderStorage) -> Self {
        Self {
            db: storage.database(),
        }
    }

    pub fn revoke(&self, jti: &str, expires_at: i64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(REVOKED_TOKENS_TABLE)?;
            table.insert(jti, expires_at)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn is_revoked(&self, jti: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(REVOKED_TOKENS_TABLE) {
            Ok(table) => table,
            // Nothing revoked yet
            Err(TableError::TableDoesNotExist(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        Ok(table.get(jti)?.is_some())
    }

    /// Drop entries whose token has expired; returns how many were removed
    pub fn prune(&self, now: i64) -> StorageResult<usize> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(REVOKED_TOKENS_TABLE)?;
            let mut expired = Vec::new();
            for entry in table.iter()? {
                let (jti, exp) = entry?;
                if exp.value() <= now {
                    expired.push(jti.value().to_string());
                }
            }
            for jti in &expired {
                table.remove(jti.as_str())?;
            }
            expired.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    pub fn len(&self) -> StorageResult<usize> {
        let read_txn = self.db.begin_read()?;
        match read_txn.open_table(REVOKED_TOKENS_TABLE) {
            Ok(table) => Ok(table.iter()?.count()),
            Err(TableError::TableDoesNotExist(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}
