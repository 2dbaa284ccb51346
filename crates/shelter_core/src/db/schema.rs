//! Pets table definition and version policy.
//!
//! # Responsibility
//! - Create the `pets` table on a fresh store.
//! - Apply the destructive upgrade policy when the target version rises.
//!
//! # Invariants
//! - `_id` is `INTEGER PRIMARY KEY AUTOINCREMENT`, so ids are never reused
//!   within one table lifetime.
//! - `name` and `gender` are `NOT NULL`; `weight` defaults to 0.
//! - Create/upgrade and the `user_version` bump commit in one transaction.

use crate::contract::{
    COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT, DATABASE_VERSION,
    TABLE_PETS,
};
use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};

/// What `SchemaManager::ensure` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// Fresh store; table created.
    Created { version: u32 },
    /// Older store; table dropped and recreated empty.
    Rebuilt { from: u32, to: u32 },
    /// Store already at the target version.
    Current { version: u32 },
}

/// Owns the table layout and the version check for one target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaManager {
    target_version: u32,
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self {
            target_version: DATABASE_VERSION,
        }
    }
}

impl SchemaManager {
    pub fn new(target_version: u32) -> DbResult<Self> {
        if target_version == 0 {
            return Err(DbError::InvalidSchemaVersion(target_version));
        }
        Ok(Self { target_version })
    }

    pub fn target_version(&self) -> u32 {
        self.target_version
    }

    /// Brings the store to `target_version`.
    ///
    /// Stores older than the target lose all records: the table is dropped and
    /// recreated empty, which also resets id assignment.
    ///
    /// # Errors
    /// - `DbError::UnsupportedSchemaVersion` when the store is newer than the target.
    pub fn ensure(&self, conn: &mut Connection) -> DbResult<SchemaOutcome> {
        let current = stored_version(conn)?;
        let target = self.target_version;

        if current > target {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: current,
                latest_supported: target,
            });
        }
        if current == target {
            return Ok(SchemaOutcome::Current { version: current });
        }

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = if current == 0 {
            tx.execute_batch(&create_table_sql())?;
            info!("event=schema_create module=db status=ok version={target}");
            SchemaOutcome::Created { version: target }
        } else {
            warn!(
                "event=schema_rebuild module=db status=start from={current} to={target} data_loss=true"
            );
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {TABLE_PETS};"))?;
            tx.execute_batch(&create_table_sql())?;
            SchemaOutcome::Rebuilt {
                from: current,
                to: target,
            }
        };
        tx.execute_batch(&format!("PRAGMA user_version = {target};"))?;
        tx.commit()?;

        Ok(outcome)
    }
}

/// Reads `PRAGMA user_version` from the store.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_PETS} (
            {COLUMN_ID} INTEGER PRIMARY KEY AUTOINCREMENT,
            {COLUMN_NAME} TEXT NOT NULL,
            {COLUMN_BREED} TEXT,
            {COLUMN_GENDER} INTEGER NOT NULL,
            {COLUMN_WEIGHT} INTEGER NOT NULL DEFAULT 0
        );"
    )
}
