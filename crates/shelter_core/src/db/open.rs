//! Connection bootstrap for the pets store.
//!
//! # Invariants
//! - Returned connections have the pets schema at the requested version.
//! - Open failures on file stores surface as `DbError::StorageUnavailable`.

use super::schema::SchemaManager;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (creating if needed) the store file at `path` and applies `schema`.
///
/// Repeated calls against the same file are idempotent: the table is only
/// created on the first one, and only rebuilt when `schema` targets a newer
/// version than the file carries.
pub fn open_store(
    path: impl AsRef<Path>,
    schema: &SchemaManager,
    busy_timeout: Duration,
) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(|source| {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=storage_unavailable error={}",
            started_at.elapsed().as_millis(),
            source
        );
        DbError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        }
    })?;

    finish_open(conn, schema, busy_timeout, "file", started_at)
}

/// Opens a private in-memory store and applies `schema`.
pub fn open_store_in_memory(schema: &SchemaManager) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");
    let conn = Connection::open_in_memory()?;
    finish_open(conn, schema, Duration::ZERO, "memory", started_at)
}

fn finish_open(
    mut conn: Connection,
    schema: &SchemaManager,
    busy_timeout: Duration,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    let result = bootstrap(&mut conn, schema, busy_timeout);
    match result {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} version={} duration_ms={}",
                mode,
                schema.target_version(),
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap(
    conn: &mut Connection,
    schema: &SchemaManager,
    busy_timeout: Duration,
) -> DbResult<()> {
    if !busy_timeout.is_zero() {
        conn.busy_timeout(busy_timeout)?;
    }
    schema.ensure(conn)?;
    Ok(())
}
