//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! The pool is opened once at startup and shared for the life of the
//! process; every request borrows a connection from it.

use picvault_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Initialize a database pool backed by a file on disk.
///
/// Creates the SQLite file if it does not exist, enables WAL journal mode
/// on every new connection, and runs pending migrations.
///
/// # Example
///
/// ```no_run
/// use picvault_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/picvault/picvault.db", 4).unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str, max_size: u32) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA journal_mode = WAL;"));

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database("Failed to create connection pool", e))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database("Failed to get connection for migrations", e))?;

    migrations::run_migrations(&conn)?;

    Ok(pool)
}

/// Initialize an in-memory database pool (useful for tests).
///
/// Each call creates a uniquely-named shared-cache in-memory database so
/// that parallel tests do not interfere with each other, while all
/// connections *within* a single pool still share state.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:picvault_mem_{}_{n}?mode=memory&cache=shared", std::process::id());

    let manager = SqliteConnectionManager::file(uri);

    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Error::database("Failed to create in-memory pool", e))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database("Failed to get connection for migrations", e))?;

    migrations::run_migrations(&conn)?;

    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
///
/// The error context is the text a client sees if the pool is exhausted.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database("Database unavailable.", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), 4);
    }

    #[test]
    fn test_migrations_run_on_init() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='images'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_connections_share_state() {
        let pool = init_memory_pool().unwrap();
        let conn1 = get_conn(&pool).unwrap();
        let conn2 = get_conn(&pool).unwrap();

        conn1
            .execute(
                "INSERT INTO images (owner_hash, image_name, image_data) VALUES (?1, ?2, ?3)",
                rusqlite::params!["a".repeat(64), "shared", "A".repeat(1024)],
            )
            .unwrap();

        let count: i64 = conn2
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_memory_pools_are_isolated() {
        let a = init_memory_pool().unwrap();
        let b = init_memory_pool().unwrap();

        get_conn(&a)
            .unwrap()
            .execute(
                "INSERT INTO images (owner_hash, image_name, image_data) VALUES (?1, ?2, ?3)",
                rusqlite::params!["a".repeat(64), "only_in_a", "A".repeat(1024)],
            )
            .unwrap();

        let count: i64 = get_conn(&b)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_file_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picvault.db");

        let pool = init_pool(path.to_str().unwrap(), 2).unwrap();
        assert_eq!(pool.max_size(), 2);
        assert!(path.exists());

        let mode: String = get_conn(&pool)
            .unwrap()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_file_pool_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picvault.db");
        let path = path.to_str().unwrap();

        {
            let pool = init_pool(path, 1).unwrap();
            get_conn(&pool)
                .unwrap()
                .execute(
                    "INSERT INTO images (owner_hash, image_name, image_data) VALUES (?1, ?2, ?3)",
                    rusqlite::params!["a".repeat(64), "kept", "A".repeat(1024)],
                )
                .unwrap();
        }

        let pool = init_pool(path, 1).unwrap();
        let count: i64 = get_conn(&pool)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
