//! Embedded SQL migrations, runner, and the destructive table reset.
//!
//! Migrations are stored as `&str` constants and executed in order. A
//! `schema_migrations` table tracks which versions have been applied.

use picvault_common::{Error, Result};
use rusqlite::Connection;

/// Schema of the `images` table.
///
/// The CHECK constraints mirror the field validation in
/// `picvault_common::validate`. The whitespace check covers ASCII
/// whitespace only; the validation layer also rejects Unicode whitespace.
pub const IMAGES_SCHEMA: &str = r#"
CREATE TABLE images (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_hash  TEXT NOT NULL CHECK (length(owner_hash) = 64),
    image_name  TEXT NOT NULL CHECK (
                    length(image_name) >= 1
                    AND length(image_name) <= 100
                    AND image_name NOT GLOB ('*[' || char(9, 10, 11, 12, 13, 32) || ']*')
                ),
    image_data  TEXT NOT NULL CHECK (
                    length(image_data) >= 1024 AND length(image_data) <= 131072
                ),
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX idx_images_owner_hash ON images(owner_hash);
"#;

/// A single migration with its SQL content
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// All available migrations
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "images",
    sql: IMAGES_SCHEMA,
}];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
///
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database("Failed to create schema_migrations", e))?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [migration.version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database("Failed to read schema version", e))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database("Failed to begin migration", e))?;

        tx.execute_batch(migration.sql).map_err(|e| {
            Error::database(format!("Migration V{} failed", migration.version), e)
        })?;

        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.name],
        )
        .map_err(|e| Error::database("Failed to record migration", e))?;

        tx.commit()
            .map_err(|e| Error::database("Failed to commit migration", e))?;

        applied += 1;
        tracing::info!(
            version = migration.version,
            name = migration.name,
            "Applied migration"
        );
    }

    Ok(applied)
}

/// Drop the `images` table and recreate it empty.
///
/// Both steps run in one transaction, so a failure leaves the previous
/// table in place. The `sqlite_sequence` row goes with the table, so ids
/// start again from 1.
pub fn reset_images_table(conn: &Connection) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database("Failed to initialize database.", e))?;

    tx.execute_batch("DROP TABLE IF EXISTS images;")
        .map_err(|e| Error::database("Failed to initialize database.", e))?;
    tx.execute_batch(IMAGES_SCHEMA)
        .map_err(|e| Error::database("Failed to initialize database.", e))?;

    tx.commit()
        .map_err(|e| Error::database("Failed to initialize database.", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn count_images(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap()
    }

    fn insert_raw(conn: &Connection, hash: &str, name: &str, data: &str) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO images (owner_hash, image_name, image_data) VALUES (?1, ?2, ?3)",
            rusqlite::params![hash, name, data],
        )
    }

    #[test]
    fn test_run_migrations() {
        let conn = Connection::open_in_memory().unwrap();

        let applied = run_migrations(&conn).unwrap();
        assert_eq!(applied, MIGRATIONS.len());

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);

        // second call is a no-op
        let applied = run_migrations(&conn).unwrap();
        assert_eq!(applied, 0);
    }

    #[test]
    fn test_schema_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert!(table_exists(&conn, "images"));
        assert!(table_exists(&conn, "schema_migrations"));
    }

    #[test]
    fn test_constraints_reject_corrupt_rows() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let hash = "a".repeat(64);
        let data = "A".repeat(1024);

        assert!(insert_raw(&conn, &hash, "ok_name", &data).is_ok());
        assert!(insert_raw(&conn, "short", "ok_name", &data).is_err());
        assert!(insert_raw(&conn, &hash, "", &data).is_err());
        assert!(insert_raw(&conn, &hash, "has space", &data).is_err());
        assert!(insert_raw(&conn, &hash, "has\ttab", &data).is_err());
        assert!(insert_raw(&conn, &hash, &"n".repeat(101), &data).is_err());
        assert!(insert_raw(&conn, &hash, "ok_name", &"A".repeat(1023)).is_err());
        assert!(insert_raw(&conn, &hash, "ok_name", &"A".repeat(131_073)).is_err());

        assert_eq!(count_images(&conn), 1);
    }

    #[test]
    fn test_reset_empties_table() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        insert_raw(&conn, &"a".repeat(64), "first", &"A".repeat(1024)).unwrap();
        assert_eq!(count_images(&conn), 1);

        reset_images_table(&conn).unwrap();
        assert_eq!(count_images(&conn), 0);

        reset_images_table(&conn).unwrap();
        assert_eq!(count_images(&conn), 0);
    }

    #[test]
    fn test_reset_restarts_ids() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        insert_raw(&conn, &"a".repeat(64), "one", &"A".repeat(1024)).unwrap();
        insert_raw(&conn, &"a".repeat(64), "two", &"A".repeat(1024)).unwrap();

        reset_images_table(&conn).unwrap();
        insert_raw(&conn, &"a".repeat(64), "again", &"A".repeat(1024)).unwrap();

        let id: i64 = conn
            .query_row("SELECT id FROM images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_reset_recreates_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute_batch("DROP TABLE images;").unwrap();

        reset_images_table(&conn).unwrap();
        assert!(table_exists(&conn, "images"));
    }
}
