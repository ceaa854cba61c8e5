//! Picvault-DB: Database schema, migrations, and query operations
//!
//! This crate provides storage for picvault image records using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations and the destructive table reset
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use picvault_common::hash_owner_id;
//! use picvault_db::pool::{init_pool, get_conn};
//! use picvault_db::queries::images;
//!
//! let pool = init_pool("/var/lib/picvault/picvault.db", 4).unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let owner = hash_owner_id("alice");
//! let record = images::insert_image(&conn, &owner, "cat.png", &"A".repeat(1024)).unwrap();
//! println!("Created image: {}", record.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
