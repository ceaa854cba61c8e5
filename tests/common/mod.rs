//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB and a
//! [`RecordStore`] with a known init password. The [`with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use picvault::server::{create_router, AppContext};
use picvault::store::RecordStore;
use picvault_db::pool::{init_memory_pool, DbPool};
use serde_json::Value;

/// Init password every harness is built with.
pub const INIT_PASSWORD: &str = "init";

/// Test harness wrapping a [`RecordStore`] backed by an in-memory database.
pub struct TestHarness {
    pub store: RecordStore,
    pub db: DbPool,
}

impl TestHarness {
    /// Create a new harness with an in-memory DB.
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let store = RecordStore::new(db.clone(), INIT_PASSWORD);
        Self { store, db }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = create_router(AppContext {
            store: harness.store.clone(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> picvault_db::pool::PooledConnection {
        picvault_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }
}

/// A payload of exactly `len` base64 characters.
pub fn payload(len: usize) -> String {
    "A".repeat(len)
}

/// POST a JSON body to `/app3/{op}` and return the status and parsed body.
pub async fn post(addr: SocketAddr, op: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/app3/{op}"))
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status().as_u16();
    let json = resp.json().await.unwrap_or(Value::Null);
    (status, json)
}
