//! Shared test utilities.
//!
//! Helpers for setting up an in-memory `SQLite` store and building sample rows.

use crate::{
    core::{Item, ProductId},
    errors::{Error, Result},
    storage::{KeyValueStore, MemoryStore, SqliteStore},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber, `trace` unless `RUST_LOG` says otherwise.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` store with its table initialized.
pub async fn setup_test_store() -> Result<SqliteStore> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(SqliteStore::new(db))
}

/// Creates a flat item with a recorded quantity and a price in cents.
pub fn sample_item(name: &str, quantity: u32, cents: i64) -> Item {
    Item {
        id: ProductId::generate(),
        name: name.to_string(),
        quantity: Some(quantity),
        price: Decimal::new(cents, 2),
    }
}

/// Storage whose reads find nothing and whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Database(sea_orm::DbErr::Custom(
            "disk full".to_string(),
        )))
    }
}

/// In-memory storage whose reads can be switched to fail, like a locked database.
///
/// Writes always succeed. Clones share the records and the switch.
#[derive(Debug, Clone, Default)]
pub struct FlakyReadStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl FlakyReadStore {
    /// An empty store with reads succeeding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `get` fail (`true`) or succeed again (`false`).
    pub fn fail_reads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyReadStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Database(sea_orm::DbErr::Custom(
                "database is locked".to_string(),
            )));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value).await
    }
}
