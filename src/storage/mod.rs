//! Storage layer - the key-value port and its adapters.
//!
//! The core treats storage as an opaque string-keyed get/set. Collections are
//! always read and written whole through a [`Repository`].

pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryStore;
pub use repository::Repository;
pub use sqlite::SqliteStore;

use crate::errors::Result;
use async_trait::async_trait;

/// Opaque key-value storage with string keys and string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the record stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the record stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
