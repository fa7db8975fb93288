//! `SQLite` key-value adapter over the `kv_store` table.

use super::KeyValueStore;
use crate::entities::{KvEntry, kv_entry};
use crate::errors::Result;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing::{debug, info, instrument};

/// Key-value storage backed by the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an open connection. The table must already exist, see
    /// [`create_tables`](crate::config::database::create_tables).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects using the configured database URL and creates the table if needed.
    pub async fn connect() -> Result<Self> {
        let db = crate::config::database::create_connection().await?;
        crate::config::database::create_tables(&db).await?;
        Ok(Self::new(db))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = KvEntry::find_by_id(key.to_string())
            .one(&self.db)
            .await?
            .map(|entry| entry.value);
        debug!("Record '{}' present: {}", key, value.is_some());
        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now().naive_utc()),
        };

        // Upsert
        KvEntry::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        info!("Wrote record '{}' ({} bytes)", key, value.len());
        Ok(())
    }
}
