//! Database configuration module.
//!
//! This module handles the `SQLite` connection backing the key-value storage and
//! creates its single table from the entity definition. The table is created
//! with `IF NOT EXISTS`, so calling [`create_tables`] on every start is safe.

use crate::entities::KvEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Fallback location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/shoplist.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
///
/// A `.env` file in the working directory is loaded first when present.
#[must_use]
pub fn get_database_url() -> String {
    if dotenvy::dotenv().is_ok() {
        debug!("Loaded .env file");
    }
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    info!("Connecting to storage at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the key-value table from its entity definition if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut kv_table = schema.create_table_from_entity(KvEntry);
    kv_table.if_not_exists();

    db.execute(builder.build(&kv_table)).await?;
    Ok(())
}
