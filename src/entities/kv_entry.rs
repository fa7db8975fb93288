//! Key-value entity - One row per persisted record.
//!
//! Each logical collection (`"items"` or `"lists"`) is stored whole as a JSON
//! document under its key. Rows are only ever replaced, never patched.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kv_store")]
pub struct Model {
    /// Storage key (e.g., `"lists"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Serialized payload
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the record was last written
    pub updated_at: DateTime,
}

/// `KvEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
