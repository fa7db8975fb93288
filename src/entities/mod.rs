//! Entity module - SeaORM entity definitions for the backing database.
//! The core only needs a single key-value table; every collection is one row.

pub mod kv_entry;

pub use kv_entry::{Column as KvEntryColumn, Entity as KvEntry, Model as KvEntryModel};
