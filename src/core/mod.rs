//! Core business logic - framework-agnostic list, merge and totals operations.

pub mod aggregate;
pub mod catalog;
pub mod export;
pub mod id;
pub mod merge;
pub mod model;
pub mod numeric;
pub mod store;

pub use id::{ListId, ProductId};
pub use merge::EditEntry;
pub use model::{Item, LineItem, Product, ShoppingList};
pub use store::{ItemStore, ListStore, MAX_LISTS};
