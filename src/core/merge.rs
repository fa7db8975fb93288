//! Merge engine - reconciles an edit batch with the persisted products of a list.
//!
//! A batch is first filtered to entries with a positive quantity and a positive
//! price. What happens next depends on the storage shape:
//!
//! - [`merge_additive`] (flat `"items"` variant): entries matching an existing
//!   item by exact name add to its quantity and overwrite its price; others are
//!   appended with a fresh id.
//! - [`merge_replace`] (multi-list `"lists"` variant): the valid entries become
//!   the whole product collection. Names that were already persisted keep
//!   their id.
//!
//! Each store calls exactly one of the two; they are never combined.

use super::id::ProductId;
use super::model::{Item, Product};
use super::numeric::{parse_price, parse_quantity};
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use tracing::debug;

/// One row of an add/edit session as the user left it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEntry {
    /// Catalog category, `None` for products that are not in the catalog.
    pub category: Option<String>,
    /// Product name, used as the merge key.
    pub name: String,
    /// Parsed quantity; 0 until the user enters one.
    pub quantity: u32,
    /// Raw price text, parsed only when the batch is saved.
    pub price_text: String,
}

impl EditEntry {
    /// A free-form row with quantity and price already filled in.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32, price_text: impl Into<String>) -> Self {
        Self {
            category: None,
            name: name.into(),
            quantity,
            price_text: price_text.into(),
        }
    }

    /// An untouched row: quantity 0, empty price.
    #[must_use]
    pub fn blank(category: Option<&str>, name: &str) -> Self {
        Self {
            category: category.map(str::to_string),
            name: name.to_string(),
            quantity: 0,
            price_text: String::new(),
        }
    }

    /// Updates the quantity from raw field text (non-digits are dropped).
    pub fn set_quantity_text(&mut self, text: &str) {
        self.quantity = parse_quantity(text);
    }

    /// Stores raw price text; it is parsed when the batch is validated.
    pub fn set_price_text(&mut self, text: &str) {
        self.price_text = text.to_string();
    }

    /// Row subtotal shown while editing; an unparseable price counts as zero.
    #[must_use]
    pub fn preview_subtotal(&self) -> Decimal {
        parse_price(&self.price_text)
            .unwrap_or(Decimal::ZERO)
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// An entry that passed batch validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    /// Product name.
    pub name: String,
    /// Positive quantity.
    pub quantity: u32,
    /// Positive unit price.
    pub price: Decimal,
}

/// Keeps the entries with `quantity > 0` and a parsed `price > 0`.
///
/// Entries failing either check are discarded, not zeroed.
///
/// # Errors
/// Returns [`Error::NoValidEntries`] when nothing survives the filter.
pub fn validate_batch(batch: &[EditEntry]) -> Result<Vec<ValidEntry>> {
    let valid: Vec<ValidEntry> = batch
        .iter()
        .filter(|entry| entry.quantity > 0)
        .filter_map(|entry| {
            let price = parse_price(&entry.price_text).ok()?;
            (price > Decimal::ZERO).then(|| ValidEntry {
                name: entry.name.clone(),
                quantity: entry.quantity,
                price,
            })
        })
        .collect();

    debug!(
        submitted = batch.len(),
        valid = valid.len(),
        "Validated edit batch"
    );

    if valid.is_empty() {
        return Err(Error::NoValidEntries);
    }
    Ok(valid)
}

/// Additive policy: matching names accumulate quantity and take the new price.
///
/// An existing item without a recorded quantity accumulates from zero.
#[must_use]
pub fn merge_additive(existing: Vec<Item>, entries: Vec<ValidEntry>) -> Vec<Item> {
    let mut merged = existing;
    for entry in entries {
        if let Some(item) = merged.iter_mut().find(|item| item.name == entry.name) {
            let quantity = item.quantity.unwrap_or(0).saturating_add(entry.quantity);
            item.quantity = Some(quantity);
            item.price = entry.price;
        } else {
            merged.push(Item {
                id: ProductId::generate(),
                name: entry.name,
                quantity: Some(entry.quantity),
                price: entry.price,
            });
        }
    }
    merged
}

/// Replace policy: the entries become the entire product collection.
///
/// Products missing from `entries` are dropped. A name already present in
/// `existing` keeps that product's id.
#[must_use]
pub fn merge_replace(existing: &[Product], entries: Vec<ValidEntry>) -> Vec<Product> {
    entries
        .into_iter()
        .map(|entry| {
            let id = existing
                .iter()
                .find(|product| product.name == entry.name)
                .map_or_else(ProductId::generate, |product| product.id.clone());
            Product {
                id,
                name: entry.name,
                quantity: entry.quantity,
                price: entry.price,
            }
        })
        .collect()
}
