//! Product catalog - the fixed category to product-name mapping.
//!
//! The catalog seeds the editable working set of an add/edit session. It is
//! read-only once built; see [`crate::config::catalog`] for loading one from
//! TOML.

use super::merge::EditEntry;
use super::model::ShoppingList;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One catalog category and its products, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Heading shown above the products.
    pub name: String,
    /// Product names in display order.
    pub products: Vec<String>,
}

/// Ordered categories of product names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalog {
    categories: Vec<Category>,
}

const BUILTIN: &[(&str, &[&str])] = &[
    ("Grains", &["Rice", "Beans", "Pasta", "Flour", "Oats"]),
    ("Dairy", &["Milk", "Butter", "Cheese", "Yogurt"]),
    ("Produce", &["Tomato", "Onion", "Potato", "Banana", "Apple"]),
    ("Meat", &["Chicken", "Ground Beef", "Sausage"]),
    ("Bakery", &["Bread", "Crackers"]),
    ("Beverages", &["Coffee", "Juice", "Water"]),
    ("Cleaning", &["Detergent", "Soap", "Sponge"]),
];

impl ProductCatalog {
    /// A catalog with the given categories, in display order.
    #[must_use]
    pub const fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let categories = BUILTIN
            .iter()
            .map(|(name, products)| Category {
                name: (*name).to_string(),
                products: products.iter().map(|p| (*p).to_string()).collect(),
            })
            .collect();
        Self { categories }
    }

    /// Categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Every `(category, product)` pair, category order first, then name order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .flat_map(|category| {
                category
                    .products
                    .iter()
                    .map(move |product| (category.name.as_str(), product.as_str()))
            })
            .collect()
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Seeds a blank working set: one entry per distinct catalog name, quantity 0, no price.
#[must_use]
pub fn seed_batch(catalog: &ProductCatalog) -> Vec<EditEntry> {
    let mut seen = HashSet::new();
    catalog
        .flatten()
        .into_iter()
        .filter(|(_, name)| seen.insert(*name))
        .map(|(category, name)| EditEntry::blank(Some(category), name))
        .collect()
}

/// Seeds a working set prefilled from what `list` already holds.
///
/// Catalog entries matching a persisted product take its quantity and price.
/// Products not in the catalog are appended after the catalog entries, so a
/// replace-merge of the untouched working set keeps the list as it is.
#[must_use]
pub fn seed_batch_for_list(catalog: &ProductCatalog, list: &ShoppingList) -> Vec<EditEntry> {
    let mut batch = seed_batch(catalog);
    for product in &list.products {
        if let Some(entry) = batch.iter_mut().find(|e| e.name == product.name) {
            entry.quantity = product.quantity;
            entry.price_text = product.price.to_string();
        } else {
            batch.push(EditEntry {
                category: None,
                name: product.name.clone(),
                quantity: product.quantity,
                price_text: product.price.to_string(),
            });
        }
    }
    batch
}
