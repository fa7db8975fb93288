//! Persisted data model for both storage shapes.
//!
//! The flat variant stores a sequence of [`Item`] under `"items"`; the
//! multi-list variant stores a sequence of [`ShoppingList`] under `"lists"`.
//! Numeric fields load fail-soft: a missing or non-numeric price loads as zero
//! rather than rejecting the whole payload.

use super::id::{ListId, ProductId};
use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Multiplier applied to a flat item whose quantity was never recorded.
pub const DEFAULT_ITEM_QUANTITY: u32 = 1;

/// A collection element that is stored whole under a fixed key.
pub trait Persisted: Serialize + DeserializeOwned {
    /// Key of the single storage record holding the collection.
    const KEY: &'static str;
}

/// Read-only view of a priced row, shared by [`Item`] and [`Product`].
pub trait LineItem {
    /// Display name; also the merge key.
    fn name(&self) -> &str;
    /// Price of one unit.
    fn unit_price(&self) -> Decimal;
    /// Number of units counted in totals.
    fn multiplier(&self) -> u32;
}

/// An entry of the flat single-list variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned once when the item is first merged in.
    pub id: ProductId,
    /// Display name and merge key.
    pub name: String,
    /// Units bought; `None` for records written without one.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_quantity"
    )]
    pub quantity: Option<u32>,
    /// Unit price. Stored as a JSON number, so only prices of up to
    /// [`MAX_PRICE_DIGITS`](super::numeric::MAX_PRICE_DIGITS) significant
    /// digits survive a save and reload exactly.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "lenient::price"
    )]
    pub price: Decimal,
}

impl Persisted for Item {
    const KEY: &'static str = "items";
}

impl LineItem for Item {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn multiplier(&self) -> u32 {
        self.quantity.unwrap_or(DEFAULT_ITEM_QUANTITY)
    }
}

/// A product inside a [`ShoppingList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Kept across replace merges while the name stays in the list.
    pub id: ProductId,
    /// Display name and merge key.
    pub name: String,
    /// Units bought.
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    /// Unit price, with the same storage precision limit as [`Item::price`].
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "lenient::price"
    )]
    pub price: Decimal,
}

impl LineItem for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn multiplier(&self) -> u32 {
        self.quantity
    }
}

/// A named list of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    /// Assigned at creation.
    pub id: ListId,
    /// Trimmed, non-empty title.
    pub name: String,
    /// Creation time, stored as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Replaced wholesale on every save.
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ShoppingList {
    /// Creates an empty list stamped with the current time.
    ///
    /// The timestamp is truncated to milliseconds, the precision it is stored with.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ListId::generate(),
            name: name.into(),
            created_at: Utc::now().trunc_subsecs(3),
            products: Vec::new(),
        }
    }
}

impl Persisted for ShoppingList {
    const KEY: &'static str = "lists";
}

mod lenient {
    use super::super::numeric::{parse_price, parse_quantity};
    use rust_decimal::Decimal;
    use rust_decimal::prelude::FromPrimitive;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map_or(Decimal::ZERO, decimal_from_value))
    }

    pub fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map_or(0, quantity_from_value))
    }

    pub fn optional_quantity<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(quantity_from_value))
    }

    fn decimal_from_value(value: &Value) -> Decimal {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Decimal::from)
                .or_else(|| n.as_f64().and_then(decimal_from_f64))
                .unwrap_or(Decimal::ZERO),
            Value::String(s) => parse_price(s).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }

    // Shortest round-trip text first, so `12.5` loads as exactly 12.5.
    fn decimal_from_f64(value: f64) -> Option<Decimal> {
        Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(value))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn quantity_from_value(value: &Value) -> u32 {
        match value {
            Value::Number(n) => {
                if let Some(q) = n.as_u64() {
                    u32::try_from(q).unwrap_or(u32::MAX)
                } else {
                    n.as_f64()
                        .filter(|q| q.is_finite() && *q > 0.0)
                        .map_or(0, |q| q.trunc().min(f64::from(u32::MAX)) as u32)
                }
            }
            Value::String(s) => parse_quantity(s),
            _ => 0,
        }
    }
}
