//! Totals over priced rows.
//!
//! Every call recomputes from the rows it is given; nothing is cached.
//! Arithmetic saturates at the `Decimal` bounds instead of overflowing.

use super::model::LineItem;
use rust_decimal::Decimal;

/// `unit_price × multiplier` for one row.
#[must_use]
pub fn subtotal<T: LineItem + ?Sized>(entry: &T) -> Decimal {
    entry
        .unit_price()
        .saturating_mul(Decimal::from(entry.multiplier()))
}

/// Sum of [`subtotal`] over all rows. Independent of row order.
#[must_use]
pub fn total<T: LineItem>(entries: &[T]) -> Decimal {
    entries
        .iter()
        .map(subtotal)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::ProductId;
    use crate::core::model::{Item, Product};

    fn product(name: &str, quantity: u32, cents: i64) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            quantity,
            price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_total_multiplies_quantity_by_price() {
        let products = vec![product("Rice", 2, 500), product("Milk", 3, 425)];
        assert_eq!(total(&products), Decimal::new(2275, 2));
        assert_eq!(subtotal(&products[1]), Decimal::new(1275, 2));
    }

    #[test]
    fn test_total_of_empty_is_zero() {
        let products: Vec<Product> = Vec::new();
        assert_eq!(total(&products), Decimal::ZERO);
    }

    #[test]
    fn test_total_is_order_independent() {
        let products = vec![
            product("Rice", 2, 333),
            product("Milk", 7, 10),
            product("Beans", 1, 1999),
            product("Eggs", 0, 1200),
        ];
        let expected = total(&products);

        let mut reversed = products.clone();
        reversed.reverse();
        assert_eq!(total(&reversed), expected);

        let mut rotated = products;
        rotated.rotate_left(2);
        assert_eq!(total(&rotated), expected);
    }

    #[test]
    fn test_huge_prices_saturate_instead_of_overflowing() {
        let mut gold = product("Gold", 2, 0);
        gold.price = Decimal::MAX;
        assert_eq!(subtotal(&gold), Decimal::MAX);

        let products = vec![gold, product("Rice", 1, 500)];
        assert_eq!(total(&products), Decimal::MAX);
    }

    #[test]
    fn test_flat_item_without_quantity_counts_once() {
        let items = vec![
            Item {
                id: ProductId::generate(),
                name: "Milk".to_string(),
                quantity: None,
                price: Decimal::new(4, 0),
            },
            Item {
                id: ProductId::generate(),
                name: "Rice".to_string(),
                quantity: Some(2),
                price: Decimal::new(5, 0),
            },
        ];
        assert_eq!(total(&items), Decimal::new(14, 0));
    }
}
