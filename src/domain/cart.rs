use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// A product sitting in a buyer's cart.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CartItem {
    pub id: i32,
    pub hub_id: i32,
    /// Subject identifier of the cart owner.
    pub user_sub: String,
    pub product_id: i32,
    /// Requested number of units.
    pub count: i32,
    pub created_at: NaiveDateTime,
}

/// Payload required to put a product into a cart.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub hub_id: i32,
    pub user_sub: String,
    pub product_id: i32,
    pub count: i32,
}

impl NewCartItem {
    pub fn new(hub_id: i32, user_sub: impl Into<String>, product_id: i32, count: i32) -> Self {
        Self {
            hub_id,
            user_sub: user_sub.into(),
            product_id,
            count,
        }
    }
}

/// One cart position joined with the live product it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub count: i32,
}

impl CartLine {
    pub fn new(product: Product, count: i32) -> Self {
        Self { product, count }
    }

    /// Selling price times requested count.
    pub fn line_total(&self) -> Decimal {
        self.product.unit_price() * Decimal::from(self.count)
    }

    /// "Compare at" price times requested count.
    pub fn compare_total(&self) -> Decimal {
        self.product.compare_price() * Decimal::from(self.count)
    }
}

/// Point-in-time view of a cart used by quoting and checkout.
///
/// Lines are kept in cart order and never repeat a product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
    /// Ids of the cart rows the lines were read from. Rows are never reused,
    /// so a cart refilled after checkout gets new ids.
    cart_item_ids: Vec<i32>,
}

impl CartSnapshot {
    /// Build a snapshot, merging lines that point at the same product.
    pub fn new(lines: Vec<CartLine>) -> Self {
        let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
        for line in lines {
            match merged
                .iter_mut()
                .find(|existing| existing.product.id == line.product.id)
            {
                Some(existing) => existing.count += line.count,
                None => merged.push(line),
            }
        }
        Self {
            lines: merged,
            cart_item_ids: Vec::new(),
        }
    }

    /// Record the cart rows this snapshot was built from.
    pub fn with_cart_item_ids(mut self, mut ids: Vec<i32>) -> Self {
        ids.sort_unstable();
        self.cart_item_ids = ids;
        self
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Source cart row ids in ascending order.
    pub fn cart_item_ids(&self) -> &[i32] {
        &self.cart_item_ids
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart contents returned to the buyer.
#[derive(Debug, Serialize, Clone)]
pub struct CartView {
    pub items: Vec<CartItem>,
    /// Number of distinct products, computed from the rows.
    pub total_items: usize,
}

impl From<Vec<CartItem>> for CartView {
    fn from(items: Vec<CartItem>) -> Self {
        let total_items = items.len();
        Self { items, total_items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn product(id: i32, price_cents: i64) -> Product {
        Product {
            id,
            hub_id: 1,
            name: format!("Product {id}"),
            description: None,
            price_cents,
            compare_price_cents: price_cents + 500,
            quantity: 10,
            sold: 0,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn snapshot_merges_duplicate_products() {
        let snapshot = CartSnapshot::new(vec![
            CartLine::new(product(1, 100), 2),
            CartLine::new(product(2, 100), 1),
            CartLine::new(product(1, 100), 3),
        ]);

        assert_eq!(snapshot.lines().len(), 2);
        assert_eq!(snapshot.lines()[0].count, 5);
        assert_eq!(snapshot.lines()[1].product.id, 2);
    }

    #[test]
    fn cart_item_ids_are_kept_sorted() {
        let snapshot = CartSnapshot::new(vec![CartLine::new(product(1, 100), 1)])
            .with_cart_item_ids(vec![9, 4]);

        assert_eq!(snapshot.cart_item_ids(), &[4, 9]);
    }

    #[test]
    fn line_totals_use_unit_and_compare_prices() {
        let line = CartLine::new(product(1, 2000), 2);

        assert_eq!(line.line_total().to_string(), "40.00");
        assert_eq!(line.compare_total().to_string(), "50.00");
    }
}
