use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::money::cents_to_decimal;

/// Domain representation of a product sold by a hub.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to buyers.
    pub description: Option<String>,
    /// Selling price in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Undiscounted "compare at" price in the smallest currency unit.
    pub compare_price_cents: i64,
    /// Units currently available for sale.
    pub quantity: i32,
    /// Cumulative units sold.
    pub sold: i32,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Selling price as a decimal amount in the base currency.
    pub fn unit_price(&self) -> Decimal {
        cents_to_decimal(self.price_cents)
    }

    /// "Compare at" price as a decimal amount in the base currency.
    pub fn compare_price(&self) -> Decimal {
        cents_to_decimal(self.compare_price_cents)
    }

    /// Whether `count` units can be taken from the available stock.
    pub fn has_stock_for(&self, count: i32) -> bool {
        count <= self.quantity
    }
}

/// Payload required to insert a new product for a hub.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to buyers.
    pub description: Option<String>,
    /// Selling price in the smallest currency unit.
    pub price_cents: i64,
    /// Undiscounted "compare at" price in the smallest currency unit.
    pub compare_price_cents: i64,
    /// Initial stock level.
    pub quantity: i32,
}

impl NewProduct {
    /// Build a new product payload; the compare price defaults to the selling price.
    pub fn new(hub_id: i32, name: impl Into<String>, price_cents: i64, quantity: i32) -> Self {
        Self {
            hub_id,
            name: name.into(),
            description: None,
            price_cents,
            compare_price_cents: price_cents,
            quantity,
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the "compare at" price.
    pub fn with_compare_price(mut self, compare_price_cents: i64) -> Self {
        self.compare_price_cents = compare_price_cents;
        self
    }
}

/// Requested decrement of a single product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockReservation {
    pub product_id: i32,
    pub count: i32,
}

impl StockReservation {
    pub fn new(product_id: i32, count: i32) -> Self {
        Self { product_id, count }
    }
}
