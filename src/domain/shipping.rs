use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::money::cents_to_decimal;

/// Delivery method a buyer can pick at checkout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ShippingOption {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    /// Human-readable delivery estimate, e.g. "3-5 days".
    pub eta_label: String,
    pub price_cents: i64,
}

impl ShippingOption {
    pub fn price(&self) -> Decimal {
        cents_to_decimal(self.price_cents)
    }
}

#[derive(Debug, Clone)]
pub struct NewShippingOption {
    pub hub_id: i32,
    pub name: String,
    pub eta_label: String,
    pub price_cents: i64,
}

impl NewShippingOption {
    pub fn new(
        hub_id: i32,
        name: impl Into<String>,
        eta_label: impl Into<String>,
        price_cents: i64,
    ) -> Self {
        Self {
            hub_id,
            name: name.into(),
            eta_label: eta_label.into(),
            price_cents,
        }
    }
}
