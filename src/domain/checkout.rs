use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delivery address copied onto the order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state_province_region: String,
    pub postal_zip_code: String,
    pub country_region: String,
    pub telephone_number: String,
}

/// Inputs of a price quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub shipping_id: i32,
    /// Coupon code typed by the buyer; empty means none.
    pub coupon_code: Option<String>,
}

impl QuoteRequest {
    pub fn new(shipping_id: i32) -> Self {
        Self {
            shipping_id,
            coupon_code: None,
        }
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }

    /// Trimmed coupon code, `None` when blank.
    pub fn coupon(&self) -> Option<&str> {
        self.coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Validated checkout submission for the caller's current cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub quote: QuoteRequest,
    pub address: ShippingAddress,
    /// Client supplied idempotency key, if any.
    pub idempotency_key: Option<String>,
}

/// Priced breakdown of a cart. Every amount is rounded to two places.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PricedQuote {
    pub subtotal: Decimal,
    pub discount_applied: Decimal,
    /// Name of the coupon that produced `discount_applied`.
    pub coupon: Option<String>,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    /// Sum of undiscounted "compare at" prices.
    pub compare_total: Decimal,
}

impl PricedQuote {
    /// Subtotal after the coupon, present only when a coupon applied.
    pub fn total_after_coupon(&self) -> Option<Decimal> {
        self.coupon
            .as_ref()
            .map(|_| self.subtotal - self.discount_applied)
    }
}

/// Stages of the checkout pipeline, in execution order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Validated,
    Priced,
    StockReserved,
    OrderPersisted,
    ItemsPersisted,
    Notified,
    CartCleared,
    Done,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckoutStep::Validated => "validated",
            CheckoutStep::Priced => "priced",
            CheckoutStep::StockReserved => "stock_reserved",
            CheckoutStep::OrderPersisted => "order_persisted",
            CheckoutStep::ItemsPersisted => "items_persisted",
            CheckoutStep::Notified => "notified",
            CheckoutStep::CartCleared => "cart_cleared",
            CheckoutStep::Done => "done",
        };
        f.write_str(label)
    }
}

/// A post-commit step that did not succeed after all retries.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FollowUpFailure {
    pub step: CheckoutStep,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_coupon_codes_are_ignored() {
        assert_eq!(QuoteRequest::new(1).with_coupon("   ").coupon(), None);
        assert_eq!(QuoteRequest::new(1).coupon(), None);
        assert_eq!(
            QuoteRequest::new(1).with_coupon(" save10 ").coupon(),
            Some("save10")
        );
    }

    #[test]
    fn total_after_coupon_only_when_coupon_applied() {
        let mut quote = PricedQuote {
            subtotal: dec!(40.00),
            discount_applied: dec!(10.00),
            coupon: Some("TEN".to_string()),
            tax_amount: dec!(5.70),
            shipping_cost: dec!(5.00),
            total: dec!(40.70),
            compare_total: dec!(50.00),
        };
        assert_eq!(quote.total_after_coupon(), Some(dec!(30.00)));

        quote.coupon = None;
        assert_eq!(quote.total_after_coupon(), None);
    }

    #[test]
    fn steps_are_ordered_and_labelled() {
        assert!(CheckoutStep::StockReserved < CheckoutStep::OrderPersisted);
        assert_eq!(CheckoutStep::CartCleared.to_string(), "cart_cleared");
    }
}
