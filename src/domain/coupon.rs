use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::money::cents_to_decimal;

/// Exclusive lower bound for a valid percentage discount.
pub const MIN_PERCENT_EXCLUSIVE: i32 = 1;
/// Exclusive upper bound for a valid percentage discount.
pub const MAX_PERCENT_EXCLUSIVE: i32 = 100;

/// A named discount configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CouponRule {
    /// Subtracts a fixed amount from the subtotal.
    FixedAmount { name: String, amount_cents: i64 },
    /// Subtracts a percentage of the subtotal.
    Percentage { name: String, percent: i32 },
}

impl CouponRule {
    pub fn name(&self) -> &str {
        match self {
            CouponRule::FixedAmount { name, .. } | CouponRule::Percentage { name, .. } => name,
        }
    }

    /// Storage tag used for this variant.
    pub fn kind(&self) -> CouponKind {
        match self {
            CouponRule::FixedAmount { .. } => CouponKind::FixedAmount,
            CouponRule::Percentage { .. } => CouponKind::Percentage,
        }
    }

    /// Amount this rule takes off `subtotal`, or `None` when the rule does not apply.
    ///
    /// A fixed amount never reduces the subtotal to zero or below, and a percentage
    /// outside `(1, 100)` is treated as misconfigured.
    pub fn discount_for(&self, subtotal: Decimal) -> Option<Decimal> {
        match self {
            CouponRule::FixedAmount { amount_cents, .. } => {
                let amount = cents_to_decimal(*amount_cents);
                (amount > Decimal::ZERO && amount < subtotal).then_some(amount)
            }
            CouponRule::Percentage { percent, .. } => {
                let valid = *percent > MIN_PERCENT_EXCLUSIVE && *percent < MAX_PERCENT_EXCLUSIVE;
                valid.then(|| subtotal * Decimal::from(*percent) / Decimal::ONE_HUNDRED)
            }
        }
    }
}

/// Discriminant stored alongside each coupon row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    FixedAmount,
    Percentage,
}

impl From<CouponKind> for &'static str {
    fn from(value: CouponKind) -> Self {
        match value {
            CouponKind::FixedAmount => "fixed_amount",
            CouponKind::Percentage => "percentage",
        }
    }
}

impl TryFrom<&str> for CouponKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "fixed_amount" => Ok(CouponKind::FixedAmount),
            "percentage" => Ok(CouponKind::Percentage),
            other => Err(format!("unknown coupon kind: {other}")),
        }
    }
}

/// Payload required to store a coupon for a hub.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub hub_id: i32,
    pub rule: CouponRule,
}

impl NewCoupon {
    pub fn fixed_amount(hub_id: i32, name: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            hub_id,
            rule: CouponRule::FixedAmount {
                name: name.into(),
                amount_cents,
            },
        }
    }

    pub fn percentage(hub_id: i32, name: impl Into<String>, percent: i32) -> Self {
        Self {
            hub_id,
            rule: CouponRule::Percentage {
                name: name.into(),
                percent,
            },
        }
    }
}
