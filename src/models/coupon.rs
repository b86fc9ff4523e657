use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::coupon::{CouponKind, CouponRule, NewCoupon as DomainNewCoupon};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct Coupon {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub kind: String,
    pub amount_cents: Option<i64>,
    pub percent: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct NewCoupon<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub kind: &'a str,
    pub amount_cents: Option<i64>,
    pub percent: Option<i32>,
}

impl Coupon {
    /// Convert the row into a rule. Rows whose discount column does not match
    /// their kind are rejected.
    pub fn into_rule(self) -> Option<CouponRule> {
        match CouponKind::try_from(self.kind.as_str()).ok()? {
            CouponKind::FixedAmount => Some(CouponRule::FixedAmount {
                name: self.name,
                amount_cents: self.amount_cents?,
            }),
            CouponKind::Percentage => Some(CouponRule::Percentage {
                name: self.name,
                percent: self.percent?,
            }),
        }
    }
}

impl<'a> From<&'a DomainNewCoupon> for NewCoupon<'a> {
    fn from(value: &'a DomainNewCoupon) -> Self {
        let (amount_cents, percent) = match &value.rule {
            CouponRule::FixedAmount { amount_cents, .. } => (Some(*amount_cents), None),
            CouponRule::Percentage { percent, .. } => (None, Some(*percent)),
        };
        Self {
            hub_id: value.hub_id,
            name: value.rule.name(),
            kind: value.rule.kind().into(),
            amount_cents,
            percent,
        }
    }
}
