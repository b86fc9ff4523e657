use pushkind_common::domain::auth::AuthenticatedUser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::coupon::CouponRule;
use crate::domain::money::cents_to_decimal;
use crate::repository::CouponReader;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Deserialize)]
pub struct CouponCheckQuery {
    pub coupon_name: Option<String>,
}

/// Coupon details shown to a buyer before checkout.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CouponView {
    FixedAmount { name: String, amount: Decimal },
    Percentage { name: String, percent: i32 },
}

impl From<CouponRule> for CouponView {
    fn from(rule: CouponRule) -> Self {
        match rule {
            CouponRule::FixedAmount { name, amount_cents } => CouponView::FixedAmount {
                name,
                amount: cents_to_decimal(amount_cents),
            },
            CouponRule::Percentage { name, percent } => CouponView::Percentage { name, percent },
        }
    }
}

/// Look up a coupon of the caller's store by name, ignoring case.
pub fn check_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CouponCheckQuery,
) -> ServiceResult<CouponView>
where
    R: CouponReader + ?Sized,
{
    let Some(name) = query
        .coupon_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return Err(ServiceError::Form("coupon_name is required".to_string()));
    };

    repo.find_coupon_by_code(user.hub_id, name)
        .map_err(ServiceError::from)?
        .map(CouponView::from)
        .ok_or(ServiceError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockCouponReader;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "buyer".to_string(),
            email: "buyer@example.com".to_string(),
            hub_id: 7,
            name: "Buyer".to_string(),
            roles: Vec::new(),
            exp: 0,
        }
    }

    fn query(name: Option<&str>) -> CouponCheckQuery {
        CouponCheckQuery {
            coupon_name: name.map(str::to_string),
        }
    }

    #[test]
    fn known_coupon_returns_details() {
        let mut repo = MockCouponReader::new();
        repo.expect_find_coupon_by_code()
            .withf(|hub_id, code| *hub_id == 7 && code == "save10")
            .returning(|_, _| {
                Ok(Some(CouponRule::FixedAmount {
                    name: "SAVE10".to_string(),
                    amount_cents: 1000,
                }))
            });

        let view = check_coupon(&repo, &user(), query(Some(" save10 "))).unwrap();

        assert_eq!(
            view,
            CouponView::FixedAmount {
                name: "SAVE10".to_string(),
                amount: Decimal::new(1000, 2),
            }
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "fixed_amount");
        assert_eq!(json["amount"], "10.00");
    }

    #[test]
    fn percentage_coupon_keeps_percent() {
        let mut repo = MockCouponReader::new();
        repo.expect_find_coupon_by_code().returning(|_, _| {
            Ok(Some(CouponRule::Percentage {
                name: "HALF".to_string(),
                percent: 50,
            }))
        });

        let view = check_coupon(&repo, &user(), query(Some("half"))).unwrap();

        assert!(matches!(view, CouponView::Percentage { percent: 50, .. }));
    }

    #[test]
    fn unknown_coupon_is_not_found() {
        let mut repo = MockCouponReader::new();
        repo.expect_find_coupon_by_code().returning(|_, _| Ok(None));

        let result = check_coupon(&repo, &user(), query(Some("nope")));

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn missing_name_is_rejected_without_lookup() {
        let mut repo = MockCouponReader::new();
        repo.expect_find_coupon_by_code().times(0);

        assert!(matches!(
            check_coupon(&repo, &user(), query(None)),
            Err(ServiceError::Form(_))
        ));
        assert!(matches!(
            check_coupon(&repo, &user(), query(Some("  "))),
            Err(ServiceError::Form(_))
        ));
    }
}
