use pushkind_common::domain::auth::AuthenticatedUser;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::shipping::ShippingOption;
use crate::repository::ShippingReader;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ShippingOptionView {
    pub id: i32,
    pub name: String,
    pub eta_label: String,
    pub price: Decimal,
}

impl From<ShippingOption> for ShippingOptionView {
    fn from(option: ShippingOption) -> Self {
        Self {
            price: option.price(),
            id: option.id,
            name: option.name,
            eta_label: option.eta_label,
        }
    }
}

/// Shipping options of the caller's store, cheapest first.
pub fn list_shipping_options<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<ShippingOptionView>>
where
    R: ShippingReader + ?Sized,
{
    let options = repo
        .list_shipping_options(user.hub_id)
        .map_err(ServiceError::from)?;

    if options.is_empty() {
        return Err(ServiceError::NotFound);
    }

    Ok(options.into_iter().map(ShippingOptionView::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockShippingReader;

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

    #[test]
    fn lists_options_with_decimal_prices() {
        let mut repo = MockShippingReader::new();
        repo.expect_list_shipping_options()
            .withf(|hub_id| *hub_id == 7)
            .returning(|_| {
                Ok(vec![ShippingOption {
                    id: 3,
                    hub_id: 7,
                    name: "Standard".to_string(),
                    eta_label: "3-5 days".to_string(),
                    price_cents: 500,
                }])
            });

        let options = list_shipping_options(&repo, &user()).unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].price.to_string(), "5.00");
    }

    #[test]
    fn no_options_is_not_found() {
        let mut repo = MockShippingReader::new();
        repo.expect_list_shipping_options().returning(|_| Ok(Vec::new()));

        let result = list_shipping_options(&repo, &user());

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
