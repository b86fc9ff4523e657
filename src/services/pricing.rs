//! Coupon resolution and price quotes.

use std::collections::HashMap;

use pushkind_common::domain::auth::AuthenticatedUser;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::CheckoutSettings;
use crate::domain::cart::{CartLine, CartSnapshot};
use crate::domain::checkout::{PricedQuote, QuoteRequest};
use crate::domain::coupon::CouponRule;
use crate::domain::money::round_money;
use crate::domain::product::Product;
use crate::domain::shipping::ShippingOption;
use crate::repository::{CartReader, CouponReader, ProductReader, ShippingReader};
use crate::services::errors::{CheckoutError, CheckoutResult};
use crate::services::inventory::check_availability;

/// Quote as returned to the buyer.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct QuoteView {
    pub original_price: Decimal,
    pub discount_applied: Decimal,
    pub coupon: Option<String>,
    /// Present only when a coupon was applied.
    pub total_after_coupon: Option<Decimal>,
    pub estimated_tax: Decimal,
    pub shipping_cost: Decimal,
    pub final_total: Decimal,
    pub compare_total: Decimal,
}

impl From<PricedQuote> for QuoteView {
    fn from(quote: PricedQuote) -> Self {
        Self {
            total_after_coupon: quote.total_after_coupon(),
            original_price: quote.subtotal,
            discount_applied: quote.discount_applied,
            coupon: quote.coupon,
            estimated_tax: quote.tax_amount,
            shipping_cost: quote.shipping_cost,
            final_total: quote.total,
            compare_total: quote.compare_total,
        }
    }
}

/// Look up the coupon named by `code`. A blank or unknown code is not an error.
pub fn resolve_coupon<R>(repo: &R, hub_id: i32, code: Option<&str>) -> CheckoutResult<Option<CouponRule>>
where
    R: CouponReader + ?Sized,
{
    let Some(code) = code.map(str::trim).filter(|code| !code.is_empty()) else {
        return Ok(None);
    };

    let rule = repo.find_coupon_by_code(hub_id, code)?;
    if rule.is_none() {
        log::debug!("Coupon {code:?} not found in hub {hub_id}");
    }
    Ok(rule)
}

/// Price a cart snapshot.
///
/// Stock is checked before any arithmetic. Every monetary field is rounded
/// half-up to two places; the total is rounded once from full-precision
/// intermediates.
pub fn calculate_quote(
    snapshot: &CartSnapshot,
    coupon: Option<&CouponRule>,
    shipping: &ShippingOption,
    tax_rate: Decimal,
) -> CheckoutResult<PricedQuote> {
    if snapshot.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    check_availability(snapshot)?;

    Ok(price_lines(snapshot, coupon, shipping, tax_rate))
}

/// Pricing arithmetic for a snapshot whose stock has already been checked.
pub(crate) fn price_lines(
    snapshot: &CartSnapshot,
    coupon: Option<&CouponRule>,
    shipping: &ShippingOption,
    tax_rate: Decimal,
) -> PricedQuote {
    let subtotal: Decimal = snapshot.lines().iter().map(CartLine::line_total).sum();
    let compare_total: Decimal = snapshot.lines().iter().map(CartLine::compare_total).sum();

    let applied = coupon.and_then(|rule| rule.discount_for(subtotal).map(|amount| (rule, amount)));
    let (coupon_name, discount) = match applied {
        Some((rule, amount)) => (Some(rule.name().to_string()), amount),
        None => (None, Decimal::ZERO),
    };

    let discounted = subtotal - discount;
    let taxed = discounted * (Decimal::ONE + tax_rate);
    let shipping_cost = shipping.price();

    PricedQuote {
        subtotal: round_money(subtotal),
        discount_applied: round_money(discount),
        coupon: coupon_name,
        tax_amount: round_money(taxed - discounted),
        shipping_cost: round_money(shipping_cost),
        total: round_money(taxed + shipping_cost),
        compare_total: round_money(compare_total),
    }
}

/// Read the caller's cart joined with current product data.
pub(crate) fn load_cart_snapshot<R>(repo: &R, hub_id: i32, user_sub: &str) -> CheckoutResult<CartSnapshot>
where
    R: CartReader + ProductReader + ?Sized,
{
    let items = repo.list_cart_items(hub_id, user_sub)?;
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let cart_item_ids: Vec<i32> = items.iter().map(|item| item.id).collect();
    let ids: Vec<i32> = items.iter().map(|item| item.product_id).collect();
    let products: HashMap<i32, Product> = repo
        .list_products_by_ids(hub_id, &ids)?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = match products.get(&item.product_id) {
            Some(product) => product.clone(),
            None => return Err(CheckoutError::UnknownProduct(item.product_id)),
        };
        lines.push(CartLine::new(product, item.count));
    }

    Ok(CartSnapshot::new(lines).with_cart_item_ids(cart_item_ids))
}

pub(crate) fn load_shipping<R>(repo: &R, hub_id: i32, shipping_id: i32) -> CheckoutResult<ShippingOption>
where
    R: ShippingReader + ?Sized,
{
    repo.get_shipping_option(shipping_id, hub_id)?
        .ok_or(CheckoutError::InvalidShipping(shipping_id))
}

/// Quote the authenticated user's current cart. Read-only.
pub fn quote_checkout<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request: &QuoteRequest,
    settings: &CheckoutSettings,
) -> CheckoutResult<PricedQuote>
where
    R: CartReader + ProductReader + CouponReader + ShippingReader + ?Sized,
{
    let snapshot = load_cart_snapshot(repo, user.hub_id, &user.sub)?;
    check_availability(&snapshot)?;
    let coupon = resolve_coupon(repo, user.hub_id, request.coupon())?;
    let shipping = load_shipping(repo, user.hub_id, request.shipping_id)?;

    Ok(price_lines(&snapshot, coupon.as_ref(), &shipping, settings.tax_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pushkind_common::repository::errors::RepositoryResult;
    use rust_decimal_macros::dec;

    use crate::domain::cart::CartItem;
    use crate::repository::mock::{
        MockCartReader, MockCouponReader, MockProductReader, MockShippingReader,
    };

    struct FakeRepo {
        cart_reader: MockCartReader,
        product_reader: MockProductReader,
        coupon_reader: MockCouponReader,
        shipping_reader: MockShippingReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                cart_reader: MockCartReader::new(),
                product_reader: MockProductReader::new(),
                coupon_reader: MockCouponReader::new(),
                shipping_reader: MockShippingReader::new(),
            }
        }
    }

    impl CartReader for FakeRepo {
        fn list_cart_items(&self, hub_id: i32, user_sub: &str) -> RepositoryResult<Vec<CartItem>> {
            self.cart_reader.list_cart_items(hub_id, user_sub)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(id, hub_id)
        }

        fn list_products_by_ids(&self, hub_id: i32, ids: &[i32]) -> RepositoryResult<Vec<Product>> {
            self.product_reader.list_products_by_ids(hub_id, ids)
        }
    }

    impl CouponReader for FakeRepo {
        fn find_coupon_by_code(
            &self,
            hub_id: i32,
            code: &str,
        ) -> RepositoryResult<Option<CouponRule>> {
            self.coupon_reader.find_coupon_by_code(hub_id, code)
        }
    }

    impl ShippingReader for FakeRepo {
        fn get_shipping_option(
            &self,
            id: i32,
            hub_id: i32,
        ) -> RepositoryResult<Option<ShippingOption>> {
            self.shipping_reader.get_shipping_option(id, hub_id)
        }

        fn list_shipping_options(&self, hub_id: i32) -> RepositoryResult<Vec<ShippingOption>> {
            self.shipping_reader.list_shipping_options(hub_id)
        }
    }

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

    fn shirt(quantity: i32) -> Product {
        Product {
            id: 1,
            hub_id: 7,
            name: "Shirt".to_string(),
            description: None,
            price_cents: 2000,
            compare_price_cents: 2500,
            quantity,
            sold: 0,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn cart_item(product_id: i32, count: i32) -> CartItem {
        CartItem {
            id: product_id,
            hub_id: 7,
            user_sub: "buyer".to_string(),
            product_id,
            count,
            created_at: NaiveDateTime::default(),
        }
    }

    fn standard_shipping() -> ShippingOption {
        ShippingOption {
            id: 3,
            hub_id: 7,
            name: "Standard".to_string(),
            eta_label: "3-5 days".to_string(),
            price_cents: 500,
        }
    }

    fn repo_with_two_shirts(stock: i32) -> FakeRepo {
        let mut repo = FakeRepo::new();
        repo.cart_reader
            .expect_list_cart_items()
            .returning(|_, _| Ok(vec![cart_item(1, 2)]));
        repo.product_reader
            .expect_list_products_by_ids()
            .withf(|hub_id, ids| *hub_id == 7 && ids == [1])
            .returning(move |_, _| Ok(vec![shirt(stock)]));
        repo
    }

    #[test]
    fn quote_without_coupon() {
        let mut repo = repo_with_two_shirts(10);
        repo.shipping_reader
            .expect_get_shipping_option()
            .withf(|id, hub_id| *id == 3 && *hub_id == 7)
            .returning(|_, _| Ok(Some(standard_shipping())));

        let quote = quote_checkout(
            &repo,
            &user(),
            &QuoteRequest::new(3),
            &CheckoutSettings::default(),
        )
        .unwrap();

        assert_eq!(quote.subtotal, dec!(40.00));
        assert_eq!(quote.discount_applied, dec!(0.00));
        assert_eq!(quote.tax_amount, dec!(7.60));
        assert_eq!(quote.shipping_cost, dec!(5.00));
        assert_eq!(quote.total, dec!(52.60));
        assert_eq!(quote.compare_total, dec!(50.00));
        assert_eq!(quote.coupon, None);
    }

    #[test]
    fn quote_with_fixed_coupon() {
        let mut repo = repo_with_two_shirts(10);
        repo.coupon_reader
            .expect_find_coupon_by_code()
            .withf(|hub_id, code| *hub_id == 7 && code == "TEN")
            .returning(|_, _| {
                Ok(Some(CouponRule::FixedAmount {
                    name: "TEN".to_string(),
                    amount_cents: 1000,
                }))
            });
        repo.shipping_reader
            .expect_get_shipping_option()
            .returning(|_, _| Ok(Some(standard_shipping())));

        let quote = quote_checkout(
            &repo,
            &user(),
            &QuoteRequest::new(3).with_coupon(" TEN "),
            &CheckoutSettings::default(),
        )
        .unwrap();

        assert_eq!(quote.discount_applied, dec!(10.00));
        assert_eq!(quote.total, dec!(40.70));
        assert_eq!(quote.coupon.as_deref(), Some("TEN"));

        let view = QuoteView::from(quote);
        assert_eq!(view.total_after_coupon, Some(dec!(30.00)));
        assert_eq!(view.original_price, dec!(40.00));
        assert_eq!(view.final_total, dec!(40.70));
    }

    #[test]
    fn unknown_coupon_is_no_discount() {
        let mut repo = repo_with_two_shirts(10);
        repo.coupon_reader
            .expect_find_coupon_by_code()
            .returning(|_, _| Ok(None));
        repo.shipping_reader
            .expect_get_shipping_option()
            .returning(|_, _| Ok(Some(standard_shipping())));

        let quote = quote_checkout(
            &repo,
            &user(),
            &QuoteRequest::new(3).with_coupon("nope"),
            &CheckoutSettings::default(),
        )
        .unwrap();

        assert_eq!(quote.total, dec!(52.60));
        assert!(QuoteView::from(quote).total_after_coupon.is_none());
    }

    #[test]
    fn empty_cart_fails_before_other_lookups() {
        let mut repo = FakeRepo::new();
        repo.cart_reader
            .expect_list_cart_items()
            .returning(|_, _| Ok(Vec::new()));

        let result = quote_checkout(
            &repo,
            &user(),
            &QuoteRequest::new(3),
            &CheckoutSettings::default(),
        );

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn missing_product_is_unknown() {
        let mut repo = FakeRepo::new();
        repo.cart_reader
            .expect_list_cart_items()
            .returning(|_, _| Ok(vec![cart_item(1, 1), cart_item(9, 1)]));
        repo.product_reader
            .expect_list_products_by_ids()
            .returning(|_, _| Ok(vec![shirt(5)]));

        let result = quote_checkout(
            &repo,
            &user(),
            &QuoteRequest::new(3),
            &CheckoutSettings::default(),
        );

        assert!(matches!(result, Err(CheckoutError::UnknownProduct(9))));
    }

    #[test]
    fn out_of_stock_aborts_quote() {
        let mut repo = repo_with_two_shirts(1);
        repo.coupon_reader.expect_find_coupon_by_code().times(0);
        repo.shipping_reader.expect_get_shipping_option().times(0);

        let result = quote_checkout(
            &repo,
            &user(),
            &QuoteRequest::new(3),
            &CheckoutSettings::default(),
        );

        assert!(
            matches!(result, Err(CheckoutError::OutOfStock { product_name }) if product_name == "Shirt")
        );
    }

    #[test]
    fn missing_shipping_is_invalid() {
        let mut repo = repo_with_two_shirts(10);
        repo.shipping_reader
            .expect_get_shipping_option()
            .returning(|_, _| Ok(None));

        let result = quote_checkout(
            &repo,
            &user(),
            &QuoteRequest::new(42),
            &CheckoutSettings::default(),
        );

        assert!(matches!(result, Err(CheckoutError::InvalidShipping(42))));
    }

    #[test]
    fn percentage_coupon_rounds_every_field() {
        let snapshot = CartSnapshot::new(vec![CartLine::new(
            Product {
                price_cents: 333,
                compare_price_cents: 333,
                ..shirt(10)
            },
            1,
        )]);
        let coupon = CouponRule::Percentage {
            name: "SALE".to_string(),
            percent: 15,
        };

        let quote =
            calculate_quote(&snapshot, Some(&coupon), &standard_shipping(), dec!(0.19)).unwrap();

        // 3.33 * 15% = 0.4995; discounted 2.8305; taxed 3.368295
        assert_eq!(quote.discount_applied, dec!(0.50));
        assert_eq!(quote.tax_amount, dec!(0.54));
        assert_eq!(quote.total, dec!(8.37));
    }
}
