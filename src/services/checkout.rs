//! Checkout: turns the buyer's cart into a committed order.
//!
//! Validation, pricing and the stock check run first without writing anything.
//! Stock reservation and the order with its items are then committed in a single
//! transaction. Notification and cart clearing follow the commit and are
//! reported, not rolled back, when they fail.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;
use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::CheckoutSettings;
use crate::domain::cart::CartSnapshot;
use crate::domain::checkout::{CheckoutRequest, CheckoutStep, FollowUpFailure, QuoteRequest};
use crate::domain::money::decimal_to_cents;
use crate::domain::order::{CommittedOrder, NewOrder, Order, OrderItem, OrderStatus};
use crate::domain::shipping::ShippingOption;
use crate::notifier::Notifier;
use crate::repository::{
    CartReader, CartWriter, CouponReader, OrderReader, OrderWriter, ProductReader, ShippingReader,
};
use crate::services::errors::{CheckoutError, CheckoutResult};
use crate::services::follow_up::run_follow_ups;
use crate::services::inventory::check_availability;
use crate::services::pricing::{load_cart_snapshot, load_shipping, price_lines, resolve_coupon};

/// Longest idempotency key accepted from a client.
pub const IDEMPOTENCY_KEY_MAX_LEN: usize = 255;

/// Result of a checkout whose order is durably stored.
#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    pub order: Order,
    /// The order already existed for this idempotency key.
    pub replayed: bool,
    /// Post-commit steps that did not complete.
    pub follow_up_failures: Vec<FollowUpFailure>,
}

impl CheckoutReceipt {
    /// The order is stored but reconciliation is needed.
    pub fn is_partial(&self) -> bool {
        !self.follow_up_failures.is_empty()
    }
}

/// Trim a client supplied key; blank keys count as absent.
pub fn normalize_idempotency_key(key: Option<&str>) -> CheckoutResult<Option<String>> {
    let Some(key) = key.map(str::trim).filter(|key| !key.is_empty()) else {
        return Ok(None);
    };

    if key.len() > IDEMPOTENCY_KEY_MAX_LEN || key.chars().any(char::is_control) {
        return Err(CheckoutError::Validation(
            "idempotency key must be at most 255 printable characters".to_string(),
        ));
    }

    Ok(Some(key.to_string()))
}

/// Derive a key for requests that came without one.
///
/// The same cart rows submitted by the same user with the same shipping and
/// coupon inside one `window` map to the same key. A cart refilled after a
/// checkout has new rows and therefore a new key.
pub fn derive_idempotency_key(
    hub_id: i32,
    user_sub: &str,
    request: &QuoteRequest,
    snapshot: &CartSnapshot,
    window: Duration,
    now: DateTime<Utc>,
) -> String {
    let mut lines: Vec<(i32, i32)> = snapshot
        .lines()
        .iter()
        .map(|line| (line.product.id, line.count))
        .collect();
    lines.sort_unstable();

    let window_secs = window.as_secs().max(1) as i64;
    let bucket = now.timestamp().div_euclid(window_secs);

    let mut hasher = Sha256::new();
    hasher.update(hub_id.to_be_bytes());
    hasher.update(user_sub.as_bytes());
    hasher.update([0u8]);
    hasher.update(request.shipping_id.to_be_bytes());
    hasher.update(request.coupon().unwrap_or_default().to_lowercase().as_bytes());
    hasher.update([0u8]);
    for (product_id, count) in lines {
        hasher.update(product_id.to_be_bytes());
        hasher.update(count.to_be_bytes());
    }
    hasher.update([0u8]);
    for cart_item_id in snapshot.cart_item_ids() {
        hasher.update(cart_item_id.to_be_bytes());
    }
    hasher.update(bucket.to_be_bytes());

    format!("auto-{}", hex::encode(hasher.finalize()))
}

fn build_new_order(
    user: &AuthenticatedUser,
    request: &CheckoutRequest,
    snapshot: &CartSnapshot,
    shipping: &ShippingOption,
    amount_cents: i64,
    coupon_discount_cents: i64,
    idempotency_key: String,
) -> NewOrder {
    let items = snapshot
        .lines()
        .iter()
        .map(|line| OrderItem {
            product_id: Some(line.product.id),
            name: line.product.name.clone(),
            price_cents: line.product.price_cents,
            count: line.count,
        })
        .collect();

    NewOrder {
        hub_id: user.hub_id,
        user_sub: user.sub.clone(),
        user_email: user.email.clone(),
        transaction_id: Uuid::new_v4().to_string(),
        idempotency_key,
        status: OrderStatus::Pending,
        amount_cents,
        address: request.address.clone(),
        shipping_name: shipping.name.clone(),
        shipping_time: shipping.eta_label.clone(),
        shipping_price_cents: shipping.price_cents,
        coupon_discount_cents,
        items,
    }
}

fn to_cents(amount: Decimal) -> CheckoutResult<i64> {
    decimal_to_cents(amount)
        .ok_or_else(|| CheckoutError::Internal(format!("amount {amount} out of range")))
}

/// Validate, price and commit a checkout. Nothing is written unless the whole
/// order commits; a known idempotency key returns the stored order instead.
pub fn place_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request: &CheckoutRequest,
    settings: &CheckoutSettings,
) -> CheckoutResult<CommittedOrder>
where
    R: CartReader
        + ProductReader
        + CouponReader
        + ShippingReader
        + OrderReader
        + OrderWriter
        + ?Sized,
{
    let supplied_key = normalize_idempotency_key(request.idempotency_key.as_deref())?;

    if let Some(key) = &supplied_key {
        if let Some(order) = repo.find_order_by_idempotency_key(user.hub_id, &user.sub, key)? {
            log::info!("Replaying order {} for key {key}", order.transaction_id);
            return Ok(CommittedOrder {
                order,
                replayed: true,
            });
        }
    }

    let shipping = load_shipping(repo, user.hub_id, request.quote.shipping_id)?;
    let snapshot = load_cart_snapshot(repo, user.hub_id, &user.sub)?;

    let idempotency_key = match supplied_key {
        Some(key) => key,
        None => {
            let key = derive_idempotency_key(
                user.hub_id,
                &user.sub,
                &request.quote,
                &snapshot,
                settings.idempotency_window,
                Utc::now(),
            );
            if let Some(order) = repo.find_order_by_idempotency_key(user.hub_id, &user.sub, &key)? {
                log::info!("Replaying order {} for derived key", order.transaction_id);
                return Ok(CommittedOrder {
                    order,
                    replayed: true,
                });
            }
            key
        }
    };
    log::debug!("checkout for {}: {}", user.sub, CheckoutStep::Validated);

    check_availability(&snapshot)?;
    let coupon = resolve_coupon(repo, user.hub_id, request.quote.coupon())?;
    let quote = price_lines(&snapshot, coupon.as_ref(), &shipping, settings.tax_rate);
    log::debug!(
        "checkout for {}: {} (total {})",
        user.sub,
        CheckoutStep::Priced,
        quote.total
    );

    let new_order = build_new_order(
        user,
        request,
        &snapshot,
        &shipping,
        to_cents(quote.total)?,
        to_cents(quote.discount_applied)?,
        idempotency_key,
    );

    let committed = repo.commit_checkout(&new_order)?;
    if committed.replayed {
        log::info!(
            "Order {} already committed by a concurrent request",
            committed.order.transaction_id
        );
    } else {
        log::debug!(
            "checkout {}: {}, {}, {}",
            committed.order.transaction_id,
            CheckoutStep::StockReserved,
            CheckoutStep::OrderPersisted,
            CheckoutStep::ItemsPersisted
        );
        log::info!(
            "Order {} placed by {} for {}",
            committed.order.transaction_id,
            user.sub,
            committed.order.amount()
        );
    }

    Ok(committed)
}

/// Run the whole checkout: commit the order, then notify the buyer and clear
/// the cart.
pub async fn checkout<R>(
    repo: &R,
    notifier: Arc<dyn Notifier>,
    user: &AuthenticatedUser,
    request: &CheckoutRequest,
    settings: &CheckoutSettings,
) -> CheckoutResult<CheckoutReceipt>
where
    R: CartReader
        + CartWriter
        + ProductReader
        + CouponReader
        + ShippingReader
        + OrderReader
        + OrderWriter
        + ?Sized,
{
    let committed = place_order(repo, user, request, settings)?;
    let follow_up_failures = run_follow_ups(repo, notifier, &committed, settings).await;

    if follow_up_failures.is_empty() {
        log::debug!(
            "checkout {}: {}",
            committed.order.transaction_id,
            CheckoutStep::Done
        );
    }

    Ok(CheckoutReceipt {
        order: committed.order,
        replayed: committed.replayed,
        follow_up_failures,
    })
}
