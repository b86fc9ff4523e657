//! Stock checks run before pricing and before the checkout commit.
//!
//! The authoritative check happens again inside the commit transaction, this
//! pass only lets a stale cart fail before any arithmetic.

use crate::domain::cart::CartSnapshot;
use crate::services::errors::{CheckoutError, CheckoutResult};

/// Fail with `OutOfStock` on the first line that asks for more than is available.
pub fn check_availability(snapshot: &CartSnapshot) -> CheckoutResult<()> {
    match snapshot
        .lines()
        .iter()
        .find(|line| !line.product.has_stock_for(line.count))
    {
        Some(line) => Err(CheckoutError::OutOfStock {
            product_name: line.product.name.clone(),
        }),
        None => Ok(()),
    }
}
