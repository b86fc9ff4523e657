use std::sync::{Arc, Mutex, MutexGuard};

use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};
use thiserror::Error;

use crate::db::{DbConnection, DbPool};
use crate::domain::cart::{CartItem, NewCartItem};
use crate::domain::coupon::{CouponRule, NewCoupon};
use crate::domain::order::{CommittedOrder, NewOrder, Order, OrderListQuery};
use crate::domain::product::{NewProduct, Product};
use crate::domain::shipping::{NewShippingOption, ShippingOption};

pub mod cart;
pub mod coupon;
pub mod inventory;
pub mod order;
pub mod product;
pub mod shipping;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
    // SQLite has a single writer; stock-mutating transactions queue here instead
    // of racing for the database lock.
    write_gate: Arc<Mutex<()>>,
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned gate carries no broken state.
        self.write_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Failures of the stock ledger and of the checkout transaction.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("not enough {product_name} items in stock")]
    InsufficientStock { product_name: String },
    #[error("product {product_id} does not exist")]
    UnknownProduct { product_id: i32 },
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Read-only access to the product catalog.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products_by_ids(&self, hub_id: i32, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
}

/// Catalog writes. Used for seeding; product administration lives elsewhere.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
}

pub trait CartReader {
    fn list_cart_items(&self, hub_id: i32, user_sub: &str) -> RepositoryResult<Vec<CartItem>>;
}

pub trait CartWriter {
    fn add_cart_item(&self, new_item: &NewCartItem) -> RepositoryResult<CartItem>;
    fn remove_cart_item(&self, hub_id: i32, user_sub: &str, product_id: i32)
    -> RepositoryResult<()>;
    /// Delete every item of the cart, returning how many were removed.
    fn clear_cart(&self, hub_id: i32, user_sub: &str) -> RepositoryResult<usize>;
}

pub trait CouponReader {
    /// Case-insensitive lookup of a coupon by its name.
    fn find_coupon_by_code(&self, hub_id: i32, code: &str) -> RepositoryResult<Option<CouponRule>>;
}

pub trait CouponWriter {
    fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<CouponRule>;
}

pub trait ShippingReader {
    fn get_shipping_option(&self, id: i32, hub_id: i32)
    -> RepositoryResult<Option<ShippingOption>>;
    fn list_shipping_options(&self, hub_id: i32) -> RepositoryResult<Vec<ShippingOption>>;
}

pub trait ShippingWriter {
    fn create_shipping_option(
        &self,
        new_option: &NewShippingOption,
    ) -> RepositoryResult<ShippingOption>;
}

pub trait OrderReader {
    fn get_order_by_transaction_id(
        &self,
        hub_id: i32,
        user_sub: &str,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Order>>;
    fn find_order_by_idempotency_key(
        &self,
        hub_id: i32,
        user_sub: &str,
        key: &str,
    ) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    /// Orders of a hub whose confirmation has not been delivered yet, oldest first.
    fn list_unconfirmed_orders(&self, hub_id: i32, limit: usize) -> RepositoryResult<Vec<Order>>;
}

pub trait OrderWriter {
    /// Reserve stock and persist the order with its items in one transaction.
    fn commit_checkout(&self, new_order: &NewOrder) -> Result<CommittedOrder, CommitError>;
    fn mark_confirmation_sent(&self, order_id: i32) -> RepositoryResult<()>;
}
