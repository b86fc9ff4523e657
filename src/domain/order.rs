use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::ShippingAddress;
use crate::domain::money::cents_to_decimal;
use crate::domain::product::StockReservation;

/// Fulfillment states of an order. Only the initial state is set here; the rest
/// belong to the fulfillment process.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order was paid and recorded, waiting to be processed.
    #[default]
    Pending,
    /// Order is being prepared.
    Processing,
    /// Order left the warehouse.
    Shipped,
    /// Order reached the buyer.
    Delivered,
    /// Order was cancelled and should not be processed further.
    Cancelled,
}

impl From<OrderStatus> for &'static str {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "processing" => OrderStatus::Processing,
            "shipped" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Pending,
        }
    }
}

/// Durable record of a completed checkout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    /// Subject identifier of the buyer.
    pub user_sub: String,
    /// Address the confirmation is sent to.
    pub user_email: String,
    /// Server generated opaque identifier exposed to the buyer.
    pub transaction_id: String,
    pub idempotency_key: String,
    pub status: OrderStatus,
    /// Charged amount in the smallest currency unit.
    pub amount_cents: i64,
    pub address: ShippingAddress,
    /// Shipping option name at purchase time.
    pub shipping_name: String,
    /// Shipping option delivery estimate at purchase time.
    pub shipping_time: String,
    /// Shipping option price at purchase time.
    pub shipping_price_cents: i64,
    /// Coupon discount actually applied.
    pub coupon_discount_cents: i64,
    /// Set once the buyer has been notified.
    pub confirmation_sent_at: Option<NaiveDateTime>,
    pub items: Vec<OrderItem>,
    /// Issue timestamp.
    pub created_at: NaiveDateTime,
}

impl Order {
    pub fn amount(&self) -> Decimal {
        cents_to_decimal(self.amount_cents)
    }

    pub fn confirmation_pending(&self) -> bool {
        self.confirmation_sent_at.is_none()
    }
}

/// One purchased product, snapshotted at purchase time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OrderItem {
    /// Weak reference to the product; cleared if the product is deleted.
    pub product_id: Option<i32>,
    pub name: String,
    pub price_cents: i64,
    pub count: i32,
}

/// Everything the checkout transaction writes: the order row, its items and the
/// stock it consumes.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub hub_id: i32,
    pub user_sub: String,
    pub user_email: String,
    pub transaction_id: String,
    pub idempotency_key: String,
    pub status: OrderStatus,
    pub amount_cents: i64,
    pub address: ShippingAddress,
    pub shipping_name: String,
    pub shipping_time: String,
    pub shipping_price_cents: i64,
    pub coupon_discount_cents: i64,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Stock decrements implied by the order items.
    pub fn reservations(&self) -> Vec<StockReservation> {
        self.items
            .iter()
            .filter_map(|item| {
                item.product_id
                    .map(|product_id| StockReservation::new(product_id, item.count))
            })
            .collect()
    }
}

/// Result of the checkout transaction.
#[derive(Debug, Clone)]
pub struct CommittedOrder {
    pub order: Order,
    /// `true` when an order with the same idempotency key already existed and
    /// nothing was written.
    pub replayed: bool,
}

/// Query definition used to list a buyer's orders.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    pub hub_id: i32,
    pub user_sub: String,
    pub status: Option<OrderStatus>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Construct a query that targets all orders of `user_sub` within `hub_id`.
    pub fn new(hub_id: i32, user_sub: impl Into<String>) -> Self {
        Self {
            hub_id,
            user_sub: user_sub.into(),
            status: None,
            pagination: None,
        }
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
