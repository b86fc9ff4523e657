use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::ShippingAddress;
use crate::domain::money::cents_to_decimal;
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::repository::OrderReader;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the order history endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Page requested by the client (1-based).
    pub page: Option<usize>,
    pub status: Option<OrderStatus>,
}

/// One row of the order history.
#[derive(Debug, Serialize, PartialEq)]
pub struct OrderSummary {
    pub transaction_id: String,
    pub status: OrderStatus,
    pub amount: Decimal,
    pub shipping_price: Decimal,
    pub date_issued: NaiveDateTime,
    #[serde(flatten)]
    pub address: ShippingAddress,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            transaction_id: order.transaction_id.clone(),
            status: order.status,
            amount: order.amount(),
            shipping_price: cents_to_decimal(order.shipping_price_cents),
            date_issued: order.created_at,
            address: order.address.clone(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct OrderItemView {
    pub product_id: Option<i32>,
    pub name: String,
    pub price: Decimal,
    pub count: i32,
}

/// Full order including purchased items.
#[derive(Debug, Serialize, PartialEq)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub shipping_name: String,
    pub shipping_time: String,
    pub coupon_discount: Decimal,
    pub items: Vec<OrderItemView>,
}

impl From<Order> for OrderDetail {
    fn from(order: Order) -> Self {
        Self {
            summary: OrderSummary::from(&order),
            coupon_discount: cents_to_decimal(order.coupon_discount_cents),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemView {
                    product_id: item.product_id,
                    name: item.name,
                    price: cents_to_decimal(item.price_cents),
                    count: item.count,
                })
                .collect(),
            shipping_name: order.shipping_name,
            shipping_time: order.shipping_time,
        }
    }
}

/// Lists the caller's orders, newest first.
pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<Paginated<OrderSummary>>
where
    R: OrderReader + ?Sized,
{
    let OrdersQuery { page, status } = query;
    let page = page.unwrap_or(1);

    let mut list_query = OrderListQuery::new(user.hub_id, user.sub.as_str());
    if let Some(status) = status {
        list_query = list_query.status(status);
    }
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let summaries = orders.iter().map(OrderSummary::from).collect();

    Ok(Paginated::new(summaries, page, total_pages))
}

/// Loads one of the caller's orders by its transaction id.
pub fn get_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    transaction_id: &str,
) -> ServiceResult<OrderDetail>
where
    R: OrderReader + ?Sized,
{
    repo.get_order_by_transaction_id(user.hub_id, &user.sub, transaction_id)
        .map_err(ServiceError::from)?
        .map(OrderDetail::from)
        .ok_or(ServiceError::NotFound)
}
