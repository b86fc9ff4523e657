use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::checkout::ShippingAddress;
use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderItem as DomainOrderItem,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    pub user_sub: String,
    pub user_email: String,
    pub transaction_id: String,
    pub idempotency_key: String,
    pub status: String,
    pub amount_cents: i64,
    pub full_name: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state_province_region: String,
    pub postal_zip_code: String,
    pub country_region: String,
    pub telephone_number: String,
    pub shipping_name: String,
    pub shipping_time: String,
    pub shipping_price_cents: i64,
    pub coupon_discount_cents: i64,
    pub confirmation_sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price_cents: i64,
    pub count: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub hub_id: i32,
    pub user_sub: &'a str,
    pub user_email: &'a str,
    pub transaction_id: &'a str,
    pub idempotency_key: &'a str,
    pub status: &'a str,
    pub amount_cents: i64,
    pub full_name: &'a str,
    pub address_line_1: &'a str,
    pub address_line_2: Option<&'a str>,
    pub city: &'a str,
    pub state_province_region: &'a str,
    pub postal_zip_code: &'a str,
    pub country_region: &'a str,
    pub telephone_number: &'a str,
    pub shipping_name: &'a str,
    pub shipping_time: &'a str,
    pub shipping_price_cents: i64,
    pub coupon_discount_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub price_cents: i64,
    pub count: i32,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            hub_id: self.hub_id,
            user_sub: self.user_sub,
            user_email: self.user_email,
            transaction_id: self.transaction_id,
            idempotency_key: self.idempotency_key,
            status: self.status.as_str().into(),
            amount_cents: self.amount_cents,
            address: ShippingAddress {
                full_name: self.full_name,
                address_line_1: self.address_line_1,
                address_line_2: self.address_line_2,
                city: self.city,
                state_province_region: self.state_province_region,
                postal_zip_code: self.postal_zip_code,
                country_region: self.country_region,
                telephone_number: self.telephone_number,
            },
            shipping_name: self.shipping_name,
            shipping_time: self.shipping_time,
            shipping_price_cents: self.shipping_price_cents,
            coupon_discount_cents: self.coupon_discount_cents,
            confirmation_sent_at: self.confirmation_sent_at,
            items: items.into_iter().map(OrderItem::into_domain).collect(),
            created_at: self.created_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self) -> DomainOrderItem {
        DomainOrderItem {
            product_id: self.product_id,
            name: self.name,
            price_cents: self.price_cents,
            count: self.count,
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        let address = &value.address;
        Self {
            hub_id: value.hub_id,
            user_sub: value.user_sub.as_str(),
            user_email: value.user_email.as_str(),
            transaction_id: value.transaction_id.as_str(),
            idempotency_key: value.idempotency_key.as_str(),
            status: value.status.into(),
            amount_cents: value.amount_cents,
            full_name: address.full_name.as_str(),
            address_line_1: address.address_line_1.as_str(),
            address_line_2: address.address_line_2.as_deref(),
            city: address.city.as_str(),
            state_province_region: address.state_province_region.as_str(),
            postal_zip_code: address.postal_zip_code.as_str(),
            country_region: address.country_region.as_str(),
            telephone_number: address.telephone_number.as_str(),
            shipping_name: value.shipping_name.as_str(),
            shipping_time: value.shipping_time.as_str(),
            shipping_price_cents: value.shipping_price_cents,
            coupon_discount_cents: value.coupon_discount_cents,
        }
    }
}

impl<'a> NewOrderItem<'a> {
    pub fn from_domain(order_id: i32, value: &'a DomainOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            name: value.name.as_str(),
            price_cents: value.price_cents,
            count: value.count,
        }
    }
}
