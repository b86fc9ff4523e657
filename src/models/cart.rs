use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::{CartItem as DomainCartItem, NewCartItem as DomainNewCartItem};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CartItem {
    pub id: i32,
    pub hub_id: i32,
    pub user_sub: String,
    pub product_id: i32,
    pub count: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem<'a> {
    pub hub_id: i32,
    pub user_sub: &'a str,
    pub product_id: i32,
    pub count: i32,
}

impl From<CartItem> for DomainCartItem {
    fn from(value: CartItem) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            user_sub: value.user_sub,
            product_id: value.product_id,
            count: value.count,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewCartItem> for NewCartItem<'a> {
    fn from(value: &'a DomainNewCartItem) -> Self {
        Self {
            hub_id: value.hub_id,
            user_sub: value.user_sub.as_str(),
            product_id: value.product_id,
            count: value.count,
        }
    }
}
