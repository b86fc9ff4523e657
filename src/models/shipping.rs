use diesel::prelude::*;

use crate::domain::shipping::{
    NewShippingOption as DomainNewShippingOption, ShippingOption as DomainShippingOption,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::shipping_options)]
pub struct ShippingOption {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub eta_label: String,
    pub price_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shipping_options)]
pub struct NewShippingOption<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub eta_label: &'a str,
    pub price_cents: i64,
}

impl From<ShippingOption> for DomainShippingOption {
    fn from(value: ShippingOption) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            eta_label: value.eta_label,
            price_cents: value.price_cents,
        }
    }
}

impl<'a> From<&'a DomainNewShippingOption> for NewShippingOption<'a> {
    fn from(value: &'a DomainNewShippingOption) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            eta_label: value.eta_label.as_str(),
            price_cents: value.price_cents,
        }
    }
}
