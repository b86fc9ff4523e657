use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::shipping::{
        NewShippingOption as DomainNewShippingOption, ShippingOption as DomainShippingOption,
    },
    models::shipping::{
        NewShippingOption as DbNewShippingOption, ShippingOption as DbShippingOption,
    },
    repository::{DieselRepository, ShippingReader, ShippingWriter},
};

impl ShippingReader for DieselRepository {
    fn get_shipping_option(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainShippingOption>> {
        use crate::schema::shipping_options;

        let mut conn = self.conn()?;
        let option = shipping_options::table
            .filter(shipping_options::id.eq(id))
            .filter(shipping_options::hub_id.eq(hub_id))
            .first::<DbShippingOption>(&mut conn)
            .optional()?;

        Ok(option.map(DomainShippingOption::from))
    }

    fn list_shipping_options(&self, hub_id: i32) -> RepositoryResult<Vec<DomainShippingOption>> {
        use crate::schema::shipping_options;

        let mut conn = self.conn()?;
        let rows = shipping_options::table
            .filter(shipping_options::hub_id.eq(hub_id))
            .order((shipping_options::price_cents.asc(), shipping_options::id.asc()))
            .load::<DbShippingOption>(&mut conn)?;

        Ok(rows.into_iter().map(DomainShippingOption::from).collect())
    }
}

impl ShippingWriter for DieselRepository {
    fn create_shipping_option(
        &self,
        new_option: &DomainNewShippingOption,
    ) -> RepositoryResult<DomainShippingOption> {
        use crate::schema::shipping_options;

        let mut conn = self.conn()?;
        let db_new = DbNewShippingOption::from(new_option);

        let created = diesel::insert_into(shipping_options::table)
            .values(&db_new)
            .get_result::<DbShippingOption>(&mut conn)?;

        Ok(created.into())
    }
}
