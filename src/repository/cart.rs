use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::cart::{CartItem as DomainCartItem, NewCartItem as DomainNewCartItem},
    models::cart::{CartItem as DbCartItem, NewCartItem as DbNewCartItem},
    repository::{CartReader, CartWriter, DieselRepository},
};

impl CartReader for DieselRepository {
    fn list_cart_items(
        &self,
        hub_id: i32,
        user_sub: &str,
    ) -> RepositoryResult<Vec<DomainCartItem>> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let rows = cart_items::table
            .filter(cart_items::hub_id.eq(hub_id))
            .filter(cart_items::user_sub.eq(user_sub))
            .order(cart_items::id.asc())
            .load::<DbCartItem>(&mut conn)?;

        Ok(rows.into_iter().map(DomainCartItem::from).collect())
    }
}

impl CartWriter for DieselRepository {
    fn add_cart_item(&self, new_item: &DomainNewCartItem) -> RepositoryResult<DomainCartItem> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let db_new = DbNewCartItem::from(new_item);

        let created = diesel::insert_into(cart_items::table)
            .values(&db_new)
            .get_result::<DbCartItem>(&mut conn)?;

        Ok(created.into())
    }

    fn remove_cart_item(
        &self,
        hub_id: i32,
        user_sub: &str,
        product_id: i32,
    ) -> RepositoryResult<()> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let target = cart_items::table
            .filter(cart_items::hub_id.eq(hub_id))
            .filter(cart_items::user_sub.eq(user_sub))
            .filter(cart_items::product_id.eq(product_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn clear_cart(&self, hub_id: i32, user_sub: &str) -> RepositoryResult<usize> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let target = cart_items::table
            .filter(cart_items::hub_id.eq(hub_id))
            .filter(cart_items::user_sub.eq(user_sub));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        Ok(deleted)
    }
}
