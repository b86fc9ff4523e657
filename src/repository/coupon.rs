use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::coupon::{CouponRule, NewCoupon as DomainNewCoupon},
    models::coupon::{Coupon as DbCoupon, NewCoupon as DbNewCoupon},
    repository::{CouponReader, CouponWriter, DieselRepository},
};

impl CouponReader for DieselRepository {
    fn find_coupon_by_code(&self, hub_id: i32, code: &str) -> RepositoryResult<Option<CouponRule>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;
        // `name` is declared with NOCASE collation, so equality is case-insensitive.
        // "fixed_amount" sorts before "percentage", so a fixed rule wins if names ever collide.
        let rows = coupons::table
            .filter(coupons::hub_id.eq(hub_id))
            .filter(coupons::name.eq(code))
            .order((coupons::kind.asc(), coupons::id.asc()))
            .load::<DbCoupon>(&mut conn)?;

        Ok(rows.into_iter().find_map(DbCoupon::into_rule))
    }
}

impl CouponWriter for DieselRepository {
    fn create_coupon(&self, new_coupon: &DomainNewCoupon) -> RepositoryResult<CouponRule> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;
        let db_new = DbNewCoupon::from(new_coupon);

        diesel::insert_into(coupons::table)
            .values(&db_new)
            .execute(&mut conn)?;

        Ok(new_coupon.rule.clone())
    }
}
