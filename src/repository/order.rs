use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::order::{
        CommittedOrder, NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery,
    },
    models::order::{
        NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
        OrderItem as DbOrderItem,
    },
    repository::{
        CommitError, DieselRepository, OrderReader, OrderWriter, inventory::apply_reservations,
    },
};

fn load_items(conn: &mut SqliteConnection, order_id: i32) -> QueryResult<Vec<DbOrderItem>> {
    use crate::schema::order_items;

    order_items::table
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)
}

/// Attach items to a batch of orders with a single query.
fn with_items(
    conn: &mut SqliteConnection,
    db_orders: Vec<DbOrder>,
) -> QueryResult<Vec<DomainOrder>> {
    use crate::schema::order_items;

    if db_orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();
    let rows = order_items::table
        .filter(order_items::order_id.eq_any(&order_ids))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)?;

    let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
    for item in rows {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(db_orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            DomainOrder::from((order, items))
        })
        .collect())
}

fn find_by_key(
    conn: &mut SqliteConnection,
    hub_id: i32,
    user_sub: &str,
    key: &str,
) -> QueryResult<Option<DomainOrder>> {
    use crate::schema::orders;

    let order = orders::table
        .filter(orders::hub_id.eq(hub_id))
        .filter(orders::user_sub.eq(user_sub))
        .filter(orders::idempotency_key.eq(key))
        .first::<DbOrder>(conn)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items = load_items(conn, order.id)?;
    Ok(Some(order.into_domain(items)))
}

fn is_unique_violation(err: &CommitError) -> bool {
    matches!(
        err,
        CommitError::Database(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _
        ))
    )
}

impl OrderReader for DieselRepository {
    fn get_order_by_transaction_id(
        &self,
        hub_id: i32,
        user_sub: &str,
        transaction_id: &str,
    ) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::user_sub.eq(user_sub))
            .filter(orders::transaction_id.eq(transaction_id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = load_items(&mut conn, order.id)?;
        Ok(Some(order.into_domain(items)))
    }

    fn find_order_by_idempotency_key(
        &self,
        hub_id: i32,
        user_sub: &str,
        key: &str,
    ) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        Ok(find_by_key(&mut conn, hub_id, user_sub, key)?)
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let OrderListQuery {
            hub_id,
            user_sub,
            status,
            pagination,
        } = query;

        let status_filter: Option<&'static str> = status.map(<&'static str>::from);

        let mut count_query = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::user_sub.eq(&user_sub))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status_value) = status_filter {
            count_query = count_query.filter(orders::status.eq(status_value));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::user_sub.eq(&user_sub))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status_value) = status_filter {
            items = items.filter(orders::status.eq(status_value));
        }

        items = items.order((orders::created_at.desc(), orders::id.desc()));

        if let Some(pagination) = pagination {
            let offset = (pagination.page.max(1) - 1).saturating_mul(pagination.per_page);
            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.offset(offset).limit(limit);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        let orders = with_items(&mut conn, db_orders)?;

        Ok((total, orders))
    }

    fn list_unconfirmed_orders(
        &self,
        hub_id: i32,
        limit: usize,
    ) -> RepositoryResult<Vec<DomainOrder>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let db_orders = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::confirmation_sent_at.is_null())
            .order((orders::created_at.asc(), orders::id.asc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .load::<DbOrder>(&mut conn)?;

        Ok(with_items(&mut conn, db_orders)?)
    }
}

impl OrderWriter for DieselRepository {
    fn commit_checkout(&self, new_order: &DomainNewOrder) -> Result<CommittedOrder, CommitError> {
        use crate::schema::{order_items, orders};

        let _gate = self.lock_writes();
        let mut conn = self.conn()?;

        let hub_id = new_order.hub_id;
        let user_sub = new_order.user_sub.as_str();
        let key = new_order.idempotency_key.as_str();

        let result = conn.immediate_transaction::<CommittedOrder, CommitError, _>(|conn| {
            if let Some(existing) = find_by_key(conn, hub_id, user_sub, key)? {
                return Ok(CommittedOrder {
                    order: existing,
                    replayed: true,
                });
            }

            apply_reservations(conn, hub_id, &new_order.reservations())?;

            let db_new = DbNewOrder::from(new_order);
            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            let order_id = created.id;

            if !new_order.items.is_empty() {
                let payload: Vec<DbNewOrderItem> = new_order
                    .items
                    .iter()
                    .map(|item| DbNewOrderItem::from_domain(order_id, item))
                    .collect();

                diesel::insert_into(order_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let items = load_items(conn, order_id)?;

            Ok(CommittedOrder {
                order: created.into_domain(items),
                replayed: false,
            })
        });

        match result {
            // Another writer stored the same key first; hand back its order.
            Err(err) if is_unique_violation(&err) => {
                match find_by_key(&mut conn, hub_id, user_sub, key)? {
                    Some(existing) => Ok(CommittedOrder {
                        order: existing,
                        replayed: true,
                    }),
                    None => Err(err),
                }
            }
            other => other,
        }
    }

    fn mark_confirmation_sent(&self, order_id: i32) -> RepositoryResult<()> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set(orders::confirmation_sent_at.eq(Some(now)))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
