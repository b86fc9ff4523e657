use std::collections::BTreeMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::StockReservation;
use crate::models::product::Product as DbProduct;
use crate::repository::CommitError;

/// Check every reservation against current stock, then decrement `quantity` and
/// bump `sold` for each product. Must run inside a transaction: an error leaves
/// the caller to roll back whatever was already applied.
pub(crate) fn apply_reservations(
    conn: &mut SqliteConnection,
    hub_id: i32,
    reservations: &[StockReservation],
) -> Result<(), CommitError> {
    use crate::schema::products;

    let mut requested: BTreeMap<i32, i32> = BTreeMap::new();
    for reservation in reservations {
        *requested.entry(reservation.product_id).or_default() += reservation.count;
    }

    let ids: Vec<i32> = requested.keys().copied().collect();
    let rows = products::table
        .filter(products::hub_id.eq(hub_id))
        .filter(products::id.eq_any(&ids))
        .load::<DbProduct>(conn)?;

    for (product_id, count) in &requested {
        let Some(row) = rows.iter().find(|row| row.id == *product_id) else {
            return Err(CommitError::UnknownProduct {
                product_id: *product_id,
            });
        };
        if *count > row.quantity {
            return Err(CommitError::InsufficientStock {
                product_name: row.name.clone(),
            });
        }
    }

    let now = Utc::now().naive_utc();
    for (product_id, count) in &requested {
        let target = products::table
            .filter(products::id.eq(*product_id))
            .filter(products::hub_id.eq(hub_id))
            .filter(products::quantity.ge(*count));

        let updated = diesel::update(target)
            .set((
                products::quantity.eq(products::quantity - *count),
                products::sold.eq(products::sold + *count),
                products::updated_at.eq(now),
            ))
            .execute(conn)?;

        if updated == 0 {
            let product_name = rows
                .iter()
                .find(|row| row.id == *product_id)
                .map(|row| row.name.clone())
                .unwrap_or_default();
            return Err(CommitError::InsufficientStock { product_name });
        }
    }

    log::debug!(
        "Reserved stock for {} products in hub {hub_id}",
        requested.len()
    );
    Ok(())
}
