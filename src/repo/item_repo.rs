use crate::db::DbPool;
use crate::models::Item;
use crate::schema::items;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug};

/// Retrieves the whole item catalog, ordered by ID
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
///
/// ### Returns
///
/// A Result containing every Item; empty when the catalog is empty
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database query fails
#[instrument(skip(pool))]
pub fn list_items(pool: &DbPool) -> Result<Vec<Item>> {
    debug!("Listing all items");

    let conn = &mut pool.get()?;

    let result = items::table
        .order(items::id.asc())
        .select(Item::as_select())
        .load::<Item>(conn)?;

    debug!("Retrieved {} items", result.len());
    Ok(result)
}

/// Loads the items whose IDs are in `item_ids`, ordered by ID
///
/// IDs that do not exist are simply absent from the result.
pub(crate) fn find_items(conn: &mut SqliteConnection, item_ids: &[i32]) -> QueryResult<Vec<Item>> {
    items::table
        .filter(items::id.eq_any(item_ids.to_vec()))
        .order(items::id.asc())
        .select(Item::as_select())
        .load::<Item>(conn)
}
