use crate::db::DbPool;
use crate::dto::PointFilter;
use crate::models::{Item, NewPoint, Point, PointItem};
use crate::schema::{items, point_items, points};
use diesel::prelude::*;
use anyhow::Result;
use thiserror::Error;
use tracing::{instrument, debug, info};

use super::item_repo::find_items;

/// Raised when a registration references items missing from the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown item ids: {}", join_ids(.ids))]
pub struct UnknownItemsError {
    /// The IDs that were not found, ascending
    pub ids: Vec<i32>,
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter().map(i32::to_string).collect::<Vec<_>>().join(", ")
}

/// Registers a new point together with the items it accepts
///
/// The point row and its association rows are written in one transaction.
/// Every referenced item must exist; otherwise nothing is written and the
/// error downcasts to `UnknownItemsError`.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `new_point` - The point row to insert
/// * `item_ids` - IDs of the accepted items
///
/// ### Returns
///
/// A Result containing the inserted Point and its Items ordered by ID
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - An item ID does not exist in the catalog
/// - Any database insert fails
#[instrument(skip(pool, new_point), fields(name = %new_point.name, city = %new_point.city, uf = %new_point.uf))]
pub fn create_point(pool: &DbPool, new_point: &NewPoint, item_ids: &[i32]) -> Result<(Point, Vec<Item>)> {
    debug!("Creating new point");

    let mut wanted = item_ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let conn = &mut pool.get()?;

    let (point, accepted) = conn.transaction::<_, anyhow::Error, _>(|conn| {
        let accepted = find_items(conn, &wanted)?;
        if accepted.len() != wanted.len() {
            let ids = wanted
                .iter()
                .copied()
                .filter(|id| !accepted.iter().any(|item| item.get_id() == *id))
                .collect();
            return Err(UnknownItemsError { ids }.into());
        }

        let point = diesel::insert_into(points::table)
            .values(new_point)
            .returning(Point::as_returning())
            .get_result(conn)?;

        let links: Vec<PointItem> = wanted
            .iter()
            .map(|&item_id| PointItem::new(point.get_id(), item_id))
            .collect();

        debug!("Linking point {} to {} items", point.get_id(), links.len());

        diesel::insert_into(point_items::table)
            .values(&links)
            .execute(conn)?;

        Ok((point, accepted))
    })?;

    info!("Successfully created point with id: {}", point.get_id());
    Ok((point, accepted))
}

/// Retrieves a point by its ID
///
/// ### Returns
///
/// A Result containing an Option with the Point if found, or None if not found
#[instrument(skip(pool), fields(point_id = %point_id))]
pub fn get_point(pool: &DbPool, point_id: i32) -> Result<Option<Point>> {
    debug!("Retrieving point by id");

    let conn = &mut pool.get()?;

    let result = points::table
        .find(point_id)
        .select(Point::as_select())
        .first::<Point>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a point by its ID together with the items it accepts
///
/// ### Returns
///
/// A Result containing an Option with the Point and its Items ordered by ID,
/// or None if the point does not exist
#[instrument(skip(pool), fields(point_id = %point_id))]
pub fn get_point_with_items(pool: &DbPool, point_id: i32) -> Result<Option<(Point, Vec<Item>)>> {
    let Some(point) = get_point(pool, point_id)? else {
        debug!("Point not found");
        return Ok(None);
    };

    let conn = &mut pool.get()?;

    let accepted = PointItem::belonging_to(&point)
        .inner_join(items::table)
        .order(items::id.asc())
        .select(Item::as_select())
        .load::<Item>(conn)?;

    debug!("Point has {} items", accepted.len());
    Ok(Some((point, accepted)))
}

/// Lists points matching the filter, ordered by ID
///
/// Blank filter fields match everything. With item IDs, a point matches
/// when it accepts at least one of them; each point appears once.
#[instrument(skip(pool))]
pub fn list_points(pool: &DbPool, filter: &PointFilter) -> Result<Vec<Point>> {
    debug!("Listing points");

    let conn = &mut pool.get()?;

    let mut query = points::table.into_boxed();

    if let Some(city) = &filter.city {
        query = query.filter(points::city.eq(city.clone()));
    }
    if let Some(uf) = &filter.uf {
        query = query.filter(points::uf.eq(uf.clone()));
    }
    if !filter.item_ids.is_empty() {
        let accepting = point_items::table
            .filter(point_items::item_id.eq_any(filter.item_ids.clone()))
            .select(point_items::point_id);
        query = query.filter(points::id.eq_any(accepting));
    }

    let result = query
        .order(points::id.asc())
        .select(Point::as_select())
        .load::<Point>(conn)?;

    debug!("Retrieved {} points", result.len());
    Ok(result)
}
