use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Item, Point};

/// Represents an association between a point and an item it accepts
#[derive(Queryable, Selectable, Insertable, Identifiable, Associations, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(belongs_to(Point))]
#[diesel(belongs_to(Item))]
#[diesel(table_name = crate::schema::point_items)]
#[diesel(primary_key(point_id, item_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PointItem {
    /// The ID of the point
    point_id: i32,

    /// The ID of the item
    item_id: i32,
}

impl PointItem {
    /// Creates a new point item association
    pub fn new(point_id: i32, item_id: i32) -> Self {
        Self { point_id, item_id }
    }

    pub fn get_point_id(&self) -> i32 {
        self.point_id
    }

    pub fn get_item_id(&self) -> i32 {
        self.item_id
    }
}
