use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A category of recyclable material a collection point may accept
///
/// This struct maps directly to the `items` table in the database. Items are
/// static reference data seeded by migration; `image` is a file name inside
/// the uploads directory.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Item {
    /// Unique identifier for the item
    id: i32,

    /// Display title, e.g. "Óleo de Cozinha"
    title: String,

    /// Icon file name
    image: String,
}

impl Item {
    /// Creates an item with all fields specified
    ///
    /// This method is primarily used for testing and database deserialization.
    pub fn new_with_fields(id: i32, title: String, image: String) -> Self {
        Self { id, title, image }
    }

    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_image(&self) -> String {
        self.image.clone()
    }
}
