use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A registered waste-collection point
///
/// This struct maps directly to the `points` table in the database. Points are
/// created once through the registration workflow and are never updated.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::points)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Point {
    /// Unique identifier, generated by the database
    id: i32,

    /// Stored image file name, if a photo was uploaded
    image: Option<String>,

    /// Name of the entity running the point
    name: String,

    /// Contact email
    email: String,

    /// Contact number, digits only
    whatsapp: String,

    latitude: f64,

    longitude: f64,

    city: String,

    /// Two-letter state abbreviation
    uf: String,

    /// When this point was registered
    created_at: NaiveDateTime,
}

impl Point {
    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_image(&self) -> Option<String> {
        self.image.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    pub fn get_whatsapp(&self) -> String {
        self.whatsapp.clone()
    }

    pub fn get_latitude(&self) -> f64 {
        self.latitude
    }

    pub fn get_longitude(&self) -> f64 {
        self.longitude
    }

    pub fn get_city(&self) -> String {
        self.city.clone()
    }

    pub fn get_uf(&self) -> String {
        self.uf.clone()
    }

    /// Gets the registration timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the raw registration timestamp
    pub fn get_created_at_raw(&self) -> NaiveDateTime {
        self.created_at
    }
}

/// A point row ready to be inserted; the id is assigned by the database
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::points)]
pub struct NewPoint {
    pub image: Option<String>,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub created_at: NaiveDateTime,
}
