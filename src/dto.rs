use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Item, Point};
use crate::uploads::UploadStore;
use crate::validation::{split_item_ids, ValidationErrors};

/// An item as returned by the API, with its icon URL resolved
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: i32,
    pub title: String,
    pub image_url: String,
}

impl ItemView {
    pub fn new(item: &Item, uploads: &UploadStore) -> Self {
        Self {
            id: item.get_id(),
            title: item.get_title(),
            image_url: uploads.url_for(&item.get_image()),
        }
    }
}

/// A point as returned by the API, with its image URL resolved
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PointView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,

    /// Stored image file name
    pub image: Option<String>,

    /// Public URL of the image, when one was uploaded
    pub image_url: Option<String>,

    pub created_at: NaiveDateTime,

    /// IDs of the accepted items; only filled in on creation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<i32>,
}

impl PointView {
    pub fn new(point: &Point, uploads: &UploadStore) -> Self {
        let image = point.get_image();
        Self {
            id: point.get_id(),
            name: point.get_name(),
            email: point.get_email(),
            whatsapp: point.get_whatsapp(),
            latitude: point.get_latitude(),
            longitude: point.get_longitude(),
            city: point.get_city(),
            uf: point.get_uf(),
            image_url: image.as_deref().map(|file| uploads.url_for(file)),
            image,
            created_at: point.get_created_at_raw(),
            items: Vec::new(),
        }
    }

    /// Attaches the accepted item IDs
    pub fn with_items(mut self, items: &[Item]) -> Self {
        self.items = items.iter().map(Item::get_id).collect();
        self
    }
}

/// A point together with the items it accepts, as returned by `GET /points/{id}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PointDetailView {
    pub point: PointView,
    pub items: Vec<ItemView>,
}

/// Query parameters accepted by `GET /points`
///
/// `items` may be repeated (`items=1&items=2`), comma-separated
/// (`items=1,2`) or both.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PointFilterDto {
    /// Only points in this city
    pub city: Option<String>,

    /// Only points in this state
    pub uf: Option<String>,

    /// Only points accepting at least one of these items
    pub items: Vec<String>,
}

/// A parsed `PointFilterDto`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PointFilter {
    pub city: Option<String>,
    pub uf: Option<String>,
    pub item_ids: Vec<i32>,
}

impl PointFilterDto {
    /// Parses the item list, treating blank city/uf as absent
    pub fn parse(self) -> Result<PointFilter, ValidationErrors> {
        let mut item_ids = Vec::new();
        for raw in &self.items {
            match split_item_ids(raw) {
                Ok(ids) => item_ids.extend(ids),
                Err(message) => {
                    let mut errors = ValidationErrors::default();
                    errors.add("items", message);
                    return Err(errors);
                }
            }
        }
        item_ids.sort_unstable();
        item_ids.dedup();

        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(PointFilter {
            city: non_blank(self.city),
            uf: non_blank(self.uf),
            item_ids,
        })
    }
}
