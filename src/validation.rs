//! Validation of point registration forms
//!
//! A registration arrives as loosely typed multipart text. Each field has a
//! checker in `POINT_CHECKS`; all of them run against the raw form and every
//! failure is collected into one `ValidationErrors`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use axum::body::Bytes;
use chrono::Utc;
use serde::Serialize;
use validator::ValidateEmail;

use crate::models::NewPoint;

/// An image part received with a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// The client-side file name
    pub file_name: String,
    /// The declared content type, if any
    pub content_type: Option<String>,
    /// The raw file contents
    pub bytes: Bytes,
}

/// Raw `POST /points` form, exactly as received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Option<String>,
    pub image: Option<UploadedImage>,
}

impl PointForm {
    /// Stores a text field by its form name
    ///
    /// `items` may be sent more than once; the values are joined with commas.
    ///
    /// ### Returns
    ///
    /// `false` if the field name is not part of the form
    pub fn set_text(&mut self, field: &str, value: String) -> bool {
        // repeated item parts accumulate
        if field == "items" {
            match &mut self.items {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => self.items = Some(value),
            }
            return true;
        }

        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "whatsapp" => &mut self.whatsapp,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            "city" => &mut self.city,
            "uf" => &mut self.uf,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Stores the image part
    ///
    /// Browsers send an empty, unnamed file part when no file was picked;
    /// that is treated as no image at all.
    pub fn set_image(&mut self, image: UploadedImage) {
        if image.file_name.is_empty() && image.bytes.is_empty() {
            self.image = None;
        } else {
            self.image = Some(image);
        }
    }
}

/// Per-field validation messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the fields that failed, in sorted order
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A single field checker
pub struct FieldCheck {
    pub field: &'static str,
    pub check: fn(&PointForm) -> Result<(), String>,
}

/// Every check a registration must pass
pub const POINT_CHECKS: &[FieldCheck] = &[
    FieldCheck { field: "name", check: |form| required_text(&form.name).map(drop) },
    FieldCheck { field: "email", check: |form| parse_email(&form.email).map(drop) },
    FieldCheck { field: "whatsapp", check: |form| parse_whatsapp(&form.whatsapp).map(drop) },
    FieldCheck { field: "latitude", check: |form| parse_latitude(&form.latitude).map(drop) },
    FieldCheck { field: "longitude", check: |form| parse_longitude(&form.longitude).map(drop) },
    FieldCheck { field: "city", check: |form| required_text(&form.city).map(drop) },
    FieldCheck { field: "uf", check: |form| parse_uf(&form.uf).map(drop) },
    FieldCheck { field: "items", check: |form| parse_item_list(&form.items).map(drop) },
    FieldCheck { field: "image", check: |form| check_image(form.image.as_ref()) },
];

/// A registration that passed every check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPoint {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    /// Distinct item ids, ascending
    pub item_ids: Vec<i32>,
}

impl ValidPoint {
    /// Splits into the row to insert and the item ids to associate
    pub fn into_parts(self, image: Option<String>) -> (NewPoint, Vec<i32>) {
        let new_point = NewPoint {
            image,
            name: self.name,
            email: self.email,
            whatsapp: self.whatsapp,
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.city,
            uf: self.uf,
            created_at: Utc::now().naive_utc(),
        };
        (new_point, self.item_ids)
    }
}

/// Runs every check in `POINT_CHECKS` and collects all failures
///
/// ### Returns
///
/// The typed registration, or every field error found
pub fn validate_point(form: &PointForm) -> Result<ValidPoint, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for check in POINT_CHECKS {
        if let Err(message) = (check.check)(form) {
            errors.add(check.field, message);
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let field = |name: &'static str, message: String| {
        let mut errors = ValidationErrors::default();
        errors.add(name, message);
        errors
    };

    Ok(ValidPoint {
        name: required_text(&form.name).map_err(|m| field("name", m))?.to_string(),
        email: parse_email(&form.email).map_err(|m| field("email", m))?,
        whatsapp: parse_whatsapp(&form.whatsapp).map_err(|m| field("whatsapp", m))?,
        latitude: parse_latitude(&form.latitude).map_err(|m| field("latitude", m))?,
        longitude: parse_longitude(&form.longitude).map_err(|m| field("longitude", m))?,
        city: required_text(&form.city).map_err(|m| field("city", m))?.to_string(),
        uf: parse_uf(&form.uf).map_err(|m| field("uf", m))?,
        item_ids: parse_item_list(&form.items).map_err(|m| field("items", m))?,
    })
}

fn required_text(value: &Option<String>) -> Result<&str, String> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err("is required".to_string()),
    }
}

fn parse_email(value: &Option<String>) -> Result<String, String> {
    let email = required_text(value)?;
    if email.validate_email() {
        Ok(email.to_string())
    } else {
        Err("must be a valid email address".to_string())
    }
}

fn parse_whatsapp(value: &Option<String>) -> Result<String, String> {
    let number = required_text(value)?;
    if number.chars().all(|c| c.is_ascii_digit()) {
        Ok(number.to_string())
    } else {
        Err("must be numeric".to_string())
    }
}

fn parse_coordinate(value: &Option<String>, limit: f64) -> Result<f64, String> {
    let text = required_text(value)?;
    let number: f64 = text.parse().map_err(|_| "must be a number".to_string())?;
    if !number.is_finite() || number.abs() > limit {
        return Err(format!("must be between -{} and {}", limit, limit));
    }
    Ok(number)
}

fn parse_latitude(value: &Option<String>) -> Result<f64, String> {
    parse_coordinate(value, 90.0)
}

fn parse_longitude(value: &Option<String>) -> Result<f64, String> {
    parse_coordinate(value, 180.0)
}

fn parse_uf(value: &Option<String>) -> Result<String, String> {
    let uf = required_text(value)?;
    if uf.chars().count() > 2 {
        return Err("must be at most 2 characters".to_string());
    }
    Ok(uf.to_string())
}

fn parse_item_list(value: &Option<String>) -> Result<Vec<i32>, String> {
    let raw = required_text(value)?;
    let ids = split_item_ids(raw)?;
    if ids.is_empty() {
        return Err("must list at least one item".to_string());
    }
    Ok(ids)
}

/// Parses a comma-separated list of item ids
///
/// Entries are trimmed and empty entries skipped; the result is distinct and
/// ascending. Every entry that is not a positive integer is reported.
pub fn split_item_ids(raw: &str) -> Result<Vec<i32>, String> {
    let mut ids = BTreeSet::new();
    let mut invalid = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.parse::<i32>() {
            Ok(id) if id > 0 => {
                ids.insert(id);
            }
            _ => invalid.push(entry.to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(ids.into_iter().collect())
    } else {
        Err(format!("contains invalid item ids: {}", invalid.join(", ")))
    }
}

fn check_image(image: Option<&UploadedImage>) -> Result<(), String> {
    let Some(image) = image else {
        return Ok(());
    };
    if image.bytes.is_empty() {
        return Err("must not be empty".to_string());
    }
    match image.content_type.as_deref() {
        Some(content_type) if !content_type.starts_with("image/") => {
            Err(format!("must be an image, got {}", content_type))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod prop_tests;
