//! Client-side registration form
//!
//! Tracks what the user has entered so far and turns it into the field set
//! the server expects once everything required is present.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("select a state before choosing a city")]
    NoUfSelected,
    #[error("{city} is not a city of {uf}")]
    UnknownCity { city: String, uf: String },
    #[error("missing: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
}

/// Everything needed for one `POST /points`
#[derive(Debug, Clone, PartialEq)]
pub struct PointSubmission {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub uf: String,
    pub city: String,
    pub items: Vec<i32>,
    pub image: Option<PathBuf>,
}

impl PointSubmission {
    /// The text fields of the multipart body; items are joined with commas
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let items = self
            .items
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(",");

        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("whatsapp", self.whatsapp.clone()),
            ("uf", self.uf.clone()),
            ("city", self.city.clone()),
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("items", items),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    name: String,
    email: String,
    whatsapp: String,
    initial_position: Option<(f64, f64)>,
    selected_position: Option<(f64, f64)>,
    selected_uf: Option<String>,
    cities: Option<Vec<String>>,
    selected_city: Option<String>,
    items: Vec<i32>,
    image: Option<PathBuf>,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_personal_info(&mut self, name: &str, email: &str, whatsapp: &str) {
        self.name = name.trim().to_string();
        self.email = email.trim().to_string();
        self.whatsapp = whatsapp.trim().to_string();
    }

    /// Records where the user is; used as the position until one is picked
    pub fn set_initial_position(&mut self, latitude: f64, longitude: f64) {
        self.initial_position = Some((latitude, longitude));
    }

    pub fn select_position(&mut self, latitude: f64, longitude: f64) {
        self.selected_position = Some((latitude, longitude));
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.selected_position.or(self.initial_position)
    }

    /// Selects a state; switching to another state drops the city and the loaded city list
    pub fn select_uf(&mut self, uf: &str) {
        let uf = uf.trim().to_uppercase();
        if self.selected_uf.as_deref() != Some(uf.as_str()) {
            self.cities = None;
            self.selected_city = None;
        }
        self.selected_uf = Some(uf);
    }

    pub fn selected_uf(&self) -> Option<&str> {
        self.selected_uf.as_deref()
    }

    /// Stores the city list loaded for `uf`
    ///
    /// ### Returns
    ///
    /// `false` when `uf` is no longer the selected state; the list is dropped
    pub fn set_cities(&mut self, uf: &str, cities: Vec<String>) -> bool {
        if self.selected_uf.as_deref() != Some(uf) {
            return false;
        }
        self.cities = Some(cities);
        true
    }

    pub fn cities(&self) -> Option<&[String]> {
        self.cities.as_deref()
    }

    /// Selects a city of the selected state
    ///
    /// Once a city list is loaded, only cities from it are accepted.
    pub fn select_city(&mut self, city: &str) -> Result<(), FormError> {
        let Some(uf) = &self.selected_uf else {
            return Err(FormError::NoUfSelected);
        };
        let city = city.trim();
        if let Some(cities) = &self.cities {
            if !cities.iter().any(|c| c == city) {
                return Err(FormError::UnknownCity {
                    city: city.to_string(),
                    uf: uf.clone(),
                });
            }
        }
        self.selected_city = Some(city.to_string());
        Ok(())
    }

    /// Adds the item when absent, removes it when present
    ///
    /// ### Returns
    ///
    /// Whether the item is selected afterwards
    pub fn toggle_item(&mut self, item_id: i32) -> bool {
        match self.items.iter().position(|&id| id == item_id) {
            Some(index) => {
                self.items.remove(index);
                false
            }
            None => {
                self.items.push(item_id);
                true
            }
        }
    }

    pub fn selected_items(&self) -> &[i32] {
        &self.items
    }

    pub fn attach_image(&mut self, path: PathBuf) {
        self.image = Some(path);
    }

    /// Builds the submission, reporting every missing piece at once
    pub fn submission(&self) -> Result<PointSubmission, FormError> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.email.is_empty() {
            missing.push("email");
        }
        if self.whatsapp.is_empty() {
            missing.push("whatsapp");
        }
        let position = self.position();
        if position.is_none() {
            missing.push("position");
        }
        if self.selected_uf.is_none() {
            missing.push("uf");
        }
        if self.selected_city.is_none() {
            missing.push("city");
        }
        if self.items.is_empty() {
            missing.push("items");
        }

        match (position, &self.selected_uf, &self.selected_city) {
            (Some((latitude, longitude)), Some(uf), Some(city)) if missing.is_empty() => {
                Ok(PointSubmission {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    whatsapp: self.whatsapp.clone(),
                    latitude,
                    longitude,
                    uf: uf.clone(),
                    city: city.clone(),
                    items: self.items.clone(),
                    image: self.image.clone(),
                })
            }
            _ => Err(FormError::Incomplete(missing)),
        }
    }
}
