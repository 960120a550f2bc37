use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{trim_in_place, trim_optional, ValidationError};

pub const DEFAULT_CITY: &str = "Hyderabad";
pub const DEFAULT_STATUS: &str = "available";

/// Listing held in the `property` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Property {
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "must be zero or greater"))]
    pub price_in_inr: i64,
    /// Locality or area within the city.
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "must be zero or greater"))]
    pub bedrooms: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must be zero or greater"))]
    pub bathrooms: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must be zero or greater"))]
    pub area_sqft: Option<i64>,
    /// Free-form category such as Apartment, Villa, Plot or Commercial.
    #[validate(length(min = 1, message = "is required"))]
    pub property_type: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// One of available, booked or sold; not enforced.
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl Property {
    /// Trims text fields, restores defaults for blank ones and checks every constraint.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.location);
        trim_in_place(&mut self.property_type);
        trim_in_place(&mut self.city);
        trim_in_place(&mut self.status);
        if self.city.is_empty() {
            self.city = default_city();
        }
        if self.status.is_empty() {
            self.status = default_status();
        }
        self.description = trim_optional(self.description.take());
        self.image_url = trim_optional(self.image_url.take());
        self.amenities = std::mem::take(&mut self.amenities)
            .into_iter()
            .filter_map(|amenity| trim_optional(Some(amenity)))
            .collect();

        self.validate()
            .map_err(|errors| ValidationError::from_validator("property", &errors))?;
        Ok(self)
    }
}
