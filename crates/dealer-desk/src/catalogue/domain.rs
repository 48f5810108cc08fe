use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::form::{self, optional_text};

/// Identifier wrapper for catalogue listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sale status of a listed vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Available,
        ListingStatus::Reserved,
        ListingStatus::Sold,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::Reserved => "reserved",
            ListingStatus::Sold => "sold",
        }
    }

    /// Customer-facing wording used on the site.
    pub const fn display_name(self) -> &'static str {
        match self {
            ListingStatus::Available => "Beschikbaar",
            ListingStatus::Reserved => "Gereserveerd",
            ListingStatus::Sold => "Verkocht",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ListingStatus::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| ValidationError::Unrecognised {
                field: "status",
                value: value.to_string(),
            })
    }
}

/// A vehicle offered for sale. Numeric attributes are `None` when unknown, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: Option<String>,
    /// Asking price in whole euros.
    pub price: Option<u32>,
    pub year: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub mileage: Option<u32>,
    pub fuel_type: Option<String>,
    pub length_m: Option<f64>,
    pub sleeps: Option<u32>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|images| images.first())
            .map(String::as_str)
    }
}

/// Admin form payload for creating or replacing a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingDraft {
    #[serde(default, deserialize_with = "optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub mileage: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub fuel_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub length_m: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub sleeps: Option<String>,
    /// Comma-separated feature tags, e.g. `"Airco, Zonnepaneel"`.
    #[serde(default, deserialize_with = "optional_text")]
    pub features: Option<String>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Validated listing attributes, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingAttributes {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<u32>,
    pub year: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub mileage: Option<u32>,
    pub fuel_type: Option<String>,
    pub length_m: Option<f64>,
    pub sleeps: Option<u32>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub status: ListingStatus,
}

impl ListingDraft {
    pub fn validate(self) -> Result<ListingAttributes, ValidationError> {
        let title = self
            .title
            .as_deref()
            .and_then(form::non_blank)
            .ok_or(ValidationError::Missing { field: "title" })?;

        let price = form::parse_non_negative(self.price.as_deref())
            .map_err(|problem| problem.for_field("price"))?;
        let year = form::parse_number::<i32>(self.year.as_deref())
            .map_err(|problem| problem.for_field("year"))?;
        let mileage = form::parse_non_negative(self.mileage.as_deref())
            .map_err(|problem| problem.for_field("mileage"))?;
        let length_m = form::parse_positive_decimal(self.length_m.as_deref())
            .map_err(|problem| problem.for_field("length_m"))?;
        let sleeps = form::parse_positive_count(self.sleeps.as_deref())
            .map_err(|problem| problem.for_field("sleeps"))?;

        let images: Vec<String> = self
            .images
            .iter()
            .filter_map(|image| form::non_blank(image))
            .collect();

        Ok(ListingAttributes {
            title,
            description: self.description,
            price,
            year,
            brand: self.brand,
            model: self.model,
            mileage,
            fuel_type: self.fuel_type,
            length_m,
            sleeps,
            images: if images.is_empty() { None } else { Some(images) },
            features: normalize_features(self.features.as_deref()),
            status: self.status.unwrap_or_default(),
        })
    }
}

impl ListingAttributes {
    pub fn into_listing(self, id: ListingId, created_at: DateTime<Utc>) -> Listing {
        Listing {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            year: self.year,
            brand: self.brand,
            model: self.model,
            mileage: self.mileage,
            fuel_type: self.fuel_type,
            length_m: self.length_m,
            sleeps: self.sleeps,
            images: self.images,
            features: self.features,
            status: self.status,
            created_at,
        }
    }
}

/// Split a comma-separated tag list, dropping blank entries. An empty result is `None`.
pub fn normalize_features(raw: Option<&str>) -> Option<Vec<String>> {
    let features: Vec<String> = raw?
        .split(',')
        .filter_map(form::non_blank)
        .collect();

    if features.is_empty() {
        None
    } else {
        Some(features)
    }
}

/// Narrowing applied to catalogue listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub status: Option<ListingStatus>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        self.status.map_or(true, |status| listing.status == status)
    }
}
