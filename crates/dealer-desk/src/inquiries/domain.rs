use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalogue::ListingId;
use crate::form::optional_text;

/// Identifier wrapper for persisted inquiries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryId(pub String);

impl InquiryId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl fmt::Display for InquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four public intake forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryKind {
    Quote,
    Contact,
    Purchase,
    Montage,
}

impl InquiryKind {
    pub const ALL: [InquiryKind; 4] = [
        InquiryKind::Quote,
        InquiryKind::Contact,
        InquiryKind::Purchase,
        InquiryKind::Montage,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            InquiryKind::Quote => "quote",
            InquiryKind::Contact => "contact",
            InquiryKind::Purchase => "purchase",
            InquiryKind::Montage => "montage",
        }
    }

    /// Backing table in the shared store.
    pub const fn table(self) -> &'static str {
        match self {
            InquiryKind::Quote => "quote_requests",
            InquiryKind::Contact => "contact_messages",
            InquiryKind::Purchase => "purchase_requests",
            InquiryKind::Montage => "montage_appointments",
        }
    }
}

impl fmt::Display for InquiryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown inquiry kind `{0}`")]
pub struct UnknownInquiryKind(pub String);

impl FromStr for InquiryKind {
    type Err = UnknownInquiryKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        InquiryKind::ALL
            .into_iter()
            .find(|kind| kind.label() == normalized)
            .ok_or_else(|| UnknownInquiryKind(value.to_string()))
    }
}

/// Installation services offered by the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Zonnepanelen & energiesystemen")]
    SolarAndEnergy,
    #[serde(rename = "Satelliet- & TV-installaties")]
    SatelliteAndTv,
    #[serde(rename = "Fietsendragers & accessoires")]
    BikeRacksAndAccessories,
    #[serde(rename = "Alarmsystemen & beveiliging")]
    AlarmAndSecurity,
    #[serde(rename = "Markiezen & luifels")]
    AwningsAndCanopies,
    #[serde(rename = "Verwarmingssystemen")]
    Heating,
    #[serde(rename = "Overig")]
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::SolarAndEnergy,
        ServiceType::SatelliteAndTv,
        ServiceType::BikeRacksAndAccessories,
        ServiceType::AlarmAndSecurity,
        ServiceType::AwningsAndCanopies,
        ServiceType::Heating,
        ServiceType::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::SolarAndEnergy => "Zonnepanelen & energiesystemen",
            ServiceType::SatelliteAndTv => "Satelliet- & TV-installaties",
            ServiceType::BikeRacksAndAccessories => "Fietsendragers & accessoires",
            ServiceType::AlarmAndSecurity => "Alarmsystemen & beveiliging",
            ServiceType::AwningsAndCanopies => "Markiezen & luifels",
            ServiceType::Heating => "Verwarmingssystemen",
            ServiceType::Other => "Overig",
        }
    }

    /// Case-insensitive lookup by catalogue label.
    pub fn from_label(value: &str) -> Option<Self> {
        let needle = value.trim();
        ServiceType::ALL
            .into_iter()
            .find(|service| service.label().eq_ignore_ascii_case(needle))
    }
}

/// Who submitted the inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Request for a price quote on a catalogue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDetails {
    pub listing_id: ListingId,
    /// Listing title captured at submission; survives deletion of the listing.
    pub listing_title: String,
    pub message: String,
}

/// General message from the contact page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessageDetails {
    pub subject: Option<String>,
    pub message: String,
}

/// A customer's own vehicle they would like the dealership to buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDescription {
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub mileage: Option<u32>,
    pub fuel_type: Option<String>,
    pub length_m: Option<f64>,
    pub sleeps: Option<u32>,
    pub motor: Option<String>,
    pub transmission: Option<String>,
    pub first_registration: Option<String>,
    pub horsepower: Option<u32>,
    pub options: Option<String>,
    pub damage: Option<String>,
    pub immediately_available: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDetails {
    pub vehicle: VehicleDescription,
    pub message: Option<String>,
}

/// Workshop appointment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MontageDetails {
    pub service_type: ServiceType,
    pub motorhome_info: Option<String>,
    pub message: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<NaiveTime>,
}

/// Variant-specific payload of an inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InquiryDetails {
    Quote(QuoteDetails),
    Contact(ContactMessageDetails),
    Purchase(PurchaseDetails),
    Montage(MontageDetails),
}

impl InquiryDetails {
    pub fn kind(&self) -> InquiryKind {
        match self {
            InquiryDetails::Quote(_) => InquiryKind::Quote,
            InquiryDetails::Contact(_) => InquiryKind::Contact,
            InquiryDetails::Purchase(_) => InquiryKind::Purchase,
            InquiryDetails::Montage(_) => InquiryKind::Montage,
        }
    }
}

/// A persisted customer inquiry. Never updated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    pub contact: ContactDetails,
    pub details: InquiryDetails,
    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn kind(&self) -> InquiryKind {
        self.details.kind()
    }
}

/// Flat form payload shared by all four intake forms. The inquiry kind decides which
/// fields are read; the rest are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InquirySubmission {
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub subject: Option<String>,
    #[serde(
        default,
        alias = "listingId",
        alias = "motorhome_id",
        deserialize_with = "optional_text"
    )]
    pub listing_id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub mileage: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub fuel_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub length_m: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub sleeps: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub motor: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub transmission: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub first_registration: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub horsepower: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub options: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub damage: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub immediately_available: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub service_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub motorhome_info: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub preferred_date: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub preferred_time: Option<String>,
}

/// Receipt returned to the submitter once the inquiry is durable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub inquiry_id: InquiryId,
    pub kind: InquiryKind,
    pub received_at: DateTime<Utc>,
}
