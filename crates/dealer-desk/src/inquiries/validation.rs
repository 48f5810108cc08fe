use chrono::{NaiveDate, NaiveTime};

use super::domain::{
    ContactDetails, ContactMessageDetails, InquiryDetails, InquiryKind, InquirySubmission,
    MontageDetails, PurchaseDetails, QuoteDetails, ServiceType, VehicleDescription,
};
use crate::catalogue::{Listing, ListingId};
use crate::error::ValidationError;
use crate::form;

const DEFAULT_EARLIEST_PURCHASE_YEAR: i32 = 2000;

/// Policy dials for intake validation.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    earliest_purchase_year: i32,
}

impl IntakePolicy {
    pub fn new(earliest_purchase_year: i32) -> Self {
        Self {
            earliest_purchase_year,
        }
    }

    pub fn earliest_purchase_year(&self) -> i32 {
        self.earliest_purchase_year
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EARLIEST_PURCHASE_YEAR)
    }
}

/// Structural validation of public form submissions.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Validate a submission for `kind`.
    ///
    /// `listing` is the catalogue row named by `listing_id`, looked up by the caller;
    /// it is only consulted for quotes. `current_year` bounds purchase vehicle years.
    pub fn validate(
        &self,
        kind: InquiryKind,
        submission: InquirySubmission,
        listing: Option<&Listing>,
        current_year: i32,
    ) -> Result<(ContactDetails, InquiryDetails), ValidationError> {
        let name = required(submission.name, "name")?;
        let email = required(submission.email, "email")?;
        validate_email(&email)?;

        let (phone, details) = match kind {
            InquiryKind::Quote => {
                let phone = required(submission.phone, "phone")?;
                let message = required(submission.message, "message")?;
                let listing_id = required(submission.listing_id, "listing_id")?;
                let listing = listing
                    .filter(|listing| listing.id.0 == listing_id)
                    .ok_or(ValidationError::UnknownReference {
                        field: "listing_id",
                    })?;

                let details = InquiryDetails::Quote(QuoteDetails {
                    listing_id: ListingId(listing_id),
                    listing_title: listing.title.clone(),
                    message,
                });
                (Some(phone), details)
            }
            InquiryKind::Contact => {
                let message = required(submission.message, "message")?;
                let details = InquiryDetails::Contact(ContactMessageDetails {
                    subject: submission.subject,
                    message,
                });
                (submission.phone, details)
            }
            InquiryKind::Purchase => {
                let brand = required(submission.brand, "brand")?;
                let model = required(submission.model, "model")?;
                let year = self.purchase_year(submission.year.as_deref(), current_year)?;

                let vehicle = VehicleDescription {
                    brand,
                    model,
                    year,
                    mileage: form::parse_non_negative(submission.mileage.as_deref())
                        .map_err(|problem| problem.for_field("mileage"))?,
                    fuel_type: submission.fuel_type,
                    length_m: form::parse_positive_decimal(submission.length_m.as_deref())
                        .map_err(|problem| problem.for_field("length_m"))?,
                    sleeps: form::parse_positive_count(submission.sleeps.as_deref())
                        .map_err(|problem| problem.for_field("sleeps"))?,
                    motor: submission.motor,
                    transmission: submission.transmission,
                    first_registration: submission.first_registration,
                    horsepower: form::parse_positive_count(submission.horsepower.as_deref())
                        .map_err(|problem| problem.for_field("horsepower"))?,
                    options: submission.options,
                    damage: submission.damage,
                    immediately_available: submission.immediately_available,
                    description: submission.description,
                };
                let details = InquiryDetails::Purchase(PurchaseDetails {
                    vehicle,
                    message: submission.message,
                });
                (submission.phone, details)
            }
            InquiryKind::Montage => {
                let phone = required(submission.phone, "phone")?;
                let raw_service = required(submission.service_type, "service_type")?;
                let service_type = ServiceType::from_label(&raw_service).ok_or(
                    ValidationError::Unrecognised {
                        field: "service_type",
                        value: raw_service,
                    },
                )?;

                let details = InquiryDetails::Montage(MontageDetails {
                    service_type,
                    motorhome_info: submission.motorhome_info,
                    message: submission.message,
                    preferred_date: parse_date(submission.preferred_date.as_deref())?,
                    preferred_time: parse_time(submission.preferred_time.as_deref())?,
                });
                (Some(phone), details)
            }
        };

        Ok((ContactDetails { name, email, phone }, details))
    }

    /// A supplied year must fall within `[earliest, current_year]`; an omitted year stays unknown.
    fn purchase_year(
        &self,
        raw: Option<&str>,
        current_year: i32,
    ) -> Result<Option<i32>, ValidationError> {
        let year = form::parse_number::<i32>(raw).map_err(|problem| problem.for_field("year"))?;
        match year {
            Some(value) if value < self.policy.earliest_purchase_year || value > current_year => {
                Err(ValidationError::OutOfRange { field: "year" })
            }
            other => Ok(other),
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .as_deref()
        .and_then(form::non_blank)
        .ok_or(ValidationError::Missing { field })
}

/// Shape check only: one `@`, something on both sides, and a dot in the domain.
fn validate_email(email: &str) -> Result<(), ValidationError> {
    let malformed = ValidationError::Malformed { field: "email" };
    let (local, domain) = email.split_once('@').ok_or(malformed.clone())?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(malformed);
    }
    Ok(())
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::Malformed {
                field: "preferred_date",
            }
        })
    })
    .transpose()
}

fn parse_time(raw: Option<&str>) -> Result<Option<NaiveTime>, ValidationError> {
    raw.map(|value| {
        let value = value.trim();
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .map_err(|_| ValidationError::Malformed {
                field: "preferred_time",
            })
    })
    .transpose()
}
