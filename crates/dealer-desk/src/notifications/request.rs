use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inquiries::{Inquiry, InquiryDetails};

/// Wire shape of a relay invocation: the inquiry kind label plus flat string data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: BTreeMap<String, String>,
}

impl NotificationRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: impl ToString) {
        self.data.insert(key.to_string(), value.to_string());
    }

    fn set_opt<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }
}

impl From<&Inquiry> for NotificationRequest {
    fn from(inquiry: &Inquiry) -> Self {
        let mut request = NotificationRequest::new(inquiry.kind().label());
        request.set("name", &inquiry.contact.name);
        request.set("email", &inquiry.contact.email);
        request.set_opt("phone", inquiry.contact.phone.as_ref());

        match &inquiry.details {
            InquiryDetails::Quote(quote) => {
                request.set("motorhome", &quote.listing_title);
                request.set("listing_id", &quote.listing_id);
                request.set("message", &quote.message);
            }
            InquiryDetails::Contact(contact) => {
                request.set_opt("subject", contact.subject.as_ref());
                request.set("message", &contact.message);
            }
            InquiryDetails::Purchase(purchase) => {
                let vehicle = &purchase.vehicle;
                request.set("brand", &vehicle.brand);
                request.set("model", &vehicle.model);
                request.set_opt("year", vehicle.year);
                request.set_opt("mileage", vehicle.mileage);
                request.set_opt("fuel_type", vehicle.fuel_type.as_ref());
                request.set_opt("length_m", vehicle.length_m);
                request.set_opt("sleeps", vehicle.sleeps);
                request.set_opt("motor", vehicle.motor.as_ref());
                request.set_opt("transmission", vehicle.transmission.as_ref());
                request.set_opt("first_registration", vehicle.first_registration.as_ref());
                request.set_opt("horsepower", vehicle.horsepower);
                request.set_opt("options", vehicle.options.as_ref());
                request.set_opt("damage", vehicle.damage.as_ref());
                request.set_opt(
                    "immediately_available",
                    vehicle.immediately_available.as_ref(),
                );
                request.set_opt("description", vehicle.description.as_ref());
                request.set_opt("message", purchase.message.as_ref());
            }
            InquiryDetails::Montage(montage) => {
                request.set("service_type", montage.service_type.label());
                request.set_opt("motorhome_info", montage.motorhome_info.as_ref());
                request.set_opt("message", montage.message.as_ref());
                request.set_opt(
                    "preferred_date",
                    montage
                        .preferred_date
                        .map(|date| date.format("%Y-%m-%d").to_string()),
                );
                request.set_opt(
                    "preferred_time",
                    montage
                        .preferred_time
                        .map(|time| time.format("%H:%M").to_string()),
                );
            }
        }

        request
    }
}
