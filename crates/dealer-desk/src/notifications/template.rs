use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::relay::DispatchError;
use crate::inquiries::InquiryKind;

/// Subject line and HTML body of an operator e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub subject: String,
    pub html: String,
}

struct Field {
    key: &'static str,
    label: &'static str,
    required: bool,
}

const fn required(key: &'static str, label: &'static str) -> Field {
    Field {
        key,
        label,
        required: true,
    }
}

const fn optional(key: &'static str, label: &'static str) -> Field {
    Field {
        key,
        label,
        required: false,
    }
}

const QUOTE_FIELDS: &[Field] = &[
    required("name", "Naam"),
    required("email", "E-mail"),
    optional("phone", "Telefoon"),
    optional("motorhome", "Motorhome"),
    optional("listing_id", "Referentie"),
    optional("message", "Bericht"),
];

const CONTACT_FIELDS: &[Field] = &[
    required("name", "Naam"),
    required("email", "E-mail"),
    optional("phone", "Telefoon"),
    optional("subject", "Onderwerp"),
    required("message", "Bericht"),
];

const PURCHASE_FIELDS: &[Field] = &[
    required("name", "Naam"),
    required("email", "E-mail"),
    optional("phone", "Telefoon"),
    required("brand", "Merk"),
    required("model", "Model"),
    optional("year", "Bouwjaar"),
    optional("motor", "Motor"),
    optional("transmission", "Transmissie"),
    optional("mileage", "Kilometerstand"),
    optional("first_registration", "1ste inschrijving"),
    optional("horsepower", "Hoeveel PK"),
    optional("fuel_type", "Brandstof"),
    optional("sleeps", "Slaapplaatsen"),
    optional("length_m", "Lengte (m)"),
    optional("immediately_available", "Onmiddellijk leverbaar"),
    optional("options", "Eventuele opties"),
    optional("damage", "Schade"),
    optional("description", "Beschrijving"),
    optional("message", "Extra bericht"),
];

const MONTAGE_FIELDS: &[Field] = &[
    required("name", "Naam"),
    required("email", "E-mail"),
    optional("phone", "Telefoon"),
    required("service_type", "Type dienst"),
    optional("preferred_date", "Voorkeursdatum"),
    optional("preferred_time", "Voorkeurstijd"),
    optional("motorhome_info", "Motorhome info"),
    optional("message", "Bericht"),
];

/// Render the operator e-mail for one inquiry kind.
///
/// Required fields must be present and non-blank; optional fields are rendered only when
/// they carry a value. Every value is HTML-escaped.
pub fn render(
    kind: InquiryKind,
    data: &BTreeMap<String, String>,
) -> Result<RenderedNotification, DispatchError> {
    let (subject_prefix, heading, fields) = match kind {
        InquiryKind::Quote => (
            "Nieuwe offerte-aanvraag van",
            "Nieuwe offerte-aanvraag",
            QUOTE_FIELDS,
        ),
        InquiryKind::Contact => (
            "Nieuw contactbericht van",
            "Nieuw contactbericht",
            CONTACT_FIELDS,
        ),
        InquiryKind::Purchase => (
            "Nieuwe aankoopaanvraag van",
            "Nieuwe aankoopaanvraag (camper verkoop)",
            PURCHASE_FIELDS,
        ),
        InquiryKind::Montage => (
            "Nieuwe montage-afspraak van",
            "Nieuwe montage-afspraak",
            MONTAGE_FIELDS,
        ),
    };

    let mut html = String::new();
    writeln!(html, "<h2>{}</h2>", escape_html(heading)).expect("heading");
    for field in fields {
        match present(data, field.key) {
            Some(value) => {
                writeln!(
                    html,
                    "<p><strong>{}:</strong> {}</p>",
                    field.label,
                    escape_html(value)
                )
                .expect("field paragraph");
            }
            None if field.required => {
                return Err(DispatchError::MissingField {
                    kind: kind.label(),
                    field: field.key,
                });
            }
            None => {}
        }
    }

    // Subjects are plain text; only the body is HTML.
    let name = present(data, "name").unwrap_or_default();
    Ok(RenderedNotification {
        subject: format!("{subject_prefix} {name}"),
        html,
    })
}

fn present<'a>(data: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    data.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
