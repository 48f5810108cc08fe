use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::catalogue::{Listing, ListingId, ListingRepository, ListingStatus};
use crate::inquiries::{
    inquiry_router, Inquiry, InquiryId, InquiryIntakeService, InquiryKind, InquiryRepository,
    InquirySubmission,
};
use crate::notifications::{NotificationOutbox, NotificationRequest, OutboxError};
use crate::store::{MemoryInquiryRepository, MemoryListingRepository, RepositoryError};

pub(super) type MemoryIntake = InquiryIntakeService<MemoryInquiryRepository, MemoryListingRepository>;

/// Outbox that records requests instead of delivering them.
#[derive(Default)]
pub(super) struct RecordingOutbox {
    requests: Mutex<Vec<NotificationRequest>>,
}

impl RecordingOutbox {
    pub(super) fn requests(&self) -> Vec<NotificationRequest> {
        self.requests.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationOutbox for RecordingOutbox {
    fn enqueue(&self, request: NotificationRequest) -> Result<(), OutboxError> {
        self.requests
            .lock()
            .expect("outbox mutex poisoned")
            .push(request);
        Ok(())
    }
}

/// Outbox whose worker has gone away.
pub(super) struct ClosedOutbox;

impl NotificationOutbox for ClosedOutbox {
    fn enqueue(&self, _request: NotificationRequest) -> Result<(), OutboxError> {
        Err(OutboxError::Closed)
    }
}

pub(super) struct UnavailableInquiries;

impl InquiryRepository for UnavailableInquiries {
    fn insert(&self, _inquiry: Inquiry) -> Result<Inquiry, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn fetch(&self, _kind: InquiryKind, _id: &InquiryId) -> Result<Option<Inquiry>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn list(&self, _kind: InquiryKind) -> Result<Vec<Inquiry>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn delete(&self, _kind: InquiryKind, _id: &InquiryId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) const LISTING_TITLE: &str = "Hymer B-Klasse MasterLine 780";

pub(super) fn listing(id: &str, title: &str) -> Listing {
    Listing {
        id: ListingId(id.to_string()),
        title: title.to_string(),
        description: None,
        price: Some(89500),
        year: Some(2021),
        brand: Some("Hymer".to_string()),
        model: None,
        mileage: None,
        fuel_type: None,
        length_m: None,
        sleeps: None,
        images: None,
        features: None,
        status: ListingStatus::Available,
        created_at: Utc::now(),
    }
}

pub(super) fn seeded_listings() -> Arc<MemoryListingRepository> {
    let listings = Arc::new(MemoryListingRepository::default());
    listings
        .insert(listing("L1", LISTING_TITLE))
        .expect("seed listing");
    listings
}

pub(super) fn build_service() -> (
    MemoryIntake,
    Arc<MemoryInquiryRepository>,
    Arc<MemoryListingRepository>,
    Arc<RecordingOutbox>,
) {
    let inquiries = Arc::new(MemoryInquiryRepository::default());
    let listings = seeded_listings();
    let outbox = Arc::new(RecordingOutbox::default());
    let service = InquiryIntakeService::new(inquiries.clone(), listings.clone(), outbox.clone());
    (service, inquiries, listings, outbox)
}

pub(super) fn intake_router(service: MemoryIntake) -> axum::Router {
    inquiry_router(Arc::new(service))
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub(super) fn quote_submission() -> InquirySubmission {
    InquirySubmission {
        name: text("Jan"),
        email: text("jan@x.be"),
        phone: text("0470000000"),
        message: text("Interesse"),
        listing_id: text("L1"),
        ..InquirySubmission::default()
    }
}

pub(super) fn contact_submission() -> InquirySubmission {
    InquirySubmission {
        name: text("Sofie Claes"),
        email: text("sofie@voorbeeld.be"),
        message: text("Zijn jullie op zaterdag open?"),
        ..InquirySubmission::default()
    }
}

pub(super) fn purchase_submission() -> InquirySubmission {
    InquirySubmission {
        name: text("Pieter Maes"),
        email: text("pieter@voorbeeld.be"),
        brand: text("Knaus"),
        model: text("Sky TI 650"),
        ..InquirySubmission::default()
    }
}

pub(super) fn montage_submission() -> InquirySubmission {
    InquirySubmission {
        name: text("An Willems"),
        email: text("an@voorbeeld.be"),
        phone: text("0478123456"),
        service_type: text("Zonnepanelen & energiesystemen"),
        ..InquirySubmission::default()
    }
}

pub(super) fn submission_for(kind: InquiryKind) -> InquirySubmission {
    match kind {
        InquiryKind::Quote => quote_submission(),
        InquiryKind::Contact => contact_submission(),
        InquiryKind::Purchase => purchase_submission(),
        InquiryKind::Montage => montage_submission(),
    }
}

/// Clear one named form field.
pub(super) fn without(mut submission: InquirySubmission, field: &str) -> InquirySubmission {
    match field {
        "name" => submission.name = None,
        "email" => submission.email = None,
        "phone" => submission.phone = None,
        "message" => submission.message = None,
        "listing_id" => submission.listing_id = None,
        "brand" => submission.brand = None,
        "model" => submission.model = None,
        "service_type" => submission.service_type = None,
        other => panic!("fixture does not know field {other}"),
    }
    submission
}

pub(super) fn total_rows(repository: &MemoryInquiryRepository) -> usize {
    InquiryKind::ALL
        .into_iter()
        .map(|kind| repository.count(kind).expect("count succeeds"))
        .sum()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
