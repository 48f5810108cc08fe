//! Public inquiry intake: quote requests, contact messages, purchase offers and
//! workshop appointments, validated against one schema discipline and persisted
//! before the operator is notified.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Acknowledgement, ContactDetails, ContactMessageDetails, Inquiry, InquiryDetails, InquiryId,
    InquiryKind, InquirySubmission, MontageDetails, PurchaseDetails, QuoteDetails, ServiceType,
    UnknownInquiryKind, VehicleDescription,
};
pub use repository::InquiryRepository;
pub use router::inquiry_router;
pub use service::{InquiryIntakeService, IntakeError};
pub use validation::{IntakeGuard, IntakePolicy};
