use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use super::domain::{Acknowledgement, Inquiry, InquiryId, InquiryKind, InquirySubmission};
use super::repository::InquiryRepository;
use super::validation::IntakeGuard;
use crate::catalogue::{ListingId, ListingRepository};
use crate::error::ValidationError;
use crate::notifications::{NotificationOutbox, NotificationRequest};
use crate::store::RepositoryError;

/// Service composing the intake guard, inquiry store, catalogue lookup and the
/// notification outbox.
pub struct InquiryIntakeService<I, L> {
    guard: Arc<IntakeGuard>,
    inquiries: Arc<I>,
    listings: Arc<L>,
    outbox: Arc<dyn NotificationOutbox>,
}

impl<I, L> InquiryIntakeService<I, L>
where
    I: InquiryRepository + 'static,
    L: ListingRepository + 'static,
{
    pub fn new(inquiries: Arc<I>, listings: Arc<L>, outbox: Arc<dyn NotificationOutbox>) -> Self {
        Self::with_guard(IntakeGuard::default(), inquiries, listings, outbox)
    }

    pub fn with_guard(
        guard: IntakeGuard,
        inquiries: Arc<I>,
        listings: Arc<L>,
        outbox: Arc<dyn NotificationOutbox>,
    ) -> Self {
        Self {
            guard: Arc::new(guard),
            inquiries,
            listings,
            outbox,
        }
    }

    /// Validate and persist a public submission, then hand the operator notification
    /// to the outbox. The acknowledgement depends only on persistence.
    pub fn submit(
        &self,
        kind: InquiryKind,
        submission: InquirySubmission,
    ) -> Result<Acknowledgement, IntakeError> {
        let now = Utc::now();

        let listing = match (kind, submission.listing_id.as_deref()) {
            (InquiryKind::Quote, Some(raw)) => self.listings.fetch(&ListingId(raw.to_string()))?,
            _ => None,
        };

        let (contact, details) =
            self.guard
                .validate(kind, submission, listing.as_ref(), now.year())?;

        let inquiry = Inquiry {
            id: InquiryId::generate(),
            contact,
            details,
            created_at: now,
        };

        let stored = self.inquiries.insert(inquiry)?;
        info!(
            inquiry_id = %stored.id,
            kind = kind.label(),
            table = kind.table(),
            "inquiry persisted"
        );

        if let Err(err) = self.outbox.enqueue(NotificationRequest::from(&stored)) {
            warn!(
                inquiry_id = %stored.id,
                kind = kind.label(),
                error = %err,
                "operator notification not queued"
            );
        }

        Ok(Acknowledgement {
            inquiry_id: stored.id,
            kind,
            received_at: stored.created_at,
        })
    }
}

/// Error raised by the intake service. Both variants are reported to the public
/// caller as a generic failure.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}
