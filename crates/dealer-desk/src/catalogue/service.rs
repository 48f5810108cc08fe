use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Listing, ListingDraft, ListingFilter, ListingId, ListingStatus};
use super::repository::ListingRepository;
use crate::error::ValidationError;
use crate::store::RepositoryError;

/// Catalogue operations over a listing repository. Callers are responsible for
/// authorization; public code paths only use the read operations.
pub struct ListingService<L> {
    repository: Arc<L>,
}

impl<L> Clone for ListingService<L> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<L> ListingService<L>
where
    L: ListingRepository + 'static,
{
    pub fn new(repository: Arc<L>) -> Self {
        Self { repository }
    }

    pub fn create(&self, draft: ListingDraft) -> Result<Listing, CatalogueError> {
        let attributes = draft.validate()?;
        let listing = attributes.into_listing(ListingId::generate(), Utc::now());
        let stored = self.repository.insert(listing)?;
        info!(listing_id = %stored.id, status = stored.status.label(), "listing created");
        Ok(stored)
    }

    /// Replace every attribute of an existing listing. Identity and creation time are kept.
    pub fn update(&self, id: &ListingId, draft: ListingDraft) -> Result<Listing, CatalogueError> {
        let attributes = draft.validate()?;
        let existing = self.require(id)?;
        let replacement = attributes.into_listing(existing.id, existing.created_at);
        let stored = self
            .repository
            .update(replacement)
            .map_err(|err| not_found_as(err, id))?;
        info!(listing_id = %stored.id, "listing updated");
        Ok(stored)
    }

    pub fn set_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<Listing, CatalogueError> {
        let mut listing = self.require(id)?;
        let previous = listing.status;
        listing.status = status;
        let stored = self
            .repository
            .update(listing)
            .map_err(|err| not_found_as(err, id))?;
        info!(
            listing_id = %stored.id,
            from = previous.label(),
            to = status.label(),
            "listing status changed"
        );
        Ok(stored)
    }

    pub fn delete(&self, id: &ListingId) -> Result<(), CatalogueError> {
        self.repository
            .delete(id)
            .map_err(|err| not_found_as(err, id))?;
        info!(listing_id = %id, "listing deleted");
        Ok(())
    }

    pub fn get(&self, id: &ListingId) -> Result<Option<Listing>, CatalogueError> {
        Ok(self.repository.fetch(id)?)
    }

    pub fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, CatalogueError> {
        Ok(self.repository.list(filter)?)
    }

    fn require(&self, id: &ListingId) -> Result<Listing, CatalogueError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| CatalogueError::NotFound { id: id.clone() })
    }
}

fn not_found_as(err: RepositoryError, id: &ListingId) -> CatalogueError {
    match err {
        RepositoryError::NotFound => CatalogueError::NotFound { id: id.clone() },
        other => CatalogueError::Repository(other),
    }
}

/// Error raised by catalogue operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("listing `{id}` not found")]
    NotFound { id: ListingId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
