use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::session::{SessionContext, Unauthorized};
use crate::catalogue::{
    CatalogueError, Listing, ListingDraft, ListingFilter, ListingId, ListingRepository,
    ListingService, ListingStatus,
};
use crate::error::ValidationError;
use crate::images::{object_name_for, ImageStore, ImageStoreError, StoredImage};
use crate::inquiries::{Inquiry, InquiryId, InquiryKind, InquiryRepository};
use crate::seo::{PageSlug, SeoDraft, SeoError, SeoOverride, SeoRepository, SeoService};
use crate::store::RepositoryError;

/// Stores the console operates on.
pub struct AdminBackend<L, I, S> {
    pub listings: ListingService<L>,
    pub inquiries: Arc<I>,
    pub seo: SeoService<S>,
    pub images: Arc<dyn ImageStore>,
}

impl<L, I, S> Clone for AdminBackend<L, I, S> {
    fn clone(&self) -> Self {
        Self {
            listings: self.listings.clone(),
            inquiries: self.inquiries.clone(),
            seo: self.seo.clone(),
            images: self.images.clone(),
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub listings: usize,
    pub listings_by_status: BTreeMap<ListingStatus, usize>,
    pub inquiries: BTreeMap<InquiryKind, usize>,
}

/// Authenticated operator surface over the catalogue, inquiry, SEO and image stores.
/// Every operation checks the session first.
pub struct AdminConsole<L, I, S> {
    session: SessionContext,
    backend: AdminBackend<L, I, S>,
}

impl<L, I, S> AdminConsole<L, I, S>
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    pub fn new(session: SessionContext, backend: AdminBackend<L, I, S>) -> Self {
        Self { session, backend }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Mount-time check: succeeds only while a live session is present.
    pub fn authorize(&self) -> Result<(), AdminError> {
        self.session.require()?;
        Ok(())
    }

    pub fn overview(&self) -> Result<AdminOverview, AdminError> {
        self.session.require()?;
        let listings = self.backend.listings.list(&ListingFilter::default())?;
        let mut listings_by_status: BTreeMap<ListingStatus, usize> =
            ListingStatus::ALL.into_iter().map(|status| (status, 0)).collect();
        for listing in &listings {
            *listings_by_status.entry(listing.status).or_default() += 1;
        }

        let mut inquiries = BTreeMap::new();
        for kind in InquiryKind::ALL {
            inquiries.insert(kind, self.backend.inquiries.count(kind)?);
        }

        Ok(AdminOverview {
            listings: listings.len(),
            listings_by_status,
            inquiries,
        })
    }

    pub fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<Listing>, AdminError> {
        self.session.require()?;
        Ok(self.backend.listings.list(filter)?)
    }

    pub fn get_listing(&self, id: &ListingId) -> Result<Listing, AdminError> {
        self.session.require()?;
        self.backend
            .listings
            .get(id)?
            .ok_or_else(|| AdminError::NotFound {
                entity: "listing",
                id: id.to_string(),
            })
    }

    pub fn create_listing(&self, draft: ListingDraft) -> Result<Listing, AdminError> {
        let session = self.session.require()?;
        let listing = self.backend.listings.create(draft)?;
        info!(operator = %session.subject, listing_id = %listing.id, "admin created listing");
        Ok(listing)
    }

    pub fn update_listing(&self, id: &ListingId, draft: ListingDraft) -> Result<Listing, AdminError> {
        let session = self.session.require()?;
        let listing = self.backend.listings.update(id, draft)?;
        info!(operator = %session.subject, listing_id = %id, "admin updated listing");
        Ok(listing)
    }

    pub fn set_listing_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<Listing, AdminError> {
        self.session.require()?;
        Ok(self.backend.listings.set_status(id, status)?)
    }

    pub fn delete_listing(&self, id: &ListingId) -> Result<(), AdminError> {
        let session = self.session.require()?;
        self.backend.listings.delete(id)?;
        info!(operator = %session.subject, listing_id = %id, "admin deleted listing");
        Ok(())
    }

    pub fn list_inquiries(&self, kind: InquiryKind) -> Result<Vec<Inquiry>, AdminError> {
        self.session.require()?;
        Ok(self.backend.inquiries.list(kind)?)
    }

    pub fn delete_inquiry(&self, kind: InquiryKind, id: &InquiryId) -> Result<(), AdminError> {
        let session = self.session.require()?;
        self.backend
            .inquiries
            .delete(kind, id)
            .map_err(|err| match err {
                RepositoryError::NotFound => AdminError::NotFound {
                    entity: kind.label(),
                    id: id.to_string(),
                },
                other => AdminError::Repository(other),
            })?;
        info!(
            operator = %session.subject,
            kind = kind.label(),
            inquiry_id = %id,
            "admin deleted inquiry"
        );
        Ok(())
    }

    /// Store a listing photo under a generated name and return its public URL.
    pub async fn upload_image(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, AdminError> {
        self.session.require()?;
        if bytes.is_empty() {
            return Err(ValidationError::Missing { field: "image" }.into());
        }
        let (object_name, content_type) = object_name_for(filename)?;
        let stored = self
            .backend
            .images
            .put(&object_name, bytes, content_type.as_ref())
            .await?;
        Ok(stored)
    }

    pub fn list_seo(&self) -> Result<Vec<SeoOverride>, AdminError> {
        self.session.require()?;
        Ok(self.backend.seo.list()?)
    }

    pub fn update_seo(&self, slug: PageSlug, draft: SeoDraft) -> Result<SeoOverride, AdminError> {
        let session = self.session.require()?;
        let stored = self.backend.seo.update(slug, draft)?;
        info!(operator = %session.subject, slug = slug.label(), "admin updated seo");
        Ok(stored)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("image storage failed: {0}")]
    Images(#[source] ImageStoreError),
}

impl From<CatalogueError> for AdminError {
    fn from(value: CatalogueError) -> Self {
        match value {
            CatalogueError::Validation(err) => Self::Validation(err),
            CatalogueError::NotFound { id } => Self::NotFound {
                entity: "listing",
                id: id.to_string(),
            },
            CatalogueError::Repository(err) => Self::Repository(err),
        }
    }
}

impl From<SeoError> for AdminError {
    fn from(value: SeoError) -> Self {
        match value {
            SeoError::Validation(err) => Self::Validation(err),
            SeoError::Repository(err) => Self::Repository(err),
        }
    }
}

impl From<ImageStoreError> for AdminError {
    fn from(value: ImageStoreError) -> Self {
        match value {
            ImageStoreError::Validation(err) => Self::Validation(err),
            other => Self::Images(other),
        }
    }
}
