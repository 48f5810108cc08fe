use super::domain::{Listing, ListingFilter, ListingId};
use crate::store::RepositoryError;

/// Storage abstraction for the `motorhomes` table.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    /// Replace an existing row; `NotFound` when the id is unknown.
    fn update(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    /// Remove a row; `NotFound` when the id is unknown.
    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError>;
    /// Matching rows, newest first.
    fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RepositoryError>;
}
