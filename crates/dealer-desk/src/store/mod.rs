//! Persistence boundary shared by the catalogue, inquiry and SEO repositories.

pub mod memory;

pub use memory::{MemoryInquiryRepository, MemoryListingRepository, MemorySeoRepository};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
