//! Vehicle catalogue: listing records, their admin-side lifecycle and the public read routes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    normalize_features, Listing, ListingAttributes, ListingDraft, ListingFilter, ListingId,
    ListingStatus,
};
pub use repository::ListingRepository;
pub use router::catalogue_router;
pub use service::{CatalogueError, ListingService};
