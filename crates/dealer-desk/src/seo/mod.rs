//! Per-page search metadata overrides and the public resolution endpoint.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    PageSlug, ResolvedSeo, SeoDraft, SeoOverride, META_DESCRIPTION_MAX, PAGE_TITLE_MAX, SITE_NAME,
};
pub use repository::SeoRepository;
pub use router::seo_router;
pub use service::{SeoError, SeoService};
