use super::domain::{PageSlug, SeoOverride};
use crate::store::RepositoryError;

/// Storage for SEO overrides, one row per page slug.
pub trait SeoRepository: Send + Sync {
    fn fetch(&self, slug: PageSlug) -> Result<Option<SeoOverride>, RepositoryError>;
    /// Insert or replace the row for `record.slug`.
    fn upsert(&self, record: SeoOverride) -> Result<SeoOverride, RepositoryError>;
    /// Stored rows ordered by slug.
    fn list(&self) -> Result<Vec<SeoOverride>, RepositoryError>;
}
