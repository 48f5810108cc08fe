use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{PageSlug, ResolvedSeo, SeoDraft, SeoOverride};
use super::repository::SeoRepository;
use crate::error::ValidationError;
use crate::store::RepositoryError;

pub struct SeoService<S> {
    repository: Arc<S>,
}

impl<S> Clone for SeoService<S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<S> SeoService<S>
where
    S: SeoRepository + 'static,
{
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    pub fn get(&self, slug: PageSlug) -> Result<Option<SeoOverride>, SeoError> {
        Ok(self.repository.fetch(slug)?)
    }

    /// One entry per known page in slug order; pages never saved come back empty.
    pub fn list(&self) -> Result<Vec<SeoOverride>, SeoError> {
        let stored = self.repository.list()?;
        Ok(PageSlug::ALL
            .into_iter()
            .map(|slug| {
                stored
                    .iter()
                    .find(|record| record.slug == slug)
                    .cloned()
                    .unwrap_or_else(|| SeoOverride::empty(slug))
            })
            .collect())
    }

    pub fn update(&self, slug: PageSlug, draft: SeoDraft) -> Result<SeoOverride, SeoError> {
        let record = draft.into_override(slug, Utc::now())?;
        let stored = self.repository.upsert(record)?;
        info!(slug = slug.label(), "seo override saved");
        Ok(stored)
    }

    pub fn resolve(
        &self,
        slug: PageSlug,
        fallback_title: Option<&str>,
        fallback_description: Option<&str>,
    ) -> Result<ResolvedSeo, SeoError> {
        let stored = self.repository.fetch(slug)?;
        Ok(ResolvedSeo::resolve(
            slug,
            stored.as_ref(),
            fallback_title,
            fallback_description,
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySeoRepository;

    fn service() -> SeoService<MemorySeoRepository> {
        SeoService::new(Arc::new(MemorySeoRepository::default()))
    }

    #[test]
    fn list_covers_every_page_in_slug_order() {
        let service = service();
        service
            .update(
                PageSlug::Home,
                SeoDraft {
                    page_title: Some("Motorhomes in Limburg".to_string()),
                    ..SeoDraft::default()
                },
            )
            .expect("update succeeds");

        let listed = service.list().expect("list succeeds");
        let slugs: Vec<PageSlug> = listed.iter().map(|record| record.slug).collect();
        assert_eq!(slugs, PageSlug::ALL.to_vec());

        let home = listed
            .iter()
            .find(|record| record.slug == PageSlug::Home)
            .expect("home listed");
        assert_eq!(home.page_title.as_deref(), Some("Motorhomes in Limburg"));
        assert!(home.updated_at.is_some());
        let contact = listed
            .iter()
            .find(|record| record.slug == PageSlug::Contact)
            .expect("contact listed");
        assert!(contact.updated_at.is_none());
    }

    #[test]
    fn rejected_update_keeps_previous_values() {
        let service = service();
        service
            .update(
                PageSlug::Diensten,
                SeoDraft {
                    page_title: Some("Diensten".to_string()),
                    ..SeoDraft::default()
                },
            )
            .expect("update succeeds");

        let result = service.update(
            PageSlug::Diensten,
            SeoDraft {
                page_title: Some("t".repeat(61)),
                ..SeoDraft::default()
            },
        );
        assert!(matches!(result, Err(SeoError::Validation(_))));

        let stored = service
            .get(PageSlug::Diensten)
            .expect("fetch succeeds")
            .expect("row present");
        assert_eq!(stored.page_title.as_deref(), Some("Diensten"));
    }

    #[test]
    fn resolve_reads_the_stored_override() {
        let service = service();
        service
            .update(
                PageSlug::Aankoop,
                SeoDraft {
                    meta_description: Some("Wij kopen uw camper".to_string()),
                    ..SeoDraft::default()
                },
            )
            .expect("update succeeds");

        let resolved = service
            .resolve(PageSlug::Aankoop, Some("Camper verkopen"), None)
            .expect("resolve succeeds");
        assert_eq!(resolved.title, "Camper verkopen");
        assert_eq!(resolved.description, "Wij kopen uw camper");
        assert_eq!(resolved.og_description, "Wij kopen uw camper");
    }
}
