use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::form::optional_text;

pub const PAGE_TITLE_MAX: usize = 60;
pub const META_DESCRIPTION_MAX: usize = 160;
pub const SITE_NAME: &str = "J&C Motorhomes";

/// Public pages that accept metadata overrides. Variants are declared in slug order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSlug {
    Aankoop,
    Contact,
    Diensten,
    Home,
    Montage,
    Motorhomes,
}

impl PageSlug {
    pub const ALL: [PageSlug; 6] = [
        PageSlug::Aankoop,
        PageSlug::Contact,
        PageSlug::Diensten,
        PageSlug::Home,
        PageSlug::Montage,
        PageSlug::Motorhomes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PageSlug::Aankoop => "aankoop",
            PageSlug::Contact => "contact",
            PageSlug::Diensten => "diensten",
            PageSlug::Home => "home",
            PageSlug::Montage => "montage",
            PageSlug::Motorhomes => "motorhomes",
        }
    }
}

impl fmt::Display for PageSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PageSlug {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        PageSlug::ALL
            .into_iter()
            .find(|slug| slug.label() == normalized)
            .ok_or_else(|| ValidationError::Unrecognised {
                field: "page_slug",
                value: value.to_string(),
            })
    }
}

/// Stored metadata override for one page. Absent fields fall back at resolve time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoOverride {
    pub slug: PageSlug,
    pub page_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    /// `None` until the page has been saved once.
    pub updated_at: Option<DateTime<Utc>>,
}

impl SeoOverride {
    pub fn empty(slug: PageSlug) -> Self {
        Self {
            slug,
            page_title: None,
            meta_description: None,
            og_title: None,
            og_description: None,
            og_image: None,
            updated_at: None,
        }
    }
}

/// Admin form payload; every field replaces the stored value, blanks clear it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoDraft {
    #[serde(default, deserialize_with = "optional_text")]
    pub page_title: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub og_title: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub og_description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub og_image: Option<String>,
}

impl SeoDraft {
    pub fn into_override(
        self,
        slug: PageSlug,
        updated_at: DateTime<Utc>,
    ) -> Result<SeoOverride, ValidationError> {
        check_length("page_title", self.page_title.as_deref(), PAGE_TITLE_MAX)?;
        check_length(
            "meta_description",
            self.meta_description.as_deref(),
            META_DESCRIPTION_MAX,
        )?;
        Ok(SeoOverride {
            slug,
            page_title: self.page_title,
            meta_description: self.meta_description,
            og_title: self.og_title,
            og_description: self.og_description,
            og_image: self.og_image,
            updated_at: Some(updated_at),
        })
    }
}

/// Length limits count characters, not bytes.
fn check_length(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(text) if text.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

/// Effective metadata for a page after applying fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSeo {
    pub slug: PageSlug,
    pub title: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

impl ResolvedSeo {
    pub fn resolve(
        slug: PageSlug,
        stored: Option<&SeoOverride>,
        fallback_title: Option<&str>,
        fallback_description: Option<&str>,
    ) -> Self {
        let title = stored
            .and_then(|seo| seo.page_title.clone())
            .or_else(|| fallback_title.map(str::to_string))
            .unwrap_or_else(|| SITE_NAME.to_string());
        let description = stored
            .and_then(|seo| seo.meta_description.clone())
            .or_else(|| fallback_description.map(str::to_string))
            .unwrap_or_default();

        Self {
            slug,
            og_title: stored
                .and_then(|seo| seo.og_title.clone())
                .unwrap_or_else(|| title.clone()),
            og_description: stored
                .and_then(|seo| seo.og_description.clone())
                .unwrap_or_else(|| description.clone()),
            og_image: stored.and_then(|seo| seo.og_image.clone()),
            title,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_parse_and_sort_alphabetically() {
        assert_eq!("Home".parse::<PageSlug>(), Ok(PageSlug::Home));
        assert!("blog".parse::<PageSlug>().is_err());

        let mut sorted = PageSlug::ALL.map(PageSlug::label).to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, PageSlug::ALL.map(PageSlug::label).to_vec());
    }

    #[test]
    fn title_limit_counts_characters() {
        let at_limit = SeoDraft {
            page_title: Some("é".repeat(PAGE_TITLE_MAX)),
            ..SeoDraft::default()
        };
        assert!(at_limit.into_override(PageSlug::Home, Utc::now()).is_ok());

        let over = SeoDraft {
            page_title: Some("a".repeat(PAGE_TITLE_MAX + 1)),
            ..SeoDraft::default()
        };
        assert_eq!(
            over.into_override(PageSlug::Home, Utc::now()),
            Err(ValidationError::TooLong {
                field: "page_title",
                max: PAGE_TITLE_MAX
            })
        );
    }

    #[test]
    fn description_limit_is_enforced() {
        let over = SeoDraft {
            meta_description: Some("x".repeat(META_DESCRIPTION_MAX + 1)),
            ..SeoDraft::default()
        };
        assert!(matches!(
            over.into_override(PageSlug::Contact, Utc::now()),
            Err(ValidationError::TooLong {
                field: "meta_description",
                ..
            })
        ));
    }

    #[test]
    fn resolve_without_override_uses_fallbacks() {
        let resolved = ResolvedSeo::resolve(PageSlug::Montage, None, None, None);
        assert_eq!(resolved.title, SITE_NAME);
        assert_eq!(resolved.description, "");
        assert_eq!(resolved.og_title, SITE_NAME);
        assert_eq!(resolved.og_image, None);

        let resolved = ResolvedSeo::resolve(
            PageSlug::Montage,
            None,
            Some("Montage | J&C"),
            Some("Zonnepanelen en meer"),
        );
        assert_eq!(resolved.title, "Montage | J&C");
        assert_eq!(resolved.og_description, "Zonnepanelen en meer");
    }

    #[test]
    fn og_fields_fall_back_to_effective_title_and_description() {
        let stored = SeoOverride {
            page_title: Some("Aanbod campers".to_string()),
            meta_description: Some("Tweedehands motorhomes".to_string()),
            og_image: Some("https://cdn.example/og.jpg".to_string()),
            ..SeoOverride::empty(PageSlug::Motorhomes)
        };

        let resolved =
            ResolvedSeo::resolve(PageSlug::Motorhomes, Some(&stored), Some("ignored"), None);
        assert_eq!(resolved.title, "Aanbod campers");
        assert_eq!(resolved.og_title, "Aanbod campers");
        assert_eq!(resolved.og_description, "Tweedehands motorhomes");
        assert_eq!(resolved.og_image.as_deref(), Some("https://cdn.example/og.jpg"));
    }
}
