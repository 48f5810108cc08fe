use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use super::RepositoryError;
use crate::catalogue::{Listing, ListingFilter, ListingId, ListingRepository};
use crate::inquiries::{Inquiry, InquiryId, InquiryKind, InquiryRepository};
use crate::seo::{PageSlug, SeoOverride, SeoRepository};

/// Listings kept in insertion order behind a mutex.
#[derive(Default, Clone)]
pub struct MemoryListingRepository {
    rows: Arc<Mutex<Vec<Listing>>>,
}

impl ListingRepository for MemoryListingRepository {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.rows.lock().expect("listing mutex poisoned");
        if guard.iter().any(|row| row.id == listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(listing.clone());
        Ok(listing)
    }

    fn update(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.rows.lock().expect("listing mutex poisoned");
        let row = guard
            .iter_mut()
            .find(|row| row.id == listing.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = listing.clone();
        Ok(listing)
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let guard = self.rows.lock().expect("listing mutex poisoned");
        Ok(guard.iter().find(|row| &row.id == id).cloned())
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("listing mutex poisoned");
        let before = guard.len();
        guard.retain(|row| &row.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.rows.lock().expect("listing mutex poisoned");
        // Reverse first so equal timestamps keep the latest insertion on top.
        let mut rows: Vec<Listing> = guard
            .iter()
            .rev()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// One vector per inquiry table.
#[derive(Default, Clone)]
pub struct MemoryInquiryRepository {
    tables: Arc<Mutex<HashMap<InquiryKind, Vec<Inquiry>>>>,
}

impl InquiryRepository for MemoryInquiryRepository {
    fn insert(&self, inquiry: Inquiry) -> Result<Inquiry, RepositoryError> {
        let mut guard = self.tables.lock().expect("inquiry mutex poisoned");
        let table = guard.entry(inquiry.kind()).or_default();
        if table.iter().any(|row| row.id == inquiry.id) {
            return Err(RepositoryError::Conflict);
        }
        table.push(inquiry.clone());
        Ok(inquiry)
    }

    fn fetch(&self, kind: InquiryKind, id: &InquiryId) -> Result<Option<Inquiry>, RepositoryError> {
        let guard = self.tables.lock().expect("inquiry mutex poisoned");
        Ok(guard
            .get(&kind)
            .and_then(|table| table.iter().find(|row| &row.id == id))
            .cloned())
    }

    fn list(&self, kind: InquiryKind) -> Result<Vec<Inquiry>, RepositoryError> {
        let guard = self.tables.lock().expect("inquiry mutex poisoned");
        let mut rows: Vec<Inquiry> = guard
            .get(&kind)
            .map(|table| table.iter().rev().cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn delete(&self, kind: InquiryKind, id: &InquiryId) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("inquiry mutex poisoned");
        let table = guard.get_mut(&kind).ok_or(RepositoryError::NotFound)?;
        let before = table.len();
        table.retain(|row| &row.id != id);
        if table.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn count(&self, kind: InquiryKind) -> Result<usize, RepositoryError> {
        let guard = self.tables.lock().expect("inquiry mutex poisoned");
        Ok(guard.get(&kind).map(Vec::len).unwrap_or(0))
    }
}

/// SEO overrides keyed by page slug.
#[derive(Default, Clone)]
pub struct MemorySeoRepository {
    rows: Arc<Mutex<BTreeMap<PageSlug, SeoOverride>>>,
}

impl SeoRepository for MemorySeoRepository {
    fn fetch(&self, slug: PageSlug) -> Result<Option<SeoOverride>, RepositoryError> {
        let guard = self.rows.lock().expect("seo mutex poisoned");
        Ok(guard.get(&slug).cloned())
    }

    fn upsert(&self, record: SeoOverride) -> Result<SeoOverride, RepositoryError> {
        let mut guard = self.rows.lock().expect("seo mutex poisoned");
        guard.insert(record.slug, record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<SeoOverride>, RepositoryError> {
        let guard = self.rows.lock().expect("seo mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::ListingStatus;
    use crate::inquiries::{ContactDetails, ContactMessageDetails, InquiryDetails};
    use chrono::{TimeZone, Utc};

    fn listing(id: &str, minute: u32) -> Listing {
        Listing {
            id: ListingId(id.to_string()),
            title: format!("Listing {id}"),
            description: None,
            price: None,
            year: None,
            brand: None,
            model: None,
            mileage: None,
            fuel_type: None,
            length_m: None,
            sleeps: None,
            images: None,
            features: None,
            status: ListingStatus::Available,
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 1, 10, minute, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn contact(id: &str) -> Inquiry {
        Inquiry {
            id: InquiryId(id.to_string()),
            contact: ContactDetails {
                name: "Jan".to_string(),
                email: "jan@x.be".to_string(),
                phone: None,
            },
            details: InquiryDetails::Contact(ContactMessageDetails {
                subject: None,
                message: "Hallo".to_string(),
            }),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn listings_with_equal_timestamps_list_latest_insert_first() {
        let repository = MemoryListingRepository::default();
        repository.insert(listing("a", 0)).expect("insert a");
        repository.insert(listing("b", 0)).expect("insert b");
        repository.insert(listing("c", 5)).expect("insert c");

        let ids: Vec<String> = repository
            .list(&ListingFilter::default())
            .expect("list succeeds")
            .into_iter()
            .map(|listing| listing.id.0)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn duplicate_listing_ids_conflict() {
        let repository = MemoryListingRepository::default();
        repository.insert(listing("a", 0)).expect("first insert");
        assert!(matches!(
            repository.insert(listing("a", 1)),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn inquiry_tables_are_isolated_per_kind() {
        let repository = MemoryInquiryRepository::default();
        repository.insert(contact("c-1")).expect("insert");

        assert_eq!(repository.count(InquiryKind::Contact).expect("count"), 1);
        assert_eq!(repository.count(InquiryKind::Quote).expect("count"), 0);
        assert!(matches!(
            repository.delete(InquiryKind::Quote, &InquiryId("c-1".to_string())),
            Err(RepositoryError::NotFound)
        ));

        repository
            .delete(InquiryKind::Contact, &InquiryId("c-1".to_string()))
            .expect("delete succeeds");
        assert!(repository
            .list(InquiryKind::Contact)
            .expect("list")
            .is_empty());
    }
}
