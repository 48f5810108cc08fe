use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::admin::{
    admin_router, AdminBackend, AdminConsole, AdminSession, AdminState, SessionContext,
    StaticTokenVerifier,
};
use crate::catalogue::ListingService;
use crate::images::{ImageStore, ImageStoreError, StoredImage};
use crate::inquiries::{ContactDetails, ContactMessageDetails, Inquiry, InquiryDetails, InquiryId};
use crate::seo::SeoService;
use crate::store::{MemoryInquiryRepository, MemoryListingRepository, MemorySeoRepository};

pub(super) const TOKEN: &str = "test-admin-token";
pub(super) const LOGIN_PATH: &str = "/admin/login";

pub(super) type MemoryBackend =
    AdminBackend<MemoryListingRepository, MemoryInquiryRepository, MemorySeoRepository>;
pub(super) type MemoryConsole =
    AdminConsole<MemoryListingRepository, MemoryInquiryRepository, MemorySeoRepository>;

/// Image store that keeps uploads in memory.
#[derive(Default)]
pub(super) struct MemoryImages {
    objects: Mutex<Vec<(String, usize, String)>>,
}

impl MemoryImages {
    pub(super) fn objects(&self) -> Vec<(String, usize, String)> {
        self.objects.lock().expect("image mutex poisoned").clone()
    }
}

#[async_trait]
impl ImageStore for MemoryImages {
    async fn put(
        &self,
        object_name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredImage, ImageStoreError> {
        self.objects.lock().expect("image mutex poisoned").push((
            object_name.to_string(),
            bytes.len(),
            content_type.to_string(),
        ));
        Ok(StoredImage {
            name: object_name.to_string(),
            url: self.public_url(object_name),
        })
    }

    fn public_url(&self, object_name: &str) -> String {
        format!("https://cdn.example/motorhome-images/{object_name}")
    }
}

pub(super) struct Fixture {
    pub(super) backend: MemoryBackend,
    pub(super) inquiries: Arc<MemoryInquiryRepository>,
    pub(super) images: Arc<MemoryImages>,
}

pub(super) fn fixture() -> Fixture {
    let inquiries = Arc::new(MemoryInquiryRepository::default());
    let images = Arc::new(MemoryImages::default());
    let backend = AdminBackend {
        listings: ListingService::new(Arc::new(MemoryListingRepository::default())),
        inquiries: inquiries.clone(),
        seo: SeoService::new(Arc::new(MemorySeoRepository::default())),
        images: images.clone(),
    };
    Fixture {
        backend,
        inquiries,
        images,
    }
}

pub(super) fn live_session() -> SessionContext {
    SessionContext::with_session(AdminSession::new(
        "operator@jc-motorhomes.be",
        Utc::now() + Duration::minutes(30),
    ))
}

pub(super) fn console(backend: &MemoryBackend, session: SessionContext) -> MemoryConsole {
    AdminConsole::new(session, backend.clone())
}

pub(super) fn router(backend: &MemoryBackend) -> axum::Router {
    let verifier = StaticTokenVerifier::new(Some(TOKEN.to_string()), Duration::minutes(30));
    admin_router(AdminState::new(
        backend.clone(),
        Arc::new(verifier),
        LOGIN_PATH,
    ))
}

pub(super) fn contact_inquiry(id: &str) -> Inquiry {
    Inquiry {
        id: InquiryId(id.to_string()),
        contact: ContactDetails {
            name: "Jan".to_string(),
            email: "jan@x.be".to_string(),
            phone: None,
        },
        details: InquiryDetails::Contact(ContactMessageDetails {
            subject: Some("Openingsuren".to_string()),
            message: "Zijn jullie zondag open?".to_string(),
        }),
        created_at: Utc::now(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
