use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use dealer_desk::admin::AdminBackend;
use dealer_desk::catalogue::ListingService;
use dealer_desk::images::ImageStore;
use dealer_desk::seo::SeoService;
use dealer_desk::store::{MemoryInquiryRepository, MemoryListingRepository, MemorySeoRepository};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type MemoryBackend =
    AdminBackend<MemoryListingRepository, MemoryInquiryRepository, MemorySeoRepository>;

/// In-process stores shared by the public and admin routers.
#[derive(Default, Clone)]
pub(crate) struct MemoryStores {
    pub(crate) listings: Arc<MemoryListingRepository>,
    pub(crate) inquiries: Arc<MemoryInquiryRepository>,
    pub(crate) seo: Arc<MemorySeoRepository>,
}

impl MemoryStores {
    pub(crate) fn listing_service(&self) -> ListingService<MemoryListingRepository> {
        ListingService::new(self.listings.clone())
    }

    pub(crate) fn seo_service(&self) -> SeoService<MemorySeoRepository> {
        SeoService::new(self.seo.clone())
    }

    pub(crate) fn admin_backend(&self, images: Arc<dyn ImageStore>) -> MemoryBackend {
        AdminBackend {
            listings: self.listing_service(),
            inquiries: self.inquiries.clone(),
            seo: self.seo_service(),
            images,
        }
    }
}
