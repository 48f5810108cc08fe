use super::common::*;
use chrono::{Duration, Utc};

use crate::admin::{AdminError, AdminSession, SessionContext, Unauthorized};
use crate::catalogue::{ListingDraft, ListingFilter, ListingId, ListingStatus};
use crate::error::ValidationError;
use crate::inquiries::{InquiryId, InquiryKind, InquiryRepository};
use crate::seo::{PageSlug, SeoDraft};

fn draft(title: &str) -> ListingDraft {
    ListingDraft {
        title: Some(title.to_string()),
        price: Some("61500".to_string()),
        features: Some("Airco, Zonnepaneel".to_string()),
        ..ListingDraft::default()
    }
}

#[test]
fn every_operation_requires_a_session() {
    let fixture = fixture();
    let console = console(&fixture.backend, SessionContext::new());
    let id = ListingId("L1".to_string());

    let outcomes = [
        console.authorize().err(),
        console.overview().err(),
        console.list_listings(&ListingFilter::default()).err(),
        console.get_listing(&id).err(),
        console.create_listing(draft("Hymer")).err(),
        console.update_listing(&id, draft("Hymer")).err(),
        console.set_listing_status(&id, ListingStatus::Sold).err(),
        console.delete_listing(&id).err(),
        console.list_inquiries(InquiryKind::Quote).err(),
        console
            .delete_inquiry(InquiryKind::Quote, &InquiryId("q".to_string()))
            .err(),
        console.list_seo().err(),
        console.update_seo(PageSlug::Home, SeoDraft::default()).err(),
    ];

    for outcome in outcomes {
        assert!(
            matches!(outcome, Some(AdminError::Unauthorized(Unauthorized::Missing))),
            "unexpected outcome {outcome:?}"
        );
    }
}

#[tokio::test]
async fn image_upload_requires_a_session() {
    let fixture = fixture();
    let console = console(&fixture.backend, SessionContext::new());
    assert!(matches!(
        console.upload_image("voorkant.jpg", b"jpeg").await,
        Err(AdminError::Unauthorized(_))
    ));
    assert!(fixture.images.objects().is_empty());
}

#[test]
fn expired_session_blocks_mutations_mid_flight() {
    let fixture = fixture();
    let session = live_session();
    let console = console(&fixture.backend, session.clone());

    let listing = console
        .create_listing(draft("Bürstner Lyseo"))
        .expect("listing created");

    session.update(Some(AdminSession::new(
        "operator@jc-motorhomes.be",
        Utc::now() - Duration::minutes(1),
    )));

    assert!(matches!(
        console.delete_listing(&listing.id),
        Err(AdminError::Unauthorized(Unauthorized::Expired))
    ));

    session.update(Some(AdminSession::new(
        "operator@jc-motorhomes.be",
        Utc::now() + Duration::minutes(10),
    )));
    console
        .get_listing(&listing.id)
        .expect("listing survived the rejected delete");
}

#[test]
fn listing_lifecycle_through_the_console() {
    let fixture = fixture();
    let console = console(&fixture.backend, live_session());

    let created = console.create_listing(draft("Carthago C-Tourer")).expect("created");
    assert_eq!(
        created.features,
        Some(vec!["Airco".to_string(), "Zonnepaneel".to_string()])
    );

    let updated = console
        .update_listing(
            &created.id,
            ListingDraft {
                features: Some(String::new()),
                ..draft("Carthago C-Tourer I 148")
            },
        )
        .expect("updated");
    assert_eq!(updated.features, None);
    assert_eq!(updated.title, "Carthago C-Tourer I 148");

    let reserved = console
        .set_listing_status(&created.id, ListingStatus::Reserved)
        .expect("status changed");
    assert_eq!(reserved.status, ListingStatus::Reserved);

    let overview = console.overview().expect("overview");
    assert_eq!(overview.listings, 1);
    assert_eq!(overview.listings_by_status[&ListingStatus::Reserved], 1);
    assert_eq!(overview.listings_by_status[&ListingStatus::Sold], 0);

    console.delete_listing(&created.id).expect("deleted");
    assert!(matches!(
        console.delete_listing(&created.id),
        Err(AdminError::NotFound { entity: "listing", .. })
    ));
}

#[test]
fn inquiries_are_listed_and_deleted_per_kind() {
    let fixture = fixture();
    fixture
        .inquiries
        .insert(contact_inquiry("c-1"))
        .expect("seed inquiry");
    let console = console(&fixture.backend, live_session());

    let contacts = console.list_inquiries(InquiryKind::Contact).expect("list");
    assert_eq!(contacts.len(), 1);
    assert!(console
        .list_inquiries(InquiryKind::Montage)
        .expect("list")
        .is_empty());

    let overview = console.overview().expect("overview");
    assert_eq!(overview.inquiries[&InquiryKind::Contact], 1);
    assert_eq!(overview.inquiries[&InquiryKind::Quote], 0);

    console
        .delete_inquiry(InquiryKind::Contact, &InquiryId("c-1".to_string()))
        .expect("deleted");
    match console.delete_inquiry(InquiryKind::Contact, &InquiryId("c-1".to_string())) {
        Err(AdminError::NotFound { entity, id }) => {
            assert_eq!(entity, "contact");
            assert_eq!(id, "c-1");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn image_upload_generates_object_names() {
    let fixture = fixture();
    let console = console(&fixture.backend, live_session());

    let stored = console
        .upload_image("Interieur.PNG", b"\x89PNG\r\n")
        .await
        .expect("upload succeeds");
    assert!(stored.name.ends_with(".png"));
    assert_eq!(
        stored.url,
        format!("https://cdn.example/motorhome-images/{}", stored.name)
    );

    let objects = fixture.images.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].2, "image/png");

    assert!(matches!(
        console.upload_image("prijslijst.pdf", b"%PDF").await,
        Err(AdminError::Validation(ValidationError::Unrecognised { .. }))
    ));
    assert!(matches!(
        console.upload_image("leeg.jpg", b"").await,
        Err(AdminError::Validation(ValidationError::Missing { field: "image" }))
    ));
    assert_eq!(fixture.images.objects().len(), 1);
}

#[test]
fn seo_updates_are_validated() {
    let fixture = fixture();
    let console = console(&fixture.backend, live_session());

    console
        .update_seo(
            PageSlug::Motorhomes,
            SeoDraft {
                page_title: Some("Ons aanbod".to_string()),
                ..SeoDraft::default()
            },
        )
        .expect("saved");

    assert!(matches!(
        console.update_seo(
            PageSlug::Motorhomes,
            SeoDraft {
                meta_description: Some("d".repeat(161)),
                ..SeoDraft::default()
            },
        ),
        Err(AdminError::Validation(ValidationError::TooLong { max: 160, .. }))
    ));

    let listed = console.list_seo().expect("listed");
    assert_eq!(listed.len(), PageSlug::ALL.len());
}
