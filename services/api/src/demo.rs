use crate::infra::MemoryStores;
use clap::Args;
use dealer_desk::catalogue::{Listing, ListingDraft};
use dealer_desk::error::AppError;
use dealer_desk::inquiries::{InquiryIntakeService, InquiryKind, InquirySubmission};
use dealer_desk::notifications::{
    DispatchQueue, NotificationRelay, OutboundEmail, RecordingTransport,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Operator address the notifications are addressed to
    #[arg(long, default_value = "info@jc-motorhomes.be")]
    pub(crate) operator: String,
    /// Sender shown on the notifications
    #[arg(long, default_value = "J&C Motorhomes <noreply@jc-motorhomes.be>")]
    pub(crate) from: String,
    /// Print the full HTML body of every notification
    #[arg(long)]
    pub(crate) show_html: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        operator,
        from,
        show_html,
    } = args;

    let transport = RecordingTransport::default();
    let relay = NotificationRelay::new(operator, from, Arc::new(transport.clone()));
    let (queue, _worker) = DispatchQueue::spawn(relay);

    let stores = MemoryStores::default();
    let listing = seed_listing(&stores);
    let service = InquiryIntakeService::new(
        stores.inquiries.clone(),
        stores.listings.clone(),
        Arc::new(queue.clone()),
    );

    println!("Inquiry intake demo");
    match &listing {
        Some(listing) => println!("Catalogue: {} ({})", listing.title, listing.id),
        None => println!("Catalogue: empty"),
    }

    println!("\nSubmissions");
    for (kind, submission) in demo_submissions(listing.as_ref()) {
        match service.submit(kind, submission) {
            Ok(ack) => println!(
                "  {:<9} accepted as {} at {}",
                kind.label(),
                ack.inquiry_id,
                ack.received_at.format("%Y-%m-%d %H:%M:%S")
            ),
            Err(err) => println!("  {:<9} rejected: {}", kind.label(), err),
        }
    }

    if let Err(err) = queue.flush().await {
        println!("\nNotification worker unavailable: {}", err);
        return Ok(());
    }

    let sent = transport.sent();
    if sent.is_empty() {
        println!("\nOperator notifications: none dispatched");
    } else {
        println!("\nOperator notifications");
        for email in &sent {
            render_email(email, show_html);
        }
    }

    Ok(())
}

fn seed_listing(stores: &MemoryStores) -> Option<Listing> {
    let draft = ListingDraft {
        title: Some("Hymer B-Klasse MasterLine 780".to_string()),
        price: Some("89900".to_string()),
        year: Some("2021".to_string()),
        brand: Some("Hymer".to_string()),
        features: Some("Airco, Zonnepaneel, Fietsendrager".to_string()),
        ..ListingDraft::default()
    };
    match stores.listing_service().create(draft) {
        Ok(listing) => Some(listing),
        Err(err) => {
            println!("Could not seed the catalogue: {}", err);
            None
        }
    }
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn demo_submissions(listing: Option<&Listing>) -> Vec<(InquiryKind, InquirySubmission)> {
    let mut submissions = Vec::new();

    if let Some(listing) = listing {
        submissions.push((
            InquiryKind::Quote,
            InquirySubmission {
                name: text("Jan Peeters"),
                email: text("jan@example.be"),
                phone: text("0470 00 00 00"),
                message: text("Is deze camper nog beschikbaar voor een proefrit?"),
                listing_id: Some(listing.id.to_string()),
                ..InquirySubmission::default()
            },
        ));
    }

    submissions.push((
        InquiryKind::Contact,
        InquirySubmission {
            name: text("Els Janssens"),
            email: text("els@example.be"),
            subject: text("Openingsuren"),
            message: text("Zijn jullie op zaterdag open?"),
            ..InquirySubmission::default()
        },
    ));
    submissions.push((
        InquiryKind::Purchase,
        InquirySubmission {
            name: text("Karel Wouters"),
            email: text("karel@example.be"),
            brand: text("Knaus"),
            model: text("Sun TI 650"),
            year: text("2018"),
            mileage: text("64000"),
            fuel_type: text("Diesel"),
            damage: text("Kleine kras achterbumper"),
            ..InquirySubmission::default()
        },
    ));
    submissions.push((
        InquiryKind::Montage,
        InquirySubmission {
            name: text("Sofie Maes"),
            email: text("sofie@example.be"),
            service_type: text("Zonnepanelen & energiesystemen"),
            motorhome_info: text("Adria Coral 670 uit 2019"),
            preferred_date: text("2026-11-12"),
            preferred_time: text("09:30"),
            ..InquirySubmission::default()
        },
    ));
    submissions.push((
        InquiryKind::Purchase,
        InquirySubmission {
            name: text("Onvolledig"),
            email: text("geen-adres"),
            ..InquirySubmission::default()
        },
    ));

    submissions
}

fn render_email(email: &OutboundEmail, show_html: bool) {
    println!("  To: {}", email.to.join(", "));
    println!("  From: {}", email.from);
    println!("  Subject: {}", email.subject);
    if show_html {
        println!("{}\n", email.html);
    }
}
