use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::{error, info};

use super::domain::{InquiryKind, InquirySubmission};
use super::service::{InquiryIntakeService, IntakeError};
use crate::catalogue::ListingRepository;
use crate::inquiries::InquiryRepository;

pub(crate) const REJECTED_MESSAGE: &str =
    "submission could not be processed; please check the form and try again";

/// Public intake endpoint shared by the four inquiry forms.
pub fn inquiry_router<I, L>(service: Arc<InquiryIntakeService<I, L>>) -> Router
where
    I: InquiryRepository + 'static,
    L: ListingRepository + 'static,
{
    Router::new()
        .route("/api/v1/inquiries/:kind", post(submit_handler::<I, L>))
        .with_state(service)
}

pub(crate) async fn submit_handler<I, L>(
    State(service): State<Arc<InquiryIntakeService<I, L>>>,
    Path(kind): Path<String>,
    submission: Result<axum::Json<InquirySubmission>, JsonRejection>,
) -> Response
where
    I: InquiryRepository + 'static,
    L: ListingRepository + 'static,
{
    let kind = match kind.parse::<InquiryKind>() {
        Ok(kind) => kind,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    let submission = match submission {
        Ok(axum::Json(submission)) => submission,
        Err(rejection) => {
            info!(kind = kind.label(), error = %rejection, "inquiry payload unreadable");
            return rejected();
        }
    };

    match service.submit(kind, submission) {
        Ok(acknowledgement) => (StatusCode::ACCEPTED, axum::Json(acknowledgement)).into_response(),
        Err(IntakeError::Validation(err)) => {
            info!(kind = kind.label(), field = err.field(), error = %err, "inquiry rejected");
            rejected()
        }
        Err(IntakeError::Persistence(err)) => {
            error!(kind = kind.label(), error = %err, "inquiry persistence failed");
            let payload = json!({
                "error": "submission could not be processed; please try again later",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

/// Generic answer for anything the submitter got wrong. The cause stays in the log.
fn rejected() -> Response {
    let payload = json!({
        "error": REJECTED_MESSAGE,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
