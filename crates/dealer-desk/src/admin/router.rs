use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::service::{AdminBackend, AdminConsole, AdminError};
use super::session::{AdminSession, SessionContext, SessionVerifier, Unauthorized};
use crate::catalogue::{ListingDraft, ListingFilter, ListingId, ListingRepository, ListingStatus};
use crate::inquiries::{InquiryId, InquiryKind, InquiryRepository};
use crate::seo::{PageSlug, SeoDraft, SeoRepository};

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Shared state of the admin routes. The bearer credential is verified before any
/// request body is read, and a console is built per request from the resulting session.
pub struct AdminState<L, I, S> {
    backend: AdminBackend<L, I, S>,
    verifier: Arc<dyn SessionVerifier>,
    login_path: Arc<str>,
}

impl<L, I, S> Clone for AdminState<L, I, S> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            verifier: self.verifier.clone(),
            login_path: self.login_path.clone(),
        }
    }
}

impl<L, I, S> AdminState<L, I, S>
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    pub fn new(
        backend: AdminBackend<L, I, S>,
        verifier: Arc<dyn SessionVerifier>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            verifier,
            login_path: Arc::from(login_path.into()),
        }
    }

    fn console(&self, session: AdminSession) -> AdminConsole<L, I, S> {
        AdminConsole::new(SessionContext::with_session(session), self.backend.clone())
    }

    fn respond<T: Serialize>(&self, result: Result<T, AdminError>, success: StatusCode) -> Response {
        match result {
            Ok(value) => (success, axum::Json(value)).into_response(),
            Err(err) => error_response(err, &self.login_path),
        }
    }
}

pub fn admin_router<L, I, S>(state: AdminState<L, I, S>) -> Router
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    Router::new()
        .route("/api/v1/admin/overview", get(overview_handler::<L, I, S>))
        .route(
            "/api/v1/admin/listings",
            get(list_listings_handler::<L, I, S>).post(create_listing_handler::<L, I, S>),
        )
        .route(
            "/api/v1/admin/listings/:listing_id",
            get(get_listing_handler::<L, I, S>)
                .put(update_listing_handler::<L, I, S>)
                .delete(delete_listing_handler::<L, I, S>),
        )
        .route(
            "/api/v1/admin/listings/:listing_id/status",
            put(set_status_handler::<L, I, S>),
        )
        .route("/api/v1/admin/images", post(upload_image_handler::<L, I, S>))
        .route(
            "/api/v1/admin/inquiries/:kind",
            get(list_inquiries_handler::<L, I, S>),
        )
        .route(
            "/api/v1/admin/inquiries/:kind/:inquiry_id",
            axum::routing::delete(delete_inquiry_handler::<L, I, S>),
        )
        .route("/api/v1/admin/seo", get(list_seo_handler::<L, I, S>))
        .route("/api/v1/admin/seo/:slug", put(update_seo_handler::<L, I, S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session::<L, I, S>,
        ))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(state)
}

/// Rejects requests without a valid bearer credential before their extractors run.
/// The verified session travels to the handler as a request extension.
pub(crate) async fn require_session<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    mut request: Request,
    next: Next,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let verified = match bearer_token(request.headers()) {
        Some(token) => state.verifier.verify(token),
        None => Err(Unauthorized::Missing),
    };
    match verified {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(reason) => {
            warn!(reason = %reason, path = %request.uri().path(), "admin credential rejected");
            error_response(AdminError::Unauthorized(reason), &state.login_path)
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    status: ListingStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadParams {
    filename: String,
}

#[derive(Serialize)]
struct Deleted {
    deleted: bool,
}

pub(crate) async fn overview_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    state.respond(console.overview(), StatusCode::OK)
}

pub(crate) async fn list_listings_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Query(filter): Query<ListingFilter>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    state.respond(console.list_listings(&filter), StatusCode::OK)
}

pub(crate) async fn create_listing_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    axum::Json(draft): axum::Json<ListingDraft>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    state.respond(console.create_listing(draft), StatusCode::CREATED)
}

pub(crate) async fn get_listing_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Path(listing_id): Path<String>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    state.respond(console.get_listing(&ListingId(listing_id)), StatusCode::OK)
}

pub(crate) async fn update_listing_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Path(listing_id): Path<String>,
    axum::Json(draft): axum::Json<ListingDraft>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    state.respond(
        console.update_listing(&ListingId(listing_id), draft),
        StatusCode::OK,
    )
}

pub(crate) async fn set_status_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Path(listing_id): Path<String>,
    axum::Json(change): axum::Json<StatusChange>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    state.respond(
        console.set_listing_status(&ListingId(listing_id), change.status),
        StatusCode::OK,
    )
}

pub(crate) async fn delete_listing_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Path(listing_id): Path<String>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    let result = console
        .delete_listing(&ListingId(listing_id))
        .map(|()| Deleted { deleted: true });
    state.respond(result, StatusCode::OK)
}

pub(crate) async fn upload_image_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    let result = console.upload_image(&params.filename, &body).await;
    state.respond(result, StatusCode::CREATED)
}

pub(crate) async fn list_inquiries_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Path(kind): Path<String>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    if let Err(err) = console.authorize() {
        return error_response(err, &state.login_path);
    }
    match kind.parse::<InquiryKind>() {
        Ok(kind) => state.respond(console.list_inquiries(kind), StatusCode::OK),
        Err(err) => not_found(err.to_string()),
    }
}

pub(crate) async fn delete_inquiry_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Path((kind, inquiry_id)): Path<(String, String)>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    if let Err(err) = console.authorize() {
        return error_response(err, &state.login_path);
    }
    match kind.parse::<InquiryKind>() {
        Ok(kind) => {
            let result = console
                .delete_inquiry(kind, &InquiryId(inquiry_id))
                .map(|()| Deleted { deleted: true });
            state.respond(result, StatusCode::OK)
        }
        Err(err) => not_found(err.to_string()),
    }
}

pub(crate) async fn list_seo_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    state.respond(console.list_seo(), StatusCode::OK)
}

pub(crate) async fn update_seo_handler<L, I, S>(
    State(state): State<AdminState<L, I, S>>,
    Extension(session): Extension<AdminSession>,
    Path(slug): Path<String>,
    axum::Json(draft): axum::Json<SeoDraft>,
) -> Response
where
    L: ListingRepository + 'static,
    I: InquiryRepository + 'static,
    S: SeoRepository + 'static,
{
    let console = state.console(session);
    if let Err(err) = console.authorize() {
        return error_response(err, &state.login_path);
    }
    match slug.parse::<PageSlug>() {
        Ok(slug) => state.respond(console.update_seo(slug, draft), StatusCode::OK),
        Err(err) => not_found(err.to_string()),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, axum::Json(json!({ "error": message }))).into_response()
}

/// Map a console failure to its HTTP response. Unauthorized callers are pointed at the
/// login path.
pub(crate) fn error_response(err: AdminError, login_path: &str) -> Response {
    match err {
        AdminError::Unauthorized(reason) => {
            let payload = json!({
                "error": "unauthorized",
                "reason": reason.to_string(),
                "redirect": login_path,
            });
            let mut response = (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            response
        }
        AdminError::Validation(err) => {
            let payload = json!({ "error": err.to_string(), "field": err.field() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AdminError::NotFound { .. } => not_found(err.to_string()),
        AdminError::Repository(_) | AdminError::Images(_) => {
            error!(error = %err, "admin operation failed");
            let payload = json!({ "error": "operation failed; please try again" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
