//! Operator console: catalogue management, inquiry review, SEO overrides and image
//! uploads, all behind an externally verified session.

pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use router::{admin_router, AdminState};
pub use service::{AdminBackend, AdminConsole, AdminError, AdminOverview};
pub use session::{
    AdminSession, SessionContext, SessionVerifier, StaticTokenVerifier, Unauthorized,
};
