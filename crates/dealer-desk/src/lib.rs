pub mod admin;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod form;
pub mod images;
pub mod inquiries;
pub mod notifications;
pub mod seo;
pub mod store;
pub mod telemetry;
