//! Operator notifications for accepted inquiries.
//!
//! Intake hands a [`NotificationRequest`] to a [`NotificationOutbox`] once the inquiry
//! is durable. The [`DispatchQueue`] worker feeds each request to the
//! [`NotificationRelay`], which renders the Dutch operator e-mail and makes a single
//! delivery attempt through a [`MailTransport`]. Failures end in the log.

pub mod outbox;
pub mod relay;
pub mod request;
pub mod template;
pub mod transport;

pub use outbox::{DispatchQueue, NotificationOutbox, OutboxError};
pub use relay::{DispatchError, DispatchReceipt, NotificationRelay};
pub use request::NotificationRequest;
pub use template::{render, RenderedNotification};
pub use transport::{
    transport_from_config, LogTransport, MailTransport, OutboundEmail, RecordingTransport,
    ResendTransport, TransportError, TransportReceipt,
};
