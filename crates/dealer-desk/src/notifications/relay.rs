use std::sync::Arc;

use tracing::info;

use super::request::NotificationRequest;
use super::template;
use super::transport::{MailTransport, OutboundEmail, TransportError};
use crate::config::NotificationConfig;
use crate::inquiries::InquiryKind;

/// Outcome of a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub kind: InquiryKind,
    pub recipient: String,
    pub subject: String,
    pub message_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown notification type `{0}`")]
    UnknownKind(String),
    #[error("{kind} notification is missing `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Turns notification requests into operator e-mails. Holds no per-request state.
#[derive(Clone)]
pub struct NotificationRelay {
    recipient: String,
    sender: String,
    transport: Arc<dyn MailTransport>,
}

impl NotificationRelay {
    pub fn new(
        recipient: impl Into<String>,
        sender: impl Into<String>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            sender: sender.into(),
            transport,
        }
    }

    pub fn from_config(config: &NotificationConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self::new(
            config.operator_address.clone(),
            config.from_address.clone(),
            transport,
        )
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Render a request into the e-mail that would be sent, without sending it.
    pub fn prepare(&self, request: &NotificationRequest) -> Result<OutboundEmail, DispatchError> {
        self.compose(request).map(|(_, email)| email)
    }

    fn compose(
        &self,
        request: &NotificationRequest,
    ) -> Result<(InquiryKind, OutboundEmail), DispatchError> {
        let kind = parse_kind(&request.kind)?;
        let rendered = template::render(kind, &request.data)?;
        let email = OutboundEmail {
            from: self.sender.clone(),
            to: vec![self.recipient.clone()],
            subject: rendered.subject,
            html: rendered.html,
        };
        Ok((kind, email))
    }

    /// Single delivery attempt for one request.
    pub async fn notify(
        &self,
        request: &NotificationRequest,
    ) -> Result<DispatchReceipt, DispatchError> {
        let (kind, email) = self.compose(request)?;
        let receipt = self.transport.send(&email).await?;
        info!(
            kind = kind.label(),
            recipient = %self.recipient,
            message_id = receipt.message_id.as_deref().unwrap_or("-"),
            "operator notification sent"
        );
        Ok(DispatchReceipt {
            kind,
            recipient: self.recipient.clone(),
            subject: email.subject,
            message_id: receipt.message_id,
        })
    }
}

fn parse_kind(raw: &str) -> Result<InquiryKind, DispatchError> {
    raw.parse::<InquiryKind>()
        .map_err(|_| DispatchError::UnknownKind(raw.to_string()))
}
