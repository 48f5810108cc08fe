use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::NotificationConfig;

/// A fully addressed e-mail, serialized in the Resend request shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// What the provider told us about an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportReceipt {
    pub message_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build mail client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("mail request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("mail provider answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound mail delivery. One call is one attempt.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<TransportReceipt, TransportError>;
}

/// Delivery through the Resend HTTPS API.
pub struct ResendTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

impl ResendTransport {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<TransportReceipt, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ResendResponse = response.json().await?;
        Ok(TransportReceipt {
            message_id: parsed.id,
        })
    }
}

/// Development transport: logs the message instead of sending it. Nothing is retained.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<TransportReceipt, TransportError> {
        info!(
            to = ?email.to,
            from = %email.from,
            subject = %email.subject,
            bytes = email.html.len(),
            "mail transport not configured; logging notification instead"
        );
        Ok(TransportReceipt::default())
    }
}

/// Logs like [`LogTransport`] and keeps a copy of every message for later inspection.
/// Meant for short-lived runs such as the CLI demo and tests.
#[derive(Default, Clone)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent
            .lock()
            .expect("recording transport mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<TransportReceipt, TransportError> {
        let receipt = LogTransport.send(email).await?;
        self.sent
            .lock()
            .expect("recording transport mutex poisoned")
            .push(email.clone());
        Ok(receipt)
    }
}

/// Resend when an API key is configured, otherwise the logging fallback.
pub fn transport_from_config(
    config: &NotificationConfig,
) -> Result<Arc<dyn MailTransport>, TransportError> {
    match &config.resend_api_key {
        Some(key) => Ok(Arc::new(ResendTransport::new(
            config.resend_api_url.clone(),
            key.clone(),
            config.timeout,
        )?)),
        None => Ok(Arc::new(LogTransport)),
    }
}
