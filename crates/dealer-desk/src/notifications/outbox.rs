use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::relay::NotificationRelay;
use super::request::NotificationRequest;

/// Hand-off point between intake and notification delivery. Enqueueing never waits on
/// delivery.
pub trait NotificationOutbox: Send + Sync {
    fn enqueue(&self, request: NotificationRequest) -> Result<(), OutboxError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("notification worker has stopped")]
    Closed,
}

enum QueueMessage {
    Dispatch(NotificationRequest),
    Flush(oneshot::Sender<()>),
}

/// Unbounded queue drained by a single worker task that calls the relay once per request.
#[derive(Clone)]
pub struct DispatchQueue {
    sender: mpsc::UnboundedSender<QueueMessage>,
}

impl DispatchQueue {
    /// Start the worker on the current tokio runtime. It exits once every queue handle
    /// has been dropped.
    pub fn spawn(relay: NotificationRelay) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(relay, receiver));
        (Self { sender }, handle)
    }

    /// Wait until everything enqueued before this call has been attempted.
    pub async fn flush(&self) -> Result<(), OutboxError> {
        let (done, waiter) = oneshot::channel();
        self.sender
            .send(QueueMessage::Flush(done))
            .map_err(|_| OutboxError::Closed)?;
        waiter.await.map_err(|_| OutboxError::Closed)
    }
}

impl NotificationOutbox for DispatchQueue {
    fn enqueue(&self, request: NotificationRequest) -> Result<(), OutboxError> {
        self.sender
            .send(QueueMessage::Dispatch(request))
            .map_err(|_| OutboxError::Closed)
    }
}

async fn run_worker(relay: NotificationRelay, mut receiver: mpsc::UnboundedReceiver<QueueMessage>) {
    while let Some(message) = receiver.recv().await {
        match message {
            QueueMessage::Dispatch(request) => match relay.notify(&request).await {
                Ok(receipt) => debug!(
                    kind = receipt.kind.label(),
                    subject = %receipt.subject,
                    "notification dispatched"
                ),
                Err(err) => warn!(
                    kind = %request.kind,
                    error = %err,
                    "notification dispatch failed; inquiry remains available for review"
                ),
            },
            QueueMessage::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("notification worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::transport::RecordingTransport;
    use std::sync::Arc;

    fn relay(transport: &RecordingTransport) -> NotificationRelay {
        NotificationRelay::new("ops@x.be", "noreply@x.be", Arc::new(transport.clone()))
    }

    fn contact(name: &str) -> NotificationRequest {
        NotificationRequest::new("contact")
            .with("name", name)
            .with("email", "jan@x.be")
            .with("message", "Hallo")
    }

    #[tokio::test]
    async fn worker_keeps_going_after_a_failed_dispatch() {
        let transport = RecordingTransport::default();
        let (queue, _worker) = DispatchQueue::spawn(relay(&transport));

        queue
            .enqueue(NotificationRequest::new("newsletter"))
            .expect("enqueue");
        queue.enqueue(contact("Jan")).expect("enqueue");
        queue.enqueue(contact("Els")).expect("enqueue");
        queue.flush().await.expect("flush");

        let subjects: Vec<String> = transport.sent().into_iter().map(|mail| mail.subject).collect();
        assert_eq!(
            subjects,
            vec![
                "Nieuw contactbericht van Jan".to_string(),
                "Nieuw contactbericht van Els".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn enqueue_fails_once_worker_is_gone() {
        let transport = RecordingTransport::default();
        let (queue, worker) = DispatchQueue::spawn(relay(&transport));
        worker.abort();
        let _ = worker.await;

        assert!(matches!(
            queue.enqueue(contact("Jan")),
            Err(OutboxError::Closed)
        ));
        assert!(matches!(queue.flush().await, Err(OutboxError::Closed)));
    }
}
