//! Completed-envelope notifications
//!
//! TrueSign can push an envelope to the integration when its status
//! changes. The message body is the envelope JSON; the transport that
//! delivers it is up to the host.

use std::sync::Arc;

use async_trait::async_trait;
use truesign_domain::{Envelope, Result, TrueSignError};
use tracing::{info, warn};
use uuid::Uuid;

/// Trait for reacting to a pushed envelope
#[async_trait]
pub trait EnvelopeNotificationHandler: Send + Sync {
    async fn handle(&self, envelope: &Envelope) -> Result<()>;
}

/// Handler that only records the notification
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

#[async_trait]
impl EnvelopeNotificationHandler for LoggingHandler {
    async fn handle(&self, envelope: &Envelope) -> Result<()> {
        info!(
            envelope_id = %envelope.id,
            status = %envelope.status,
            title = %envelope.content.title,
            documents = envelope.content.documents.len(),
            "Received envelope notification"
        );
        Ok(())
    }
}

/// Decodes message bodies and hands the envelopes to a handler
pub struct NotificationDispatcher {
    handler: Arc<dyn EnvelopeNotificationHandler>,
}

impl NotificationDispatcher {
    pub fn new(handler: Arc<dyn EnvelopeNotificationHandler>) -> Self {
        Self { handler }
    }

    /// Decode `body` and dispatch it
    ///
    /// # Errors
    /// Returns `TrueSignError::Serialization` for an undecodable body, in
    /// which case the handler is not called, or the handler's own error.
    pub async fn dispatch(&self, body: &[u8]) -> Result<Uuid> {
        let envelope: Envelope = serde_json::from_slice(body).map_err(|e| {
            warn!(error = %e, bytes = body.len(), "Discarding undecodable notification");
            TrueSignError::Serialization(format!("Invalid envelope notification: {e}"))
        })?;
        self.handler.handle(&envelope).await?;
        Ok(envelope.id)
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(LoggingHandler))
    }
}
