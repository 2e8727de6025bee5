//! Delivery policy around a single adapter.
//!
//! Text goes out in one attempt and failures propagate to the caller.
//! Media is bounded-retried and then degraded: an unusable URL sends the
//! caption immediately with a notice, exhausted retries send the caption
//! with an error notice. The conversation continues either way; losing a
//! brochure must not lose the user.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use prospecto_core::delivery::{is_http_url, DeliveryAdapter, OutboundMessage};
use prospecto_core::error::DeliveryError;

/// How hard to try before degrading a media send.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(800),
        }
    }
}

#[derive(Clone)]
pub struct Courier {
    adapter: Arc<dyn DeliveryAdapter>,
    policy: RetryPolicy,
}

impl Courier {
    pub fn new(adapter: Arc<dyn DeliveryAdapter>, policy: RetryPolicy) -> Self {
        Self { adapter, policy }
    }

    pub fn adapter_name(&self) -> &str {
        self.adapter.name()
    }

    /// One transport attempt, no retry.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<(), DeliveryError> {
        self.adapter.send(to, &OutboundMessage::text(text)).await
    }

    /// Send a document with `caption`. Never fails the conversation over
    /// the document alone: a bad URL or exhausted retries fall back to
    /// the caption text with a notice appended.
    pub async fn send_media(
        &self,
        to: &str,
        caption: &str,
        url: &str,
    ) -> Result<(), DeliveryError> {
        if !is_http_url(url) {
            warn!(to = %to, url = %url, "Unusable media URL, sending caption only");
            return self
                .send_text(to, &format!("{caption}\n(Documento no disponible)"))
                .await;
        }

        let message = OutboundMessage::with_media(caption, url);
        let mut last_error: Option<DeliveryError> = None;
        for attempt in 1..=self.policy.attempts {
            match self.adapter.send(to, &message).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, to = %to, error = %e, "Media delivery attempt failed");
                    last_error = Some(e);
                    if attempt < self.policy.attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        error!(to = %to, error = ?last_error, "Media delivery exhausted retries, degrading to text");
        self.send_text(to, &format!("{caption}\n(Error al cargar documento)"))
            .await
    }
}
