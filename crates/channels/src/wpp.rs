//! WPPConnect bridge adapter.
//!
//! Talks to a running WPPConnect server over its REST API:
//! `POST /api/{session}/send-message` for text and
//! `POST /api/{session}/send-file` for documents. The server holds the
//! actual WhatsApp session; this adapter only posts to it.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use prospecto_core::delivery::{is_http_url, DeliveryAdapter, OutboundMessage};
use prospecto_core::error::DeliveryError;

/// Bridge connection settings.
#[derive(Clone)]
pub struct WppBridgeConfig {
    /// Base URL of the WPPConnect server, e.g. `http://localhost:21465`.
    pub base_url: String,
    /// Session name the server was started with.
    pub session: String,
    /// Bearer token. Empty means the server runs without auth.
    pub token: String,
}

impl std::fmt::Debug for WppBridgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WppBridgeConfig")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    phone: &'a str,
    message: &'a str,
    #[serde(rename = "isGroup")]
    is_group: bool,
}

#[derive(Debug, Serialize)]
struct SendFileBody<'a> {
    phone: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
    #[serde(rename = "isGroup")]
    is_group: bool,
}

pub struct WppBridge {
    config: WppBridgeConfig,
    client: reqwest::Client,
}

impl WppBridge {
    pub fn new(config: WppBridgeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.session,
            action
        )
    }

    async fn post<B: Serialize + Sync>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<(), DeliveryError> {
        let url = self.endpoint(action);
        let mut request = self.client.post(&url).json(body);
        if !self.config.token.is_empty() {
            request = request.bearer_auth(&self.config.token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status, action, body = %message, "Bridge rejected request");
            return Err(DeliveryError::Bridge { status, message });
        }
        Ok(())
    }
}

#[async_trait]
impl DeliveryAdapter for WppBridge {
    fn name(&self) -> &str {
        "wpp"
    }

    async fn send(
        &self,
        destination: &str,
        message: &OutboundMessage,
    ) -> Result<(), DeliveryError> {
        match &message.media {
            None => {
                debug!(to = %destination, chars = message.text.chars().count(), "Sending text");
                self.post(
                    "send-message",
                    &SendMessageBody {
                        phone: destination,
                        message: &message.text,
                        is_group: false,
                    },
                )
                .await
            }
            Some(media) => {
                if !is_http_url(&media.url) {
                    return Err(DeliveryError::InvalidMedia(media.url.clone()));
                }
                debug!(to = %destination, url = %media.url, "Sending file");
                self.post(
                    "send-file",
                    &SendFileBody {
                        phone: destination,
                        path: &media.url,
                        filename: media.file_name.as_deref(),
                        caption: (!message.text.is_empty()).then_some(message.text.as_str()),
                        is_group: false,
                    },
                )
                .await
            }
        }
    }
}
