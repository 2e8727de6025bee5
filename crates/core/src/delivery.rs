//! Delivery trait — the outbound transport seam.
//!
//! The conversation engine and the HTTP surface compose messages as
//! [`OutboundMessage`] values and hand them to a [`DeliveryAdapter`].
//! Implementations live in `prospecto-channels` (wppconnect HTTP bridge,
//! console); tests use in-test recording adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// A media attachment referenced by URL (brochure PDF, campus image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,

    /// File name shown to the recipient; derived from the URL when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Media {
    /// Attachment referenced by URL, file name derived from it.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let file_name = file_name_from_url(&url);
        Self { url, file_name }
    }
}

/// One outbound message: text with an optional attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl OutboundMessage {
    /// Plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: None,
        }
    }

    /// Text with a media attachment.
    pub fn with_media(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: Some(Media::from_url(url)),
        }
    }
}

/// Whether a string is usable as a media URL. Anything that is not plain
/// http(s) is treated as absent by callers.
pub fn is_http_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

/// Last path segment of a URL, if it looks like a file name.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let tail = url.split(['?', '#']).next().unwrap_or(url);
    let name = tail.rsplit('/').next()?;
    if name.is_empty() || !name.contains('.') {
        None
    } else {
        Some(name.to_string())
    }
}

/// The outbound transport.
///
/// `destination` is the recipient's phone number as the bridge expects it
/// (digits, country code included). Adapters are outbound-only; inbound
/// messages arrive through the gateway webhook.
#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    /// Adapter name (e.g. "wpp", "console").
    fn name(&self) -> &str;

    /// Send one message. A single call maps to a single transport attempt;
    /// retry policy lives in the courier, not in adapters.
    async fn send(
        &self,
        destination: &str,
        message: &OutboundMessage,
    ) -> std::result::Result<(), DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_url_detection() {
        assert!(is_http_url("http://example.com/brochure.pdf"));
        assert!(is_http_url("https://example.com/brochure.pdf"));
        assert!(!is_http_url("ftp://example.com/brochure.pdf"));
        assert!(!is_http_url("brochure.pdf"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn file_name_from_url_takes_last_segment() {
        assert_eq!(
            file_name_from_url("https://x.test/docs/Brochure_FIIS.pdf"),
            Some("Brochure_FIIS.pdf".into())
        );
        assert_eq!(
            file_name_from_url("https://x.test/docs/guia.pdf?v=2"),
            Some("guia.pdf".into())
        );
        assert_eq!(file_name_from_url("https://x.test/docs/"), None);
        assert_eq!(file_name_from_url("https://x.test/docs"), None);
    }

    #[test]
    fn with_media_infers_file_name() {
        let msg = OutboundMessage::with_media("aquí tiene", "https://x.test/b/fcs.pdf");
        assert_eq!(msg.media.as_ref().unwrap().file_name.as_deref(), Some("fcs.pdf"));
    }
}
