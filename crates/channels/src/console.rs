//! Console adapter — prints outbound messages to stdout.
//!
//! Used by the local chat loop to exercise the full conversation without
//! a WhatsApp session.

use async_trait::async_trait;

use prospecto_core::delivery::{DeliveryAdapter, OutboundMessage};
use prospecto_core::error::DeliveryError;

pub struct ConsoleAdapter;

#[async_trait]
impl DeliveryAdapter for ConsoleAdapter {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(
        &self,
        _destination: &str,
        message: &OutboundMessage,
    ) -> Result<(), DeliveryError> {
        println!("\n🤖 {}", message.text);
        if let Some(media) = &message.media {
            println!("   📎 {}", media.url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_succeeds() {
        let adapter = ConsoleAdapter;
        assert_eq!(adapter.name(), "console");
        let message = OutboundMessage::with_media("Hola", "https://x.test/b.pdf");
        assert!(adapter.send("51999", &message).await.is_ok());
    }
}
