//! Outbound delivery for prospecto.
//!
//! Adapters implement [`prospecto_core::DeliveryAdapter`] for a single
//! transport attempt:
//! - **WppBridge** — WPPConnect HTTP server (WhatsApp)
//! - **ConsoleAdapter** — stdout, for the local chat loop
//!
//! The [`Courier`] wraps an adapter with the delivery policy: media
//! validation, bounded retries, and degrading to text when a document
//! cannot be sent.

pub mod console;
pub mod courier;
pub mod wpp;

pub use console::ConsoleAdapter;
pub use courier::{Courier, RetryPolicy};
pub use wpp::{WppBridge, WppBridgeConfig};
