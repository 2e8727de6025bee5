//! # Prospecto Core
//!
//! Domain types, traits, and error definitions for the prospecto admissions
//! assistant. This crate carries no HTTP or transport dependencies — it
//! defines the model the other crates implement against.
//!
//! The two seams are traits here: [`StateStore`] (durable conversation
//! state, implemented by `prospecto-store`) and [`DeliveryAdapter`]
//! (outbound transport, implemented by `prospecto-channels`). Everything
//! else depends inward on this crate.

pub mod blacklist;
pub mod delivery;
pub mod error;
pub mod state;
pub mod text;

// Re-export key types at crate root for ergonomics
pub use blacklist::Blacklist;
pub use delivery::{DeliveryAdapter, Media, OutboundMessage};
pub use error::{CatalogError, DeliveryError, Error, FlowError, Result, StoreError};
pub use state::{ContactDraft, ContactRequest, StateStore, UserState};
