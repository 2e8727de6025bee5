//! Error types for the prospecto domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level [`Error`]
//! wraps them for call sites that cross contexts.
//!
//! Two failure classes are deliberately *not* errors: a reply that fails
//! validation re-prompts the current node, and a lookup miss redirects to a
//! safe node. Both are ordinary control flow in `prospecto-flow`.

use thiserror::Error;

/// The top-level error type for all prospecto operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog file unreadable: {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Catalog file malformed: {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Unknown faculty id: {0}")]
    UnknownFaculty(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("State document read failed: {0}")]
    Read(String),

    #[error("State document write failed: {0}")]
    Write(String),

    #[error("State document malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Delivery adapter not configured: {0}")]
    NotConfigured(String),

    #[error("Bridge rejected request (status {status}): {message}")]
    Bridge { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid media URL: {0}")]
    InvalidMedia(String),
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Node walk exceeded graph size starting at {0}")]
    WalkCycle(String),

    #[error("Invalid graph at node {node}: {reason}")]
    Graph { node: String, reason: String },
}
