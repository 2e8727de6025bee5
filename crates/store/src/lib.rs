//! State store backends.
//!
//! Two implementations of [`prospecto_core::StateStore`]: a file-backed
//! JSON document for production and an in-memory document for tests and
//! the local chat loop. Both speak the same document shape.

pub mod document;
pub mod file;
pub mod memory;

pub use document::StateDocument;
pub use file::FileStore;
pub use memory::MemoryStore;
