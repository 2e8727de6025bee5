//! Conversation flow for the admissions assistant.
//!
//! The conversation is a directed graph of nodes with cycles (menus
//! loop back). `node` defines the vocabulary, `graph` the validated
//! container, `script` the actual admissions conversation, `copy` the
//! file-loaded menu texts, and `engine` the per-user session machinery
//! that drives it all.

pub mod copy;
pub mod engine;
pub mod graph;
pub mod node;
pub mod script;

pub use copy::MessagePack;
pub use engine::{DispatchEvent, SessionEngine};
pub use graph::FlowGraph;
pub use node::{FlowNode, NodeId, Reply, Segment, Transform};
