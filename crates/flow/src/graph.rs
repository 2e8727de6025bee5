//! Validated container for the conversation graph.

use std::collections::{HashMap, HashSet, VecDeque};

use prospecto_core::error::FlowError;

use crate::node::{FlowNode, NodeId};

/// The conversation graph. Construction validates structure so the
/// engine can trust every edge at runtime: exactly one continuation per
/// node, all edges resolve, and every node is reachable from the entry.
#[derive(Debug)]
pub struct FlowGraph {
    nodes: HashMap<NodeId, FlowNode>,
    entry: NodeId,
}

impl FlowGraph {
    pub fn new(nodes: Vec<FlowNode>, entry: NodeId) -> Result<Self, FlowError> {
        let mut map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if map.insert(node.id, node).is_some() {
                return Err(FlowError::Graph {
                    node: entry.to_string(),
                    reason: "duplicate node id".to_string(),
                });
            }
        }
        let graph = Self { nodes: map, entry };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> Result<(), FlowError> {
        if !self.nodes.contains_key(self.entry) {
            return Err(FlowError::Graph {
                node: self.entry.to_string(),
                reason: "entry node missing".to_string(),
            });
        }

        for node in self.nodes.values() {
            let continuations =
                usize::from(node.reply.is_some()) + usize::from(node.next.is_some());
            let ok = if node.terminal {
                continuations == 0
            } else {
                continuations == 1
            };
            if !ok {
                return Err(FlowError::Graph {
                    node: node.id.to_string(),
                    reason: "node needs exactly one of reply, next, terminal".to_string(),
                });
            }
            for edge in self.edges_of(node) {
                if !self.nodes.contains_key(edge) {
                    return Err(FlowError::Graph {
                        node: node.id.to_string(),
                        reason: format!("edge to unknown node {edge}"),
                    });
                }
            }
        }

        // Every node must be reachable from the entry
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        seen.insert(self.entry);
        queue.push_back(self.entry);
        while let Some(id) = queue.pop_front() {
            let node = &self.nodes[id];
            for edge in self.edges_of(node) {
                if seen.insert(edge) {
                    queue.push_back(edge);
                }
            }
        }
        for id in self.nodes.keys() {
            if !seen.contains(id) {
                return Err(FlowError::Graph {
                    node: id.to_string(),
                    reason: "unreachable from entry".to_string(),
                });
            }
        }
        Ok(())
    }

    fn edges_of(&self, node: &FlowNode) -> Vec<NodeId> {
        let mut edges = node
            .reply
            .as_ref()
            .map(|r| r.edges())
            .unwrap_or_default();
        if let Some(next) = node.next {
            edges.push(next);
        }
        edges
    }

    pub fn node(&self, id: NodeId) -> Result<&FlowNode, FlowError> {
        self.nodes
            .get(id)
            .ok_or_else(|| FlowError::UnknownNode(id.to_string()))
    }

    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
