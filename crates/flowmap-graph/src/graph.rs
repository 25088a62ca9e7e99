//! The assembled node/edge graph and the builder that produces it.
//!
//! [`GraphBuilder`] collects nodes and edges into insertion-ordered maps
//! keyed by their ids. Re-adding an id is a no-op, which is what lets the
//! assembler merge sub-graphs for several messages without producing
//! duplicates. [`NodeGraph`] is the frozen result handed to callers.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use flowmap_core::{EdgeKey, NodeKey};

use crate::edge::GraphEdge;
use crate::error::GraphError;
use crate::node::GraphNode;

// ---------------------------------------------------------------------------
// NodeGraph
// ---------------------------------------------------------------------------

/// A rendered graph: nodes first, then the edges between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl NodeGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id.as_str() == id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edge(id).is_some()
    }

    /// Checks that ids are unique and every edge endpoint is a node.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(GraphError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(GraphError::DuplicateEdge {
                    id: edge.id.clone(),
                });
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Accumulates nodes and edges, ignoring ids that were already added.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: IndexMap<NodeKey, GraphNode>,
    edges: IndexMap<EdgeKey, GraphEdge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node unless its key is already present. Returns the key.
    pub fn add_node(&mut self, node: GraphNode) -> NodeKey {
        let key = node.id.clone();
        self.nodes.entry(key.clone()).or_insert(node);
        key
    }

    /// Adds an edge unless its key is already present. Returns whether the
    /// edge was new.
    pub fn add_edge(&mut self, edge: GraphEdge) -> bool {
        if self.edges.contains_key(&edge.id) {
            trace!(edge = %edge.id, "edge already present");
            return false;
        }
        self.edges.insert(edge.id.clone(), edge);
        true
    }

    /// Folds another graph in, keeping the first copy of each id.
    pub fn merge(&mut self, graph: NodeGraph) {
        for node in graph.nodes {
            self.add_node(node);
        }
        for edge in graph.edges {
            self.add_edge(edge);
        }
    }

    pub fn contains_node(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn finish(self) -> NodeGraph {
        let graph = NodeGraph {
            nodes: self.nodes.into_values().collect(),
            edges: self.edges.into_values().collect(),
        };
        debug_assert!(
            graph.validate().is_ok(),
            "assembled graph is inconsistent: {:?}",
            graph.validate()
        );
        graph
    }
}
