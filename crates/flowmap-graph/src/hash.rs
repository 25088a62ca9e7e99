//! Deterministic content fingerprints for assembled graphs using blake3.
//!
//! The fingerprint covers every node and edge in order, so it changes when
//! anything a renderer would draw changes. It is derived state: callers use
//! it to skip re-layout when a regenerated graph is identical.
//!
//! # Determinism
//!
//! - `serde_json::to_vec` gives a canonical encoding because the output
//!   types contain no `HashMap`
//! - node and edge order is already deterministic for a given catalog
//! - each item is length-prefixed so boundaries cannot shift between items

use crate::graph::NodeGraph;

/// Computes a blake3 hash over the serialized nodes then edges.
pub fn fingerprint(graph: &NodeGraph) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();

    hasher.update(&(graph.nodes.len() as u64).to_le_bytes());
    for node in &graph.nodes {
        let bytes = serde_json::to_vec(node).expect("GraphNode serialization should never fail");
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }

    hasher.update(&(graph.edges.len() as u64).to_le_bytes());
    for edge in &graph.edges {
        let bytes = serde_json::to_vec(edge).expect("GraphEdge serialization should never fail");
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }

    hasher.finalize()
}

impl NodeGraph {
    /// See [`fingerprint`].
    pub fn fingerprint(&self) -> blake3::Hash {
        fingerprint(self)
    }
}
