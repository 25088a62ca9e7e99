//! Relationship and channel graph assembly for flowmap.
//!
//! Given an immutable [`flowmap_core::Catalog`], this crate computes the
//! nodes and edges describing how a message (or a service, or a data
//! product) flows through the architecture: who produces it, who consumes
//! it, and which channels it is routed through on the way.
//!
//! # Pipeline
//!
//! catalog snapshot -> [`resolver`] -> [`channel`] -> [`assembler`] ->
//! [`graph::NodeGraph`] -> layout / rendering (external)
//!
//! # Modules
//!
//! - [`channel`]: channel routing graph and shortest-chain search
//! - [`resolver`]: producers and consumers of a message
//! - [`assembler`]: the view builders
//! - [`graph`]: the output graph and the deduplicating builder
//! - [`node`] / [`edge`]: output element types
//! - [`labels`]: edge label vocabulary
//! - [`mermaid`]: flowchart text export
//! - [`hash`]: blake3 graph fingerprints

pub mod assembler;
pub mod channel;
pub mod edge;
pub mod error;
pub mod graph;
pub mod hash;
pub mod labels;
pub mod mermaid;
pub mod node;
pub mod resolver;

pub use assembler::{AssemblyOptions, GraphAssembler};
pub use channel::{ChannelChain, ChannelGraph};
pub use edge::{GraphEdge, MarkerEnd, RootSourceAndTarget};
pub use error::GraphError;
pub use graph::{GraphBuilder, NodeGraph};
pub use mermaid::{to_mermaid, Direction, MermaidOptions};
pub use node::{GraphNode, NodeData, RenderMode};
pub use resolver::{Participation, RelationshipResolver};
