//! Error types for flowmap-graph.

use thiserror::Error;

use flowmap_core::{EdgeKey, NodeKey};

/// Structural problems found when validating an assembled [`NodeGraph`].
///
/// Assembly itself never fails; these only surface from
/// [`NodeGraph::validate`], which checks graphs that were built or edited
/// outside the assembler.
///
/// [`NodeGraph`]: crate::graph::NodeGraph
/// [`NodeGraph::validate`]: crate::graph::NodeGraph::validate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Two nodes share a key.
    #[error("duplicate node: '{id}'")]
    DuplicateNode { id: NodeKey },

    /// Two edges share a key.
    #[error("duplicate edge: '{id}'")]
    DuplicateEdge { id: EdgeKey },

    /// An edge references a node that is not in the graph.
    #[error("edge '{edge}' references missing node '{node}'")]
    DanglingEdge { edge: EdgeKey, node: NodeKey },
}
