//! Rendered graph nodes.
//!
//! A [`GraphNode`] wraps a copy of the catalog resource it stands for. The
//! node type is the collection name of that resource, and the payload is
//! keyed by resource kind so a renderer can switch on it:
//!
//! ```json
//! { "id": "OrderPlaced-1.0.0", "type": "events",
//!   "data": { "mode": "simple", "event": { "id": "OrderPlaced", ... } } }
//! ```

use serde::{Deserialize, Serialize};

use flowmap_core::{NodeKey, Resource, ResourceKind};

/// How much detail a renderer should show for each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Simple,
    Full,
}

/// Per-node payload: render mode plus the resource itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub mode: RenderMode,
    #[serde(flatten)]
    pub resource: Resource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeKey,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub data: NodeData,
}

impl GraphNode {
    pub fn new(resource: Resource, mode: RenderMode) -> Self {
        GraphNode {
            id: resource.node_key(),
            kind: resource.kind(),
            data: NodeData { mode, resource },
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.data.resource
    }
}
