//! Rendered graph edges and their metadata.
//!
//! Edge ids are derived from the endpoint keys, so adding the same
//! relationship twice always produces the same id. Synthetic edges carry a
//! suffix (`-both` for dual-role resources, `-warning` for a consumer with
//! no known producer).

use serde::{Deserialize, Serialize};

use flowmap_core::{EdgeKey, NodeKey, ResourceKind};

/// Default arrow size in pixels.
pub const DEFAULT_MARKER_SIZE: u32 = 20;
/// Arrow size for producer edges.
pub const PRODUCER_MARKER_SIZE: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "arrowclosed")]
    ArrowClosed,
}

/// Arrow marker drawn at the target end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerEnd {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub width: u32,
    pub height: u32,
}

impl MarkerEnd {
    pub const fn arrow(size: u32) -> Self {
        MarkerEnd {
            kind: MarkerKind::ArrowClosed,
            width: size,
            height: size,
        }
    }
}

impl Default for MarkerEnd {
    fn default() -> Self {
        MarkerEnd::arrow(DEFAULT_MARKER_SIZE)
    }
}

/// One end of the logical relationship an edge belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: NodeKey,
    pub collection: ResourceKind,
}

impl Endpoint {
    pub fn new(id: NodeKey, collection: ResourceKind) -> Self {
        Endpoint { id, collection }
    }
}

/// The relationship an edge is part of. For a channel hop this is the
/// producer/message or message/consumer pair, not the two channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootSourceAndTarget {
    pub source: Endpoint,
    pub target: Endpoint,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_source_and_target: Option<RootSourceAndTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: EdgeKey,
    pub source: NodeKey,
    pub target: NodeKey,
    pub label: String,
    pub animated: bool,
    pub marker_end: MarkerEnd,
    pub data: EdgeData,
}

impl GraphEdge {
    pub fn new(source: &NodeKey, target: &NodeKey, label: impl Into<String>) -> Self {
        GraphEdge {
            id: EdgeKey::between(source, target),
            source: source.clone(),
            target: target.clone(),
            label: label.into(),
            animated: false,
            marker_end: MarkerEnd::default(),
            data: EdgeData::default(),
        }
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.id = self.id.with_suffix(suffix);
        self
    }

    pub fn with_marker_size(mut self, size: u32) -> Self {
        self.marker_end = MarkerEnd::arrow(size);
        self
    }

    /// Colours the edge after the message it carries.
    pub fn colored_by(mut self, message_id: &str) -> Self {
        self.data.custom_color = Some(color_for(message_id));
        self
    }

    pub fn with_root(mut self, root: RootSourceAndTarget) -> Self {
        self.data.root_source_and_target = Some(root);
        self
    }
}

/// Deterministic `#rrggbb` colour derived from a string.
///
/// Uses the 32-bit string hash `h = c + (h << 5) - h` over UTF-16 code units
/// so colours stay stable across every renderer that shares the formula.
pub fn color_for(value: &str) -> String {
    let mut hash: i64 = 0;
    for unit in value.encode_utf16() {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        hash = i64::from(unit) + (shifted - hash);
    }
    let hash = hash as i32;
    let mut color = String::from("#");
    for i in 0..3 {
        let byte = (hash >> (i * 8)) & 0xff;
        color.push_str(&format!("{byte:02x}"));
    }
    color
}
