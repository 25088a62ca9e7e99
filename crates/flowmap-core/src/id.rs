//! Identity and key newtypes for catalog resources and rendered graph entities.
//!
//! A resource is identified by its `(id, version)` pair. Rendered nodes use
//! the composite key `{id}-{version}`; edge keys concatenate the keys of both
//! endpoints, optionally followed by a suffix marking a synthetic edge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `(id, version)` identity pair of a catalog resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub id: String,
    pub version: String,
}

impl ResourceId {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        ResourceId {
            id: id.into(),
            version: version.into(),
        }
    }

    /// The rendered node key for this resource.
    pub fn node_key(&self) -> NodeKey {
        NodeKey::new(&self.id, &self.version)
    }
}

/// Stable node key, `{id}-{version}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(id: &str, version: &str) -> Self {
        NodeKey(format!("{id}-{version}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable edge key, `{source}-{target}` with an optional `-{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeKey(String);

impl EdgeKey {
    pub fn between(source: &NodeKey, target: &NodeKey) -> Self {
        EdgeKey(format!("{source}-{target}"))
    }

    /// Appends a synthetic-edge marker such as `both` or `warning`.
    pub fn with_suffix(self, suffix: &str) -> Self {
        EdgeKey(format!("{}-{suffix}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Display implementations -- print the raw key.

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
