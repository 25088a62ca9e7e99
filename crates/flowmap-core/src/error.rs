//! Core error types for flowmap-core.
//!
//! Errors only arise while loading or validating a catalog snapshot. Graph
//! assembly never fails: missing resources degrade to empty graphs or direct
//! edges instead.

use thiserror::Error;

use crate::resource::ResourceKind;

/// Errors produced while decoding or validating a catalog snapshot.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The snapshot was not valid JSON or did not match the catalog schema.
    #[error("failed to decode catalog snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    /// Two resources of the same kind share an `(id, version)` identity.
    #[error("duplicate {kind}: '{id}' version '{version}'")]
    DuplicateResource {
        kind: ResourceKind,
        id: String,
        version: String,
    },

    /// A version specifier could not be parsed.
    #[error("invalid version spec '{spec}': {reason}")]
    InvalidVersionSpec { spec: String, reason: String },
}
