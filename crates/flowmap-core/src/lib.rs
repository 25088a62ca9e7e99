//! Catalog data model for flowmap.
//!
//! An event-driven architecture catalog is a snapshot of services, messages
//! (events, commands, queries), channels and data products, together with the
//! `sends`/`receives`/`routes` relationships declared between them. This crate
//! owns that snapshot and the version rules used to follow relationships; the
//! graph engine in `flowmap-graph` only ever reads it.
//!
//! # Modules
//!
//! - [`id`]: composite node/edge keys and the `(id, version)` identity pair
//! - [`version`]: `Version`, `VersionSpec` and the version matcher
//! - [`resource`]: resource kinds, relationship declarations, borrowed views
//! - [`catalog`]: the immutable `Catalog` snapshot and its lookups
//! - [`error`]: `CatalogError`

pub mod catalog;
pub mod error;
pub mod id;
pub mod resource;
pub mod version;

pub use catalog::{Catalog, DanglingReference, RelationKind};
pub use error::CatalogError;
pub use id::{EdgeKey, NodeKey, ResourceId};
pub use resource::{
    Channel, ChannelRef, DataProduct, Message, MessageKind, MessageRef, MessageRelation,
    Participant, Resource, ResourceKind, ResourcePointer, Service,
};
pub use version::{Version, VersionSpec, XPattern};
