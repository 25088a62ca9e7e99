//! The immutable catalog snapshot and its lookups.
//!
//! A [`Catalog`] holds every resource collection. It is loaded once, checked
//! for duplicate identities and then only read. All reference resolution goes
//! through here, so the rules for "latest" and version ranges live in one
//! place:
//!
//! - the latest version of an id is the highest coerced version among the
//!   resources of one kind sharing that id, with plain string order as the
//!   fallback when a version does not coerce
//! - a single-target lookup (channels, services) picks the exact version,
//!   the latest version, or the highest version satisfying a range
//! - a message lookup returns every version satisfying the specifier, except
//!   for "latest" which yields exactly one

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;
use crate::id::ResourceId;
use crate::resource::{
    Channel, ChannelRef, DataProduct, Message, MessageKind, MessageRef, ResourceKind,
    ResourcePointer, Service,
};
use crate::version::{compare_versions, VersionSpec};

/// Identity accessors shared by every collection element.
trait Versioned {
    fn id(&self) -> &str;
    fn version(&self) -> &str;
}

macro_rules! impl_versioned {
    ($($ty:ty),*) => {
        $(
            impl Versioned for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn version(&self) -> &str {
                    &self.version
                }
            }
        )*
    };
}

impl_versioned!(Service, Message, Channel, DataProduct);

fn latest_of<'a, T: Versioned>(items: &'a [T], id: &str) -> Option<&'a str> {
    items
        .iter()
        .filter(|item| item.id() == id)
        .map(Versioned::version)
        .max_by(|a, b| compare_versions(a, b))
}

/// Picks the single resource a pointer refers to.
fn select_one<'a, T: Versioned>(items: &'a [T], id: &str, spec: &VersionSpec) -> Option<&'a T> {
    let mut candidates = items.iter().filter(|item| item.id() == id);
    match spec {
        VersionSpec::Exact(v) => candidates.find(|item| item.version() == v),
        VersionSpec::Latest => {
            let latest = latest_of(items, id)?;
            candidates.find(|item| item.version() == latest)
        }
        range => candidates
            .filter(|item| range.matches(item.version(), None))
            .max_by(|a, b| compare_versions(a.version(), b.version())),
    }
}

/// Every resource a pointer matches, in collection order.
fn select_all<'a, T: Versioned>(items: &'a [T], id: &str, spec: &VersionSpec) -> Vec<&'a T> {
    let latest = latest_of(items, id);
    items
        .iter()
        .filter(|item| item.id() == id && spec.matches(item.version(), latest))
        .collect()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// An immutable snapshot of every catalog collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub events: Vec<Message>,
    #[serde(default)]
    pub commands: Vec<Message>,
    #[serde(default)]
    pub queries: Vec<Message>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub data_products: Vec<DataProduct>,
}

impl Catalog {
    /// Decodes a JSON snapshot and rejects duplicate identities.
    pub fn from_json(json: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.check_identities()?;
        debug!(
            services = catalog.services.len(),
            events = catalog.events.len(),
            commands = catalog.commands.len(),
            queries = catalog.queries.len(),
            channels = catalog.channels.len(),
            data_products = catalog.data_products.len(),
            "loaded catalog snapshot"
        );
        Ok(catalog)
    }

    /// Fails on the first `(id, version)` pair that appears twice within one
    /// collection.
    pub fn check_identities(&self) -> Result<(), CatalogError> {
        fn check<T: Versioned>(items: &[T], kind: ResourceKind) -> Result<(), CatalogError> {
            let mut seen = HashSet::new();
            for item in items {
                if !seen.insert((item.id(), item.version())) {
                    return Err(CatalogError::DuplicateResource {
                        kind,
                        id: item.id().to_string(),
                        version: item.version().to_string(),
                    });
                }
            }
            Ok(())
        }

        check(&self.services, ResourceKind::Service)?;
        check(&self.events, ResourceKind::Event)?;
        check(&self.commands, ResourceKind::Command)?;
        check(&self.queries, ResourceKind::Query)?;
        check(&self.channels, ResourceKind::Channel)?;
        check(&self.data_products, ResourceKind::DataProduct)
    }

    pub fn messages(&self, kind: MessageKind) -> &[Message] {
        match kind {
            MessageKind::Event => &self.events,
            MessageKind::Command => &self.commands,
            MessageKind::Query => &self.queries,
        }
    }

    /// Every message of every kind, events first.
    pub fn all_messages(&self) -> impl Iterator<Item = MessageRef<'_>> {
        MessageKind::ALL.into_iter().flat_map(move |kind| {
            self.messages(kind)
                .iter()
                .map(move |message| MessageRef::new(kind, message))
        })
    }

    // -----------------------------------------------------------------------
    // Identity lookups
    // -----------------------------------------------------------------------

    pub fn find_message(&self, kind: MessageKind, id: &str, version: &str) -> Option<MessageRef<'_>> {
        self.messages(kind)
            .iter()
            .find(|m| m.id == id && m.version == version)
            .map(|message| MessageRef::new(kind, message))
    }

    pub fn find_service(&self, id: &str, version: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.id == id && s.version == version)
    }

    pub fn find_channel(&self, id: &str, version: &str) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|c| c.id == id && c.version == version)
    }

    pub fn find_data_product(&self, id: &str, version: &str) -> Option<&DataProduct> {
        self.data_products
            .iter()
            .find(|d| d.id == id && d.version == version)
    }

    /// Latest version among the resources of `kind` sharing `id`.
    pub fn latest_version(&self, kind: ResourceKind, id: &str) -> Option<&str> {
        match kind {
            ResourceKind::Service => latest_of(&self.services, id),
            ResourceKind::Event => latest_of(&self.events, id),
            ResourceKind::Command => latest_of(&self.commands, id),
            ResourceKind::Query => latest_of(&self.queries, id),
            ResourceKind::Channel => latest_of(&self.channels, id),
            ResourceKind::DataProduct => latest_of(&self.data_products, id),
        }
    }

    // -----------------------------------------------------------------------
    // Pointer resolution
    // -----------------------------------------------------------------------

    /// Resolves a channel reference to at most one channel.
    pub fn resolve_channel(&self, pointer: &ChannelRef) -> Option<&Channel> {
        select_one(&self.channels, &pointer.id, &pointer.spec())
    }

    pub fn resolve_service(&self, pointer: &ResourcePointer) -> Option<&Service> {
        select_one(&self.services, &pointer.id, &pointer.spec())
    }

    /// All messages of any kind with `id` whose version satisfies `spec`.
    pub fn messages_matching(&self, id: &str, spec: &VersionSpec) -> Vec<MessageRef<'_>> {
        MessageKind::ALL
            .into_iter()
            .flat_map(|kind| {
                select_all(self.messages(kind), id, spec)
                    .into_iter()
                    .map(move |message| MessageRef::new(kind, message))
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Lint
    // -----------------------------------------------------------------------

    /// Every declared reference that resolves to nothing.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        let mut report = |owner_kind, owner: ResourceId, relation, target: &ResourcePointer| {
            dangling.push(DanglingReference {
                owner_kind,
                owner,
                relation,
                target: target.clone(),
            });
        };

        for service in &self.services {
            let owner = service.resource_id();
            for sent in &service.sends {
                let pointer = ResourcePointer::new(&sent.id, sent.version.as_deref());
                if self.messages_matching(&sent.id, &sent.spec()).is_empty() {
                    report(ResourceKind::Service, owner.clone(), RelationKind::Sends, &pointer);
                }
                for channel in sent.to.iter().filter(|c| self.resolve_channel(c).is_none()) {
                    report(ResourceKind::Service, owner.clone(), RelationKind::PublishesTo, channel);
                }
            }
            for received in &service.receives {
                let pointer = ResourcePointer::new(&received.id, received.version.as_deref());
                if self.messages_matching(&received.id, &received.spec()).is_empty() {
                    report(ResourceKind::Service, owner.clone(), RelationKind::Receives, &pointer);
                }
                for channel in received.from.iter().filter(|c| self.resolve_channel(c).is_none()) {
                    report(ResourceKind::Service, owner.clone(), RelationKind::ReadsFrom, channel);
                }
            }
        }

        for message in self.all_messages() {
            for channel in message.channels().iter().filter(|c| self.resolve_channel(c).is_none()) {
                report(
                    message.kind.resource_kind(),
                    message.resource_id(),
                    RelationKind::TravelsOn,
                    channel,
                );
            }
        }

        for channel in &self.channels {
            for route in channel.routes.iter().filter(|r| self.resolve_channel(r).is_none()) {
                report(ResourceKind::Channel, channel.resource_id(), RelationKind::Routes, route);
            }
        }

        let unresolved = |pointer: &ResourcePointer| {
            self.messages_matching(&pointer.id, &pointer.spec()).is_empty()
                && self.resolve_service(pointer).is_none()
        };
        for product in &self.data_products {
            for input in product.inputs.iter().filter(|p| unresolved(p)) {
                report(ResourceKind::DataProduct, product.resource_id(), RelationKind::Input, input);
            }
            for output in product.outputs.iter().filter(|p| unresolved(p)) {
                report(ResourceKind::DataProduct, product.resource_id(), RelationKind::Output, output);
            }
        }

        dangling
    }
}

// ---------------------------------------------------------------------------
// Dangling references
// ---------------------------------------------------------------------------

/// The kind of declaration a dangling reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    Sends,
    Receives,
    PublishesTo,
    ReadsFrom,
    TravelsOn,
    Routes,
    Input,
    Output,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RelationKind::Sends => "sends",
            RelationKind::Receives => "receives",
            RelationKind::PublishesTo => "publishes to",
            RelationKind::ReadsFrom => "reads from",
            RelationKind::TravelsOn => "travels on",
            RelationKind::Routes => "routes to",
            RelationKind::Input => "takes input",
            RelationKind::Output => "outputs",
        };
        f.write_str(text)
    }
}

/// A reference that no catalog resource satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingReference {
    pub owner_kind: ResourceKind,
    pub owner: ResourceId,
    pub relation: RelationKind,
    pub target: ResourcePointer,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}, which matches nothing",
            self.owner_kind, self.owner, self.relation, self.target
        )
    }
}
