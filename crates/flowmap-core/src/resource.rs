//! Catalog resources and the relationships declared between them.
//!
//! Resources are plain records deserialized from a catalog snapshot. Services
//! declare which messages they send and receive (optionally through
//! channels), channels declare routes to other channels, and data products
//! declare input and output pointers. All references are by id plus an
//! optional version specifier, resolved lazily through the [`Catalog`].
//!
//! [`Catalog`]: crate::catalog::Catalog

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{NodeKey, ResourceId};
use crate::version::VersionSpec;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The closed set of resource kinds. Serializes as the collection name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "services")]
    Service,
    #[serde(rename = "events")]
    Event,
    #[serde(rename = "commands")]
    Command,
    #[serde(rename = "queries")]
    Query,
    #[serde(rename = "channels")]
    Channel,
    #[serde(rename = "data-products")]
    DataProduct,
}

impl ResourceKind {
    /// Collection name used as the rendered node type.
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Service => "services",
            ResourceKind::Event => "events",
            ResourceKind::Command => "commands",
            ResourceKind::Query => "queries",
            ResourceKind::Channel => "channels",
            ResourceKind::DataProduct => "data-products",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Service => "service",
            ResourceKind::Event => "event",
            ResourceKind::Command => "command",
            ResourceKind::Query => "query",
            ResourceKind::Channel => "channel",
            ResourceKind::DataProduct => "data product",
        };
        f.write_str(name)
    }
}

/// The three message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Event,
    Command,
    Query,
}

impl MessageKind {
    pub const ALL: [MessageKind; 3] = [MessageKind::Event, MessageKind::Command, MessageKind::Query];

    pub fn resource_kind(self) -> ResourceKind {
        match self {
            MessageKind::Event => ResourceKind::Event,
            MessageKind::Command => ResourceKind::Command,
            MessageKind::Query => ResourceKind::Query,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.resource_kind().fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Pointers and relationship declarations
// ---------------------------------------------------------------------------

/// A reference to another resource: an id plus an optional version
/// specifier. An omitted version means "latest".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePointer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Channel references use the same shape as any other pointer.
pub type ChannelRef = ResourcePointer;

impl ResourcePointer {
    pub fn new(id: impl Into<String>, version: Option<&str>) -> Self {
        ResourcePointer {
            id: id.into(),
            version: version.map(str::to_string),
        }
    }

    pub fn spec(&self) -> VersionSpec {
        VersionSpec::from_declared(self.version.as_deref())
    }
}

impl fmt::Display for ResourcePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version.as_deref().unwrap_or("latest"))
    }
}

/// One entry of a service's `sends` or `receives` list.
///
/// `to` lists the channels a sent message is published on; `from` lists the
/// channels a received message is read from. Either may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRelation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<ChannelRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<ChannelRef>,
}

impl MessageRelation {
    pub fn new(id: impl Into<String>, version: Option<&str>) -> Self {
        MessageRelation {
            id: id.into(),
            version: version.map(str::to_string),
            to: Vec::new(),
            from: Vec::new(),
        }
    }

    pub fn via(mut self, channels: Vec<ChannelRef>) -> Self {
        self.to = channels;
        self
    }

    pub fn reading(mut self, channels: Vec<ChannelRef>) -> Self {
        self.from = channels;
        self
    }

    pub fn spec(&self) -> VersionSpec {
        VersionSpec::from_declared(self.version.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub sends: Vec<MessageRelation>,
    #[serde(default)]
    pub receives: Vec<MessageRelation>,
}

/// An event, command or query. The kind comes from the collection it is
/// stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Channels the message declares it travels on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<ChannelRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,
    /// Channels this channel forwards to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<ChannelRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProduct {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub inputs: Vec<ResourcePointer>,
    #[serde(default)]
    pub outputs: Vec<ResourcePointer>,
}

/// Shared accessors for the identity fields every resource carries.
macro_rules! impl_identity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                pub fn resource_id(&self) -> ResourceId {
                    ResourceId::new(&self.id, &self.version)
                }

                pub fn node_key(&self) -> NodeKey {
                    NodeKey::new(&self.id, &self.version)
                }

                /// Display name, falling back to the id.
                pub fn display_name(&self) -> &str {
                    self.name.as_deref().unwrap_or(&self.id)
                }
            }
        )*
    };
}

impl_identity!(Service, Message, Channel, DataProduct);

/// A resource of any kind, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    #[serde(rename = "service")]
    Service(Service),
    #[serde(rename = "event")]
    Event(Message),
    #[serde(rename = "command")]
    Command(Message),
    #[serde(rename = "query")]
    Query(Message),
    #[serde(rename = "channel")]
    Channel(Channel),
    #[serde(rename = "dataProduct")]
    DataProduct(DataProduct),
}

impl Resource {
    pub fn message(kind: MessageKind, message: Message) -> Self {
        match kind {
            MessageKind::Event => Resource::Event(message),
            MessageKind::Command => Resource::Command(message),
            MessageKind::Query => Resource::Query(message),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Service(_) => ResourceKind::Service,
            Resource::Event(_) => ResourceKind::Event,
            Resource::Command(_) => ResourceKind::Command,
            Resource::Query(_) => ResourceKind::Query,
            Resource::Channel(_) => ResourceKind::Channel,
            Resource::DataProduct(_) => ResourceKind::DataProduct,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Resource::Service(s) => &s.id,
            Resource::Event(m) | Resource::Command(m) | Resource::Query(m) => &m.id,
            Resource::Channel(c) => &c.id,
            Resource::DataProduct(d) => &d.id,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            Resource::Service(s) => &s.version,
            Resource::Event(m) | Resource::Command(m) | Resource::Query(m) => &m.version,
            Resource::Channel(c) => &c.version,
            Resource::DataProduct(d) => &d.version,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Resource::Service(s) => s.display_name(),
            Resource::Event(m) | Resource::Command(m) | Resource::Query(m) => m.display_name(),
            Resource::Channel(c) => c.display_name(),
            Resource::DataProduct(d) => d.display_name(),
        }
    }

    pub fn node_key(&self) -> NodeKey {
        NodeKey::new(self.id(), self.version())
    }
}

// ---------------------------------------------------------------------------
// Borrowed views
// ---------------------------------------------------------------------------

/// A message borrowed from the catalog together with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef<'a> {
    pub kind: MessageKind,
    pub message: &'a Message,
}

impl<'a> MessageRef<'a> {
    pub fn new(kind: MessageKind, message: &'a Message) -> Self {
        MessageRef { kind, message }
    }

    pub fn id(&self) -> &'a str {
        &self.message.id
    }

    pub fn version(&self) -> &'a str {
        &self.message.version
    }

    /// Declared channels; empty when the message declares none.
    pub fn channels(&self) -> &'a [ChannelRef] {
        self.message.channels.as_deref().unwrap_or(&[])
    }

    pub fn node_key(&self) -> NodeKey {
        self.message.node_key()
    }

    pub fn resource_id(&self) -> ResourceId {
        self.message.resource_id()
    }

    pub fn to_resource(&self) -> Resource {
        Resource::message(self.kind, self.message.clone())
    }
}

/// A resource that can produce or consume messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant<'a> {
    Service(&'a Service),
    DataProduct(&'a DataProduct),
}

impl<'a> Participant<'a> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Participant::Service(_) => ResourceKind::Service,
            Participant::DataProduct(_) => ResourceKind::DataProduct,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            Participant::Service(s) => &s.id,
            Participant::DataProduct(d) => &d.id,
        }
    }

    pub fn version(&self) -> &'a str {
        match self {
            Participant::Service(s) => &s.version,
            Participant::DataProduct(d) => &d.version,
        }
    }

    pub fn is_data_product(&self) -> bool {
        matches!(self, Participant::DataProduct(_))
    }

    pub fn resource_id(&self) -> ResourceId {
        ResourceId::new(self.id(), self.version())
    }

    pub fn node_key(&self) -> NodeKey {
        NodeKey::new(self.id(), self.version())
    }

    pub fn to_resource(&self) -> Resource {
        match self {
            Participant::Service(s) => Resource::Service((*s).clone()),
            Participant::DataProduct(d) => Resource::DataProduct((*d).clone()),
        }
    }
}
