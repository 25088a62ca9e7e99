//! Graph assembly: from a catalog snapshot to a rendered node/edge graph.
//!
//! [`GraphAssembler`] is built once per snapshot and is cheap to discard.
//! Construction resolves the channel routing graph; every assembly call then
//! owns its own [`GraphBuilder`], so calls never share mutable state and the
//! same assembler can serve any number of views.
//!
//! # Views
//!
//! - [`GraphAssembler::message_graph`]: a focal message with all producers,
//!   consumers and the channels between them
//! - [`GraphAssembler::consumed_message_graph`]: one message flowing into a
//!   given target
//! - [`GraphAssembler::produced_message_graph`]: one message flowing out of a
//!   given source
//! - [`GraphAssembler::service_graph`]: everything a service sends and
//!   receives
//! - [`GraphAssembler::data_product_graph`]: a data product's inputs and
//!   outputs
//!
//! # Fallbacks
//!
//! Assembly never fails. A focal resource that does not exist yields an
//! empty graph, and a channel reference that does not resolve is treated as
//! if it were absent, which usually turns a routed edge into a direct one.

mod data_product;
mod flows;
mod message;
mod service;

use serde::{Deserialize, Serialize};

use flowmap_core::{Catalog, Channel, MessageRef, NodeKey, Participant, Resource};

use crate::channel::{ChannelChain, ChannelGraph};
use crate::edge::{Endpoint, GraphEdge, RootSourceAndTarget};
use crate::graph::GraphBuilder;
use crate::labels;
use crate::node::{GraphNode, RenderMode};
use crate::resolver::RelationshipResolver;

/// Knobs shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssemblyOptions {
    /// Copied into every node payload.
    pub mode: RenderMode,
    /// In the produced-message view, only show the latest version of each
    /// consumer.
    pub latest_consumers_only: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        AssemblyOptions {
            mode: RenderMode::Simple,
            latest_consumers_only: true,
        }
    }
}

/// Assembles rendered graphs over one immutable catalog snapshot.
#[derive(Debug)]
pub struct GraphAssembler<'a> {
    catalog: &'a Catalog,
    channels: ChannelGraph<'a>,
    resolver: RelationshipResolver<'a>,
    options: AssemblyOptions,
}

impl<'a> GraphAssembler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_options(catalog, AssemblyOptions::default())
    }

    pub fn with_options(catalog: &'a Catalog, options: AssemblyOptions) -> Self {
        GraphAssembler {
            catalog,
            channels: ChannelGraph::build(catalog),
            resolver: RelationshipResolver::new(catalog),
            options,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn channels(&self) -> &ChannelGraph<'a> {
        &self.channels
    }

    pub fn resolver(&self) -> &RelationshipResolver<'a> {
        &self.resolver
    }

    pub fn options(&self) -> AssemblyOptions {
        self.options
    }

    // -----------------------------------------------------------------------
    // Node and edge helpers shared by the views
    // -----------------------------------------------------------------------

    fn node(&self, resource: Resource) -> GraphNode {
        GraphNode::new(resource, self.options.mode)
    }

    fn message_node(&self, message: MessageRef<'_>) -> GraphNode {
        self.node(message.to_resource())
    }

    fn participant_node(&self, participant: Participant<'_>) -> GraphNode {
        self.node(participant.to_resource())
    }

    fn channel_node(&self, channel: &Channel) -> GraphNode {
        self.node(Resource::Channel(channel.clone()))
    }

    /// An edge carrying `message`, coloured after it and tagged with the
    /// relationship it belongs to.
    fn edge(
        &self,
        source: &NodeKey,
        target: &NodeKey,
        label: &str,
        message: MessageRef<'_>,
        root: &RootSourceAndTarget,
    ) -> GraphEdge {
        GraphEdge::new(source, target, label)
            .colored_by(message.id())
            .with_root(root.clone())
    }

    /// Draws `message -> hop -> ... -> hop`, then `last hop -> target` when a
    /// terminal is given. Returns the key of the last channel.
    fn render_chain(
        &self,
        builder: &mut GraphBuilder,
        message: MessageRef<'_>,
        chain: &ChannelChain<'_>,
        terminal: Option<(&NodeKey, &str)>,
        root: &RootSourceAndTarget,
    ) -> NodeKey {
        let mut previous = message.node_key();
        for channel in chain.hops() {
            let key = builder.add_node(self.channel_node(channel));
            builder.add_edge(self.edge(&previous, &key, labels::ROUTES_TO, message, root));
            previous = key;
        }
        if let Some((target, label)) = terminal {
            builder.add_edge(self.edge(&previous, target, label, message, root));
        }
        previous
    }
}

fn message_endpoint(message: MessageRef<'_>) -> Endpoint {
    Endpoint::new(message.node_key(), message.kind.resource_kind())
}

fn participant_endpoint(participant: Participant<'_>) -> Endpoint {
    Endpoint::new(participant.node_key(), participant.kind())
}

fn relationship(source: Endpoint, target: Endpoint) -> RootSourceAndTarget {
    RootSourceAndTarget { source, target }
}

/// Label for `producer -> message`.
fn produced_label(message: MessageRef<'_>, producer: Participant<'_>) -> &'static str {
    if producer.is_data_product() {
        labels::PRODUCES
    } else {
        labels::produced_by(message.kind)
    }
}

/// Label for a direct `message -> consumer` edge.
fn consumed_label(message: MessageRef<'_>, consumer: Participant<'_>) -> &'static str {
    if consumer.is_data_product() {
        labels::CONSUMED_BY
    } else {
        labels::consumed_by(message.kind)
    }
}

/// Label for the last hop `channel -> consumer`.
fn via_channel_label(message: MessageRef<'_>, consumer: Participant<'_>) -> &'static str {
    if consumer.is_data_product() {
        labels::CONSUMED_BY
    } else {
        labels::consumed_via_channel(message.kind)
    }
}

/// Label for a consumer whose declared channels all fail to resolve.
fn unrouted_label(consumer: Participant<'_>) -> &'static str {
    if consumer.is_data_product() {
        labels::CONSUMED_BY
    } else {
        labels::CONSUMES
    }
}
