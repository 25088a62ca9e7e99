//! Focal message view.

use std::collections::HashSet;

use tracing::{debug, trace};

use flowmap_core::{MessageKind, ResourceId};

use super::{
    consumed_label, message_endpoint, participant_endpoint, produced_label, relationship,
    unrouted_label, via_channel_label, GraphAssembler,
};
use crate::edge::PRODUCER_MARKER_SIZE;
use crate::graph::{GraphBuilder, NodeGraph};
use crate::labels;

impl<'a> GraphAssembler<'a> {
    /// Everything connected to one message: its producers, its consumers and
    /// the channels it travels through.
    ///
    /// Channels are always drawn downstream of the message. A producer's
    /// `to` channels join the message's channel set; a consumer is routed
    /// through channels only when its own `from` list names one.
    pub fn message_graph(&self, kind: MessageKind, id: &str, version: &str) -> NodeGraph {
        let Some(message) = self.catalog.find_message(kind, id, version) else {
            debug!(%kind, id, version, "focal message not found");
            return NodeGraph::default();
        };

        let mut builder = GraphBuilder::new();
        let message_key = builder.add_node(self.message_node(message));
        let producers = self.resolver.producers_of(message);
        let consumers = self.resolver.consumers_of(message);
        let declared = self.channels.resolve_all(message.channels());
        trace!(
            message = %message_key,
            producers = producers.len(),
            consumers = consumers.len(),
            channels = declared.len(),
            "assembling message graph"
        );

        // Inbound: producer -> message, plus any route the producer's
        // channels take into the message's declared channels.
        let mut carried = declared.clone();
        for producer in &producers {
            let producer_key = builder.add_node(self.participant_node(producer.participant));
            let root = relationship(
                participant_endpoint(producer.participant),
                message_endpoint(message),
            );
            builder.add_edge(
                self.edge(
                    &producer_key,
                    &message_key,
                    produced_label(message, producer.participant),
                    message,
                    &root,
                )
                .with_marker_size(PRODUCER_MARKER_SIZE),
            );

            let outgoing = self.channels.resolve_all(producer.channels);
            if !declared.is_empty() {
                for source in &outgoing {
                    if let Some(chain) = self.channels.find_chain(&[*source], &declared) {
                        self.render_chain(&mut builder, message, &chain, None, &root);
                    }
                }
            }
            for channel in outgoing {
                if !carried.iter().any(|c| c.resource_id() == channel.resource_id()) {
                    carried.push(channel);
                }
            }
        }

        // Outbound: message -> consumer, routed when the consumer opts in.
        let producers_route_nowhere = !producers.is_empty() && carried.is_empty();
        for consumer in &consumers {
            let participant = consumer.participant;
            let consumer_key = builder.add_node(self.participant_node(participant));
            let root = relationship(message_endpoint(message), participant_endpoint(participant));

            if consumer.channels.is_empty() {
                builder.add_edge(self.edge(
                    &message_key,
                    &consumer_key,
                    consumed_label(message, participant),
                    message,
                    &root,
                ));
                continue;
            }

            let via = via_channel_label(message, participant);
            for pointer in consumer.channels {
                let Some(target) = self.channels.resolve(pointer) else {
                    debug!(consumer = %consumer_key, channel = %pointer, "consumer channel does not resolve, linking directly");
                    builder.add_edge(self.edge(
                        &message_key,
                        &consumer_key,
                        unrouted_label(participant),
                        message,
                        &root,
                    ));
                    continue;
                };
                match self.channels.find_chain(&carried, &[target]) {
                    Some(chain) => {
                        self.render_chain(&mut builder, message, &chain, Some((&consumer_key, via)), &root);
                    }
                    None => {
                        let channel_key = builder.add_node(self.channel_node(target));
                        builder.add_edge(self.edge(
                            &message_key,
                            &channel_key,
                            labels::ROUTES_TO,
                            message,
                            &root,
                        ));
                        if !producers_route_nowhere {
                            builder.add_edge(self.edge(&channel_key, &consumer_key, via, message, &root));
                        }
                    }
                }
            }
        }

        // Dual role: resources that both produce and consume the message.
        let consumer_ids: HashSet<ResourceId> = consumers
            .iter()
            .map(|c| c.participant.resource_id())
            .collect();
        for producer in &producers {
            if !consumer_ids.contains(&producer.participant.resource_id()) {
                continue;
            }
            let producer_key = producer.participant.node_key();
            let root = relationship(
                message_endpoint(message),
                participant_endpoint(producer.participant),
            );
            builder.add_edge(
                self.edge(
                    &message_key,
                    &producer_key,
                    labels::PUBLISHES_AND_SUBSCRIBES,
                    message,
                    &root,
                )
                .with_suffix("both"),
            );
        }

        builder.finish()
    }
}
