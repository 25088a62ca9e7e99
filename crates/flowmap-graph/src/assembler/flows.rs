//! Single-direction message views used by the service and data-product
//! graphs.
//!
//! The two views are asymmetric. Flowing into a target, a
//! channel is only drawn when the target names one in `from`. Flowing out of
//! a source, the source's `to` channels are always drawn, and consumers
//! without a `from` list are linked to the message directly alongside them.

use tracing::{debug, trace};

use flowmap_core::{ChannelRef, MessageRef, Participant};

use super::{
    consumed_label, message_endpoint, participant_endpoint, produced_label, relationship,
    unrouted_label, via_channel_label, GraphAssembler,
};
use crate::edge::PRODUCER_MARKER_SIZE;
use crate::graph::{GraphBuilder, NodeGraph};
use crate::labels;

impl<'a> GraphAssembler<'a> {
    /// `message` flowing into `target`, read from `target_channels`, with
    /// every producer of the message.
    pub fn consumed_message_graph(
        &self,
        message: MessageRef<'_>,
        target: Participant<'_>,
        target_channels: &[ChannelRef],
    ) -> NodeGraph {
        let mut builder = GraphBuilder::new();
        let message_key = builder.add_node(self.message_node(message));
        let target_key = builder.add_node(self.participant_node(target));
        let root = relationship(message_endpoint(message), participant_endpoint(target));
        let label = consumed_label(message, target);
        let via = via_channel_label(message, target);
        let producers = self.resolver.producers_of(message);

        if producers.is_empty() && target_channels.is_empty() {
            trace!(message = %message_key, "no known producer");
            builder.add_edge(
                self.edge(&message_key, &target_key, label, message, &root)
                    .with_suffix("warning"),
            );
        }

        let hydrated = self.channels.resolve_all(target_channels);
        for pointer in target_channels {
            match self.channels.resolve(pointer) {
                None => {
                    debug!(channel = %pointer, "target channel does not resolve, linking directly");
                    builder.add_edge(self.edge(
                        &message_key,
                        &target_key,
                        unrouted_label(target),
                        message,
                        &root,
                    ));
                }
                Some(channel) => {
                    let channel_key = builder.add_node(self.channel_node(channel));
                    if producers.is_empty() {
                        builder.add_edge(self.edge(
                            &message_key,
                            &channel_key,
                            labels::ROUTES_TO,
                            message,
                            &root,
                        ));
                        builder.add_edge(self.edge(&channel_key, &target_key, via, message, &root));
                    }
                }
            }
        }

        for producer in &producers {
            let producer_key = builder.add_node(self.participant_node(producer.participant));
            let inbound = relationship(
                participant_endpoint(producer.participant),
                message_endpoint(message),
            );
            builder.add_edge(
                self.edge(
                    &producer_key,
                    &message_key,
                    produced_label(message, producer.participant),
                    message,
                    &inbound,
                )
                .with_marker_size(PRODUCER_MARKER_SIZE),
            );

            if hydrated.is_empty() {
                builder.add_edge(self.edge(&message_key, &target_key, label, message, &root));
                continue;
            }

            // Producer publishes nowhere in particular: the message reaches
            // the target's channels, but which hop delivers it is unknown.
            if producer.channels.is_empty() {
                for channel in &hydrated {
                    builder.add_edge(self.edge(
                        &message_key,
                        &channel.node_key(),
                        labels::ROUTES_TO,
                        message,
                        &root,
                    ));
                }
                continue;
            }

            for pointer in producer.channels {
                let Some(source) = self.channels.resolve(pointer) else {
                    debug!(channel = %pointer, "producer channel does not resolve, linking directly");
                    builder.add_edge(self.edge(&message_key, &target_key, label, message, &root));
                    continue;
                };
                for &channel in &hydrated {
                    match self.channels.find_chain(&[source], &[channel]) {
                        Some(chain) => {
                            self.render_chain(&mut builder, message, &chain, Some((&target_key, via)), &root);
                            break;
                        }
                        None => {
                            let channel_key = builder.add_node(self.channel_node(channel));
                            builder.add_edge(self.edge(
                                &message_key,
                                &channel_key,
                                labels::ROUTES_TO,
                                message,
                                &root,
                            ));
                        }
                    }
                }
            }
        }

        builder.finish()
    }

    /// `message` flowing out of `source` over `source_channels`, with every
    /// consumer of the message.
    pub fn produced_message_graph(
        &self,
        message: MessageRef<'_>,
        source: Participant<'_>,
        source_channels: &[ChannelRef],
    ) -> NodeGraph {
        let mut builder = GraphBuilder::new();
        let message_key = builder.add_node(self.message_node(message));
        let source_key = builder.add_node(self.participant_node(source));
        let inbound = relationship(participant_endpoint(source), message_endpoint(message));
        builder.add_edge(
            self.edge(
                &source_key,
                &message_key,
                produced_label(message, source),
                message,
                &inbound,
            )
            .with_marker_size(PRODUCER_MARKER_SIZE),
        );

        let outgoing = self.channels.resolve_all(source_channels);
        for channel in &outgoing {
            let channel_key = builder.add_node(self.channel_node(channel));
            builder.add_edge(self.edge(
                &message_key,
                &channel_key,
                labels::ROUTES_TO,
                message,
                &inbound,
            ));
        }
        if outgoing.len() < source_channels.len() {
            debug!(source = %source_key, "some source channels do not resolve");
        }

        for consumer in self.resolver.consumers_of(message) {
            let participant = consumer.participant;
            if self.options.latest_consumers_only && !self.is_latest(participant) {
                trace!(consumer = %participant.node_key(), "skipping older consumer version");
                continue;
            }
            let consumer_key = builder.add_node(self.participant_node(participant));
            let root = relationship(message_endpoint(message), participant_endpoint(participant));
            let via = via_channel_label(message, participant);

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

            for pointer in consumer.channels {
                let Some(channel) = self.channels.resolve(pointer) else {
                    builder.add_edge(self.edge(
                        &message_key,
                        &consumer_key,
                        unrouted_label(participant),
                        message,
                        &root,
                    ));
                    continue;
                };
                let channel_key = builder.add_node(self.channel_node(channel));

                if outgoing.is_empty() {
                    builder.add_edge(self.edge(
                        &message_key,
                        &channel_key,
                        labels::ROUTES_TO,
                        message,
                        &root,
                    ));
                    builder.add_edge(self.edge(&channel_key, &consumer_key, via, message, &root));
                    continue;
                }

                for &start in &outgoing {
                    match self.channels.find_chain(&[start], &[channel]) {
                        Some(chain) => {
                            self.render_chain(&mut builder, message, &chain, Some((&consumer_key, via)), &root);
                        }
                        None => {
                            builder.add_edge(self.edge(
                                &message_key,
                                &channel_key,
                                labels::ROUTES_TO,
                                message,
                                &root,
                            ));
                            builder.add_edge(self.edge(&channel_key, &consumer_key, via, message, &root));
                        }
                    }
                }
            }
        }

        builder.finish()
    }

    fn is_latest(&self, participant: Participant<'_>) -> bool {
        self.catalog
            .latest_version(participant.kind(), participant.id())
            == Some(participant.version())
    }
}
