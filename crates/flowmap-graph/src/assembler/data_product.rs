//! Focal data-product view.

use tracing::debug;

use flowmap_core::{MessageRef, NodeKey, Participant, ResourcePointer};

use super::{
    message_endpoint, participant_endpoint, produced_label, relationship, GraphAssembler,
};
use crate::edge::{GraphEdge, PRODUCER_MARKER_SIZE};
use crate::graph::{GraphBuilder, NodeGraph};
use crate::labels;

/// What a data-product pointer resolved to.
enum Linked<'a> {
    Messages(Vec<MessageRef<'a>>),
    Service(Participant<'a>),
    Nothing,
}

impl<'a> GraphAssembler<'a> {
    /// A data product with its inputs (and their producers) and outputs.
    pub fn data_product_graph(&self, id: &str, version: &str) -> NodeGraph {
        let Some(product) = self.catalog.find_data_product(id, version) else {
            debug!(id, version, "focal data product not found");
            return NodeGraph::default();
        };

        let focal = Participant::DataProduct(product);
        let mut builder = GraphBuilder::new();
        let product_key = builder.add_node(self.participant_node(focal));
        let product_end = participant_endpoint(focal);

        for input in &product.inputs {
            match self.link(input) {
                Linked::Messages(messages) => {
                    for message in messages {
                        let message_key = builder.add_node(self.message_node(message));
                        self.add_producers(&mut builder, message, &message_key);
                        let root = relationship(message_endpoint(message), product_end.clone());
                        builder.add_edge(self.edge(
                            &message_key,
                            &product_key,
                            labels::INPUT,
                            message,
                            &root,
                        ));
                    }
                }
                Linked::Service(service) => {
                    let service_key = builder.add_node(self.participant_node(service));
                    builder.add_edge(
                        GraphEdge::new(&service_key, &product_key, labels::INPUT)
                            .colored_by(service.id())
                            .with_root(relationship(
                                participant_endpoint(service),
                                product_end.clone(),
                            )),
                    );
                }
                Linked::Nothing => {
                    debug!(product = %product_key, input = %input, "input does not resolve");
                }
            }
        }

        for output in &product.outputs {
            match self.link(output) {
                Linked::Messages(messages) => {
                    for message in messages {
                        let message_key = builder.add_node(self.message_node(message));
                        let root = relationship(product_end.clone(), message_endpoint(message));
                        builder.add_edge(self.edge(
                            &product_key,
                            &message_key,
                            labels::OUTPUT,
                            message,
                            &root,
                        ));
                    }
                }
                Linked::Service(service) => {
                    let service_key = builder.add_node(self.participant_node(service));
                    builder.add_edge(
                        GraphEdge::new(&product_key, &service_key, labels::OUTPUT)
                            .colored_by(service.id())
                            .with_root(relationship(
                                product_end.clone(),
                                participant_endpoint(service),
                            )),
                    );
                }
                Linked::Nothing => {
                    debug!(product = %product_key, output = %output, "output does not resolve");
                }
            }
        }

        builder.finish()
    }

    /// Messages take precedence over a service with the same id.
    fn link(&self, pointer: &ResourcePointer) -> Linked<'a> {
        let messages = self.catalog.messages_matching(&pointer.id, &pointer.spec());
        if !messages.is_empty() {
            return Linked::Messages(messages);
        }
        match self.catalog.resolve_service(pointer) {
            Some(service) => Linked::Service(Participant::Service(service)),
            None => Linked::Nothing,
        }
    }

    /// Producer nodes and `producer -> message` edges, without channels or
    /// consumers.
    fn add_producers(&self, builder: &mut GraphBuilder, message: MessageRef<'_>, message_key: &NodeKey) {
        for producer in self.resolver.producers_of(message) {
            let producer_key = builder.add_node(self.participant_node(producer.participant));
            let root = relationship(
                participant_endpoint(producer.participant),
                message_endpoint(message),
            );
            builder.add_edge(
                self.edge(
                    &producer_key,
                    message_key,
                    produced_label(message, producer.participant),
                    message,
                    &root,
                )
                .with_marker_size(PRODUCER_MARKER_SIZE),
            );
        }
    }
}
