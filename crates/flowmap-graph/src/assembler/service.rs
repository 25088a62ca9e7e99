//! Focal service view.

use tracing::debug;

use flowmap_core::{MessageRef, Participant, ResourceId};

use super::{message_endpoint, participant_endpoint, relationship, GraphAssembler};
use crate::graph::{GraphBuilder, NodeGraph};
use crate::labels;

impl<'a> GraphAssembler<'a> {
    /// Every message a service receives (with its producers) and sends (with
    /// its consumers).
    pub fn service_graph(&self, id: &str, version: &str) -> NodeGraph {
        let Some(service) = self.catalog.find_service(id, version) else {
            debug!(id, version, "focal service not found");
            return NodeGraph::default();
        };

        let participant = Participant::Service(service);
        let mut builder = GraphBuilder::new();
        let service_key = builder.add_node(self.participant_node(participant));

        let mut received: Vec<MessageRef<'a>> = Vec::new();
        for relation in &service.receives {
            let messages = self.catalog.messages_matching(&relation.id, &relation.spec());
            if messages.is_empty() {
                debug!(service = %service_key, message = %relation.id, "received message not found");
            }
            for message in messages {
                builder.merge(self.consumed_message_graph(message, participant, &relation.from));
                received.push(message);
            }
        }

        let mut sent: Vec<MessageRef<'a>> = Vec::new();
        for relation in &service.sends {
            let messages = self.catalog.messages_matching(&relation.id, &relation.spec());
            if messages.is_empty() {
                debug!(service = %service_key, message = %relation.id, "sent message not found");
            }
            for message in messages {
                builder.merge(self.produced_message_graph(message, participant, &relation.to));
                sent.push(message);
            }
        }

        // Messages the service both sends and receives.
        let sent_ids: Vec<(ResourceId, _)> = sent
            .iter()
            .map(|m| (m.resource_id(), m.kind))
            .collect();
        for message in received {
            if !sent_ids.contains(&(message.resource_id(), message.kind)) {
                continue;
            }
            let root = relationship(participant_endpoint(participant), message_endpoint(message));
            builder.add_edge(
                self.edge(
                    &service_key,
                    &message.node_key(),
                    &labels::service_both(message.kind),
                    message,
                    &root,
                )
                .with_suffix("both"),
            );
        }

        builder.finish()
    }
}
