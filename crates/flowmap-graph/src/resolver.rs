//! Producer and consumer resolution for a message.
//!
//! A service produces a message when one of its `sends` entries names the
//! message id with a version specifier the message's version satisfies;
//! `receives` works the same way for consumers. Data products take part
//! through their `outputs` (producer) and `inputs` (consumer) pointers.
//!
//! "Latest" is evaluated against the latest version of the message id, so a
//! service declaring `latest` is related to exactly one version.

use flowmap_core::{
    Catalog, ChannelRef, DataProduct, MessageRef, MessageRelation, Participant,
    ResourcePointer, Service, VersionSpec,
};

/// A participant related to a message, plus the channels named on the
/// matching declaration (`to` for producers, `from` for consumers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participation<'a> {
    pub participant: Participant<'a>,
    pub channels: &'a [ChannelRef],
}

/// Finds the producers and consumers of messages in a catalog.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        RelationshipResolver { catalog }
    }

    /// Services whose `sends` match the message, then data products whose
    /// `outputs` do. Catalog order within each group.
    pub fn producers_of(&self, message: MessageRef<'_>) -> Vec<Participation<'a>> {
        self.related(message, |s| &s.sends, |relation| &relation.to, |d| &d.outputs)
    }

    /// Services whose `receives` match the message, then data products whose
    /// `inputs` do. Catalog order within each group.
    pub fn consumers_of(&self, message: MessageRef<'_>) -> Vec<Participation<'a>> {
        self.related(message, |s| &s.receives, |relation| &relation.from, |d| &d.inputs)
    }

    fn related(
        &self,
        message: MessageRef<'_>,
        relations: impl Fn(&'a Service) -> &'a Vec<MessageRelation>,
        channels: impl Fn(&'a MessageRelation) -> &'a Vec<ChannelRef>,
        pointers: impl Fn(&'a DataProduct) -> &'a Vec<ResourcePointer>,
    ) -> Vec<Participation<'a>> {
        let latest = self
            .catalog
            .latest_version(message.kind.resource_kind(), message.id());
        let matches = |id: &str, spec: VersionSpec| {
            id == message.id() && spec.matches(message.version(), latest)
        };

        let services = self.catalog.services.iter().filter_map(|service| {
            relations(service)
                .iter()
                .find(|relation| matches(&relation.id, relation.spec()))
                .map(|relation| Participation {
                    participant: Participant::Service(service),
                    channels: channels(relation).as_slice(),
                })
        });

        let products = self
            .catalog
            .data_products
            .iter()
            .filter(|&product| {
                pointers(product)
                    .iter()
                    .any(|pointer| matches(&pointer.id, pointer.spec()))
            })
            .map(|product| Participation {
                participant: Participant::DataProduct(product),
                channels: &[],
            });

        services.chain(products).collect()
    }
}
