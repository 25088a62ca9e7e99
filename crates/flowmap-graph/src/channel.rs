//! Channel routing graph and chain search.
//!
//! Channels declare `routes` to other channels. [`ChannelGraph`] resolves
//! every route once into a petgraph `DiGraph` and answers two questions:
//!
//! - do two sets of channels share a channel ([`ChannelGraph::has_direct_overlap`])
//! - what is the shortest route from one set to another
//!   ([`ChannelGraph::find_chain`])
//!
//! Routes may form cycles. The search keeps a visited set keyed by the
//! `(id, version)` identity of each channel, so it always terminates.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use smallvec::SmallVec;
use tracing::{debug, trace};

use flowmap_core::{Catalog, Channel, ChannelRef, ResourceId};

/// An ordered, non-empty route through channels. The first hop is in the
/// source set and the last hop is in the target set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelChain<'a> {
    hops: SmallVec<[&'a Channel; 4]>,
}

impl<'a> ChannelChain<'a> {
    pub fn hops(&self) -> &[&'a Channel] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn first(&self) -> &'a Channel {
        self.hops[0]
    }

    pub fn last(&self) -> &'a Channel {
        self.hops[self.hops.len() - 1]
    }

    /// Hops strictly between the first and last channel.
    pub fn intermediates(&self) -> &[&'a Channel] {
        if self.hops.len() <= 2 {
            &[]
        } else {
            &self.hops[1..self.hops.len() - 1]
        }
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.hops.iter().map(|c| c.id.as_str()).collect()
    }
}

/// The resolved channel routing topology of a catalog.
#[derive(Debug)]
pub struct ChannelGraph<'a> {
    catalog: &'a Catalog,
    graph: DiGraph<&'a Channel, ()>,
    index: HashMap<ResourceId, NodeIndex>,
}

impl<'a> ChannelGraph<'a> {
    /// Resolves every declared route. Routes to unknown channels are
    /// dropped.
    pub fn build(catalog: &'a Catalog) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        let nodes: Vec<NodeIndex> = catalog
            .channels
            .iter()
            .map(|channel| {
                let idx = graph.add_node(channel);
                index.insert(channel.resource_id(), idx);
                idx
            })
            .collect();

        for (channel, &from) in catalog.channels.iter().zip(&nodes) {
            for route in &channel.routes {
                let resolved = catalog
                    .resolve_channel(route)
                    .and_then(|target| index.get(&target.resource_id()));
                match resolved {
                    Some(&to) => {
                        graph.add_edge(from, to, ());
                    }
                    None => debug!(channel = %channel.resource_id(), route = %route, "dropping unresolved route"),
                }
            }
        }

        ChannelGraph {
            catalog,
            graph,
            index,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn route_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn resolve(&self, pointer: &ChannelRef) -> Option<&'a Channel> {
        self.catalog.resolve_channel(pointer)
    }

    /// Resolves a list of references, skipping unknown ones and collapsing
    /// references that land on the same channel.
    pub fn resolve_all(&self, pointers: &[ChannelRef]) -> Vec<&'a Channel> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(pointers.len());
        for pointer in pointers {
            match self.resolve(pointer) {
                Some(channel) if seen.insert(channel.resource_id()) => resolved.push(channel),
                Some(_) => {}
                None => trace!(channel = %pointer, "channel reference does not resolve"),
            }
        }
        resolved
    }

    /// Whether any channel appears in both sets.
    ///
    /// The assembler does not need this check on its own: [`find_chain`]
    /// returns a single-hop chain for a shared channel.
    ///
    /// [`find_chain`]: ChannelGraph::find_chain
    pub fn has_direct_overlap(&self, from: &[&Channel], to: &[&Channel]) -> bool {
        let targets: HashSet<ResourceId> = to.iter().map(|c| c.resource_id()).collect();
        from.iter().any(|c| targets.contains(&c.resource_id()))
    }

    /// Shortest route that starts in `from` and ends in `to`, following
    /// declared routes.
    ///
    /// Sources are explored in the order given and neighbours in declaration
    /// order, so ties resolve to the earliest declared path. A channel present
    /// in both sets yields a single-hop chain.
    pub fn find_chain(&self, from: &[&'a Channel], to: &[&'a Channel]) -> Option<ChannelChain<'a>> {
        let targets: HashSet<ResourceId> = to.iter().map(|c| c.resource_id()).collect();
        if targets.is_empty() {
            return None;
        }

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::new();
        for channel in from {
            if let Some(&idx) = self.index.get(&channel.resource_id()) {
                if visited.insert(idx) {
                    queue.push_back(idx);
                }
            }
        }

        while let Some(current) = queue.pop_front() {
            if targets.contains(&self.graph[current].resource_id()) {
                return Some(self.reconstruct(current, &parent));
            }
            // petgraph yields the most recently added edge first.
            let mut next: SmallVec<[NodeIndex; 4]> = self.graph.neighbors(current).collect();
            next.reverse();
            for neighbour in next {
                if visited.insert(neighbour) {
                    parent.insert(neighbour, current);
                    queue.push_back(neighbour);
                }
            }
        }
        None
    }

    fn reconstruct(&self, end: NodeIndex, parent: &HashMap<NodeIndex, NodeIndex>) -> ChannelChain<'a> {
        let mut hops: SmallVec<[&'a Channel; 4]> = SmallVec::new();
        let mut cursor = Some(end);
        while let Some(idx) = cursor {
            hops.push(self.graph[idx]);
            cursor = parent.get(&idx).copied();
        }
        hops.reverse();
        ChannelChain { hops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: &str, routes: &[&str]) -> Channel {
        Channel {
            id: id.into(),
            name: None,
            version: "1.0.0".into(),
            address: None,
            protocols: vec![],
            routes: routes.iter().map(|r| ChannelRef::new(*r, Some("1.0.0"))).collect(),
        }
    }

    fn catalog(channels: Vec<Channel>) -> Catalog {
        Catalog {
            channels,
            ..Catalog::default()
        }
    }

    fn find<'a>(graph: &ChannelGraph<'a>, id: &str) -> &'a Channel {
        graph
            .resolve(&ChannelRef::new(id, Some("1.0.0")))
            .unwrap()
    }

    #[test]
    fn finds_multi_hop_chain() {
        let catalog = catalog(vec![
            channel("eventbridge", &["sns"]),
            channel("sns", &["sqs"]),
            channel("sqs", &[]),
        ]);
        let graph = ChannelGraph::build(&catalog);
        assert_eq!(graph.route_count(), 2);

        let chain = graph
            .find_chain(&[find(&graph, "eventbridge")], &[find(&graph, "sqs")])
            .unwrap();
        assert_eq!(chain.ids(), vec!["eventbridge", "sns", "sqs"]);
        assert_eq!(chain.first().id, "eventbridge");
        assert_eq!(chain.last().id, "sqs");
        assert_eq!(chain.intermediates().len(), 1);
    }

    #[test]
    fn shared_channel_is_a_single_hop_chain() {
        let catalog = catalog(vec![channel("orders", &[])]);
        let graph = ChannelGraph::build(&catalog);
        let orders = find(&graph, "orders");
        assert!(graph.has_direct_overlap(&[orders], &[orders]));
        let chain = graph.find_chain(&[orders], &[orders]).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(chain.intermediates().is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let catalog = catalog(vec![
            channel("a", &["b"]),
            channel("b", &["a"]),
            channel("island", &[]),
        ]);
        let graph = ChannelGraph::build(&catalog);
        assert!(graph
            .find_chain(&[find(&graph, "a")], &[find(&graph, "island")])
            .is_none());
    }

    #[test]
    fn routes_are_directed() {
        let catalog = catalog(vec![channel("a", &["b"]), channel("b", &[])]);
        let graph = ChannelGraph::build(&catalog);
        assert!(graph
            .find_chain(&[find(&graph, "b")], &[find(&graph, "a")])
            .is_none());
    }

    #[test]
    fn picks_shortest_then_first_declared_route() {
        let catalog = catalog(vec![
            channel("start", &["left", "right", "long"]),
            channel("left", &["end"]),
            channel("right", &["end"]),
            channel("long", &["mid"]),
            channel("mid", &["end"]),
            channel("end", &[]),
        ]);
        let graph = ChannelGraph::build(&catalog);
        let chain = graph
            .find_chain(&[find(&graph, "start")], &[find(&graph, "end")])
            .unwrap();
        assert_eq!(chain.ids(), vec!["start", "left", "end"]);
    }

    #[test]
    fn unresolved_routes_are_dropped() {
        let catalog = catalog(vec![channel("a", &["ghost"])]);
        let graph = ChannelGraph::build(&catalog);
        assert_eq!(graph.channel_count(), 1);
        assert_eq!(graph.route_count(), 0);
    }

    #[test]
    fn resolve_all_skips_unknown_and_duplicate_references() {
        let catalog = catalog(vec![channel("a", &[])]);
        let graph = ChannelGraph::build(&catalog);
        let resolved = graph.resolve_all(&[
            ChannelRef::new("a", None),
            ChannelRef::new("a", Some("1.0.0")),
            ChannelRef::new("b", None),
        ]);
        assert_eq!(resolved.len(), 1);
    }
}
