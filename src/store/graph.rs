//! Graph data structures for representing entity relationships.
//!
//! [`RelGraph`] wraps a directed petgraph whose node weights are entity ids
//! and whose edge weights are indices into the owning store's relationship
//! list. Keeping the relationship index as the edge weight preserves source
//! ordering: any edge set pulled off the graph can be re-sorted into input
//! order before use.

use crate::properties::{EntityId, Relationship};
use petgraph::{algo::kosaraju_scc, graph::NodeIndex, visit::EdgeRef, Direction};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct RelGraph {
    graph: petgraph::Graph<EntityId, usize>,
    index: BTreeMap<EntityId, NodeIndex>,
}

impl RelGraph {
    /// Build the graph from validated relationships. Every entity id gets a
    /// node whether or not edges touch it; `relations` endpoints must already
    /// reference known entities.
    pub fn from_relations<'a, I>(entity_ids: I, relations: &[Relationship]) -> Self
    where
        I: IntoIterator<Item = &'a EntityId>,
    {
        let mut graph = petgraph::Graph::new();
        let mut index = BTreeMap::new();

        for id in entity_ids {
            if !index.contains_key(id) {
                let node_idx = graph.add_node(id.clone());
                index.insert(id.clone(), node_idx);
            }
        }

        for (rel_idx, relation) in relations.iter().enumerate() {
            let source_idx = index[&relation.source];
            let target_idx = index[&relation.target];
            graph.add_edge(source_idx, target_idx, rel_idx);
        }

        RelGraph { graph, index }
    }

    pub fn as_graph(&self) -> &petgraph::Graph<EntityId, usize> {
        &self.graph
    }

    pub fn node(&self, id: &EntityId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Relationship indices for edges adjacent to `id` in `direction`,
    /// sorted back into relationship input order.
    pub fn adjacent(&self, id: &EntityId, direction: Direction) -> Vec<usize> {
        let Some(node_idx) = self.node(id) else {
            return Vec::new();
        };
        let mut indices: Vec<usize> = self
            .graph
            .edges_directed(node_idx, direction)
            .map(|edge| *edge.weight())
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Strongly connected components of the structural subgraph with more
    /// than one member, plus structural self-loops: the cycles the hierarchy
    /// builder's cycle guard will cut. Reported by the validation pass.
    pub fn structural_cycles(&self, relations: &[Relationship]) -> Vec<Vec<EntityId>> {
        let mut subgraph = petgraph::Graph::<EntityId, ()>::new();
        let mut sub_index = BTreeMap::new();

        for edge in self.graph.raw_edges() {
            if !relations[edge.weight].is_structural() {
                continue;
            }
            let source = &self.graph[edge.source()];
            let target = &self.graph[edge.target()];
            for id in [source, target] {
                if !sub_index.contains_key(id) {
                    let node_idx = subgraph.add_node(id.clone());
                    sub_index.insert(id.clone(), node_idx);
                }
            }
            subgraph.add_edge(sub_index[source], sub_index[target], ());
        }

        let mut cycles: Vec<Vec<EntityId>> = kosaraju_scc(&subgraph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .map(|n| subgraph.find_edge(*n, *n).is_some())
                        .unwrap_or(false)
            })
            .map(|component| {
                let mut ids: Vec<EntityId> = component
                    .into_iter()
                    .map(|n| subgraph[n].clone())
                    .collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}
