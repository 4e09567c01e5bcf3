//! OrgStore: the validated entity/relationship collection.
//!
//! The store is built once from loaded records and never mutated afterwards;
//! every interactive structure (hierarchy, view tree, filter output) derives
//! from it. Construction is where referential validation happens: an edge
//! whose endpoint names no known entity is dropped with a warning, never an
//! error.

use crate::properties::{Entity, EntityId, Jurisdiction, RelationKind, Relationship};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use super::RelGraph;

/// A relationship edge that referenced an unknown entity and was dropped
/// during store construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferentialGap {
    pub relationship_id: String,
    pub missing: EntityId,
}

/// Data-quality summary produced by [`OrgStore::integrity_report`]. Gaps and
/// duplicates indicate broken source data; cycles are legal input that the
/// hierarchy builder resolves, reported here as warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub gaps: Vec<ReferentialGap>,
    pub duplicate_entity_ids: Vec<EntityId>,
    pub duplicate_relationship_ids: Vec<String>,
    pub duplicate_edges: Vec<String>,
    pub structural_cycles: Vec<Vec<EntityId>>,
}

impl IntegrityReport {
    /// True when the source data has hard defects (cycles alone are not).
    pub fn has_errors(&self) -> bool {
        !self.gaps.is_empty()
            || !self.duplicate_entity_ids.is_empty()
            || !self.duplicate_relationship_ids.is_empty()
            || !self.duplicate_edges.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrgStore {
    entities: BTreeMap<EntityId, Entity>,
    /// Entity ids in source order. Derived views must stay deterministic and
    /// order-preserving relative to the input collections.
    order: Vec<EntityId>,
    relationships: Vec<Relationship>,
    relations: RelGraph,
    gaps: Vec<ReferentialGap>,
    duplicate_entity_ids: Vec<EntityId>,
}

impl fmt::Display for OrgStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrgStore({} entities, {} relationships)",
            self.order.len(),
            self.relationships.len()
        )
    }
}

impl OrgStore {
    /// Build a store from loaded records. Duplicate entity ids keep the first
    /// occurrence; relationships with an unknown endpoint are dropped and
    /// recorded as gaps. Never fails: an empty store is a valid store.
    pub fn new(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        let mut entity_map = BTreeMap::new();
        let mut order = Vec::with_capacity(entities.len());
        let mut duplicate_entity_ids = Vec::new();

        for entity in entities {
            if entity_map.contains_key(&entity.id) {
                tracing::warn!("duplicate entity id {}, keeping first occurrence", entity.id);
                duplicate_entity_ids.push(entity.id.clone());
                continue;
            }
            order.push(entity.id.clone());
            entity_map.insert(entity.id.clone(), entity);
        }

        let mut kept = Vec::with_capacity(relationships.len());
        let mut gaps = Vec::new();
        for relation in relationships {
            let mut missing = None;
            for endpoint in [&relation.source, &relation.target] {
                if !entity_map.contains_key(endpoint) {
                    missing = Some(endpoint.clone());
                    break;
                }
            }
            match missing {
                Some(missing) => {
                    tracing::warn!(
                        "dropping relationship {}: unknown entity {}",
                        relation.id,
                        missing
                    );
                    gaps.push(ReferentialGap {
                        relationship_id: relation.id.clone(),
                        missing,
                    });
                }
                None => kept.push(relation),
            }
        }

        let relations = RelGraph::from_relations(order.iter(), &kept);

        OrgStore {
            entities: entity_map,
            order,
            relationships: kept,
            relations,
            gaps,
            duplicate_entity_ids,
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Entities in source order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Validated relationships in source order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn relations(&self) -> &RelGraph {
        &self.relations
    }

    /// Count of edges dropped for referencing unknown entities.
    pub fn referential_gaps(&self) -> usize {
        self.gaps.len()
    }

    /// Relationships touching `id` from either side, in source order. Feeds
    /// the detail panel.
    pub fn relationships_for(&self, id: &EntityId) -> Vec<&Relationship> {
        let mut indices = self.relations.adjacent(id, Direction::Outgoing);
        indices.extend(self.relations.adjacent(id, Direction::Incoming));
        indices.sort_unstable();
        indices.dedup();
        indices.iter().map(|&i| &self.relationships[i]).collect()
    }

    /// True when a structural relation subordinates `id`: another entity
    /// oversees it, or it reports to something.
    pub fn has_structural_parent(&self, id: &EntityId) -> bool {
        self.relations
            .adjacent(id, Direction::Incoming)
            .iter()
            .any(|&i| self.relationships[i].kind == RelationKind::Oversees)
            || self
                .relations
                .adjacent(id, Direction::Outgoing)
                .iter()
                .any(|&i| self.relationships[i].kind == RelationKind::ReportsTo)
    }

    /// Structural superiors of `id`: sources of `oversees` edges targeting
    /// it plus targets of its own `reports_to` edges.
    pub fn parents_of(&self, id: &EntityId) -> Vec<EntityId> {
        let mut parents = Vec::new();
        for &i in &self.relations.adjacent(id, Direction::Incoming) {
            let relation = &self.relationships[i];
            if relation.kind == RelationKind::Oversees {
                parents.push(relation.source.clone());
            }
        }
        for &i in &self.relations.adjacent(id, Direction::Outgoing) {
            let relation = &self.relationships[i];
            if relation.kind == RelationKind::ReportsTo {
                parents.push(relation.target.clone());
            }
        }
        parents
    }

    /// Structural subordinates of `id` in relationship source order,
    /// deduplicated by child id (first occurrence wins). Children resolve
    /// store-wide; only root inference is jurisdiction-partitioned.
    pub fn children_of(&self, id: &EntityId) -> Vec<EntityId> {
        let mut hits: Vec<(usize, EntityId)> = Vec::new();
        for &i in &self.relations.adjacent(id, Direction::Outgoing) {
            let relation = &self.relationships[i];
            if relation.kind == RelationKind::Oversees {
                hits.push((i, relation.target.clone()));
            }
        }
        for &i in &self.relations.adjacent(id, Direction::Incoming) {
            let relation = &self.relationships[i];
            if relation.kind == RelationKind::ReportsTo {
                hits.push((i, relation.source.clone()));
            }
        }
        hits.sort_by_key(|(i, _)| *i);

        let mut seen = BTreeSet::new();
        hits.into_iter()
            .filter_map(|(_, child)| seen.insert(child.clone()).then_some(child))
            .collect()
    }

    /// Entity ids belonging to `jurisdiction`, in source order.
    pub fn jurisdiction_members(&self, jurisdiction: Jurisdiction) -> Vec<EntityId> {
        self.entities()
            .filter(|e| e.jurisdiction == jurisdiction)
            .map(|e| e.id.clone())
            .collect()
    }

    /// Full data-quality pass over the loaded set. Mirrors the upstream
    /// validation tooling: dangling references, duplicate ids, duplicate
    /// structural edges, structural cycles.
    pub fn integrity_report(&self) -> IntegrityReport {
        let mut seen_rel_ids = BTreeSet::new();
        let mut duplicate_relationship_ids = Vec::new();
        let mut seen_edges = BTreeSet::new();
        let mut duplicate_edges = Vec::new();

        for relation in &self.relationships {
            if !seen_rel_ids.insert(relation.id.clone()) {
                duplicate_relationship_ids.push(relation.id.clone());
            }
            let edge_key = (
                relation.source.clone(),
                relation.target.clone(),
                relation.kind,
            );
            if !seen_edges.insert(edge_key) {
                duplicate_edges.push(relation.id.clone());
            }
        }

        IntegrityReport {
            entity_count: self.order.len(),
            relationship_count: self.relationships.len(),
            gaps: self.gaps.clone(),
            duplicate_entity_ids: self.duplicate_entity_ids.clone(),
            duplicate_relationship_ids,
            duplicate_edges,
            structural_cycles: self.relations.structural_cycles(&self.relationships),
        }
    }
}
