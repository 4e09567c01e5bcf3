//! Hierarchy construction: derives one rooted, leveled tree per jurisdiction
//! (plus a synthetic super-root) from the store's structural relationships.
//!
//! Root inference, child resolution and the cycle guard all operate on the
//! structural subset (`oversees`/`reports_to`). Appointment and other
//! relationship categories never influence tree shape; they surface in the
//! detail panel only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    config::ChartConfig,
    properties::{Entity, EntityId, Jurisdiction},
    store::OrgStore,
};

/// Node id of the synthetic super-root aggregating all jurisdictions.
pub const SUPER_ROOT_ID: &str = "root";

/// One node of the built hierarchy. Synthetic nodes (super-root and
/// jurisdiction containers) carry no entity reference. The same entity can
/// appear at several tree positions when the source edges put it under more
/// than one superior; each position is an independent node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: String,
    pub title: String,
    pub person_name: Option<String>,
    pub entity: Option<EntityId>,
    pub jurisdiction: Option<Jurisdiction>,
    pub level: u32,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn synthetic(id: &str, title: &str, jurisdiction: Option<Jurisdiction>, level: u32) -> Self {
        HierarchyNode {
            id: id.to_string(),
            title: title.to_string(),
            person_name: None,
            entity: None,
            jurisdiction,
            level,
            children: Vec::new(),
        }
    }

    fn from_entity(entity: &Entity, level: u32) -> Self {
        HierarchyNode {
            id: entity.id.to_string(),
            title: entity.display_title.clone(),
            person_name: entity.person_name.clone(),
            entity: Some(entity.id.clone()),
            jurisdiction: Some(entity.jurisdiction),
            level,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// Builds the hierarchy for a store. Never fails: malformed edges were
/// already dropped by the store, cycles are cut by the path guard, and an
/// empty store yields a bare super-root.
pub struct HierarchyBuilder<'a> {
    store: &'a OrgStore,
    config: &'a ChartConfig,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(store: &'a OrgStore, config: &'a ChartConfig) -> Self {
        HierarchyBuilder { store, config }
    }

    /// Produce the synthetic super-root (level 0) with one container child
    /// (level 1) per jurisdiction that has any entities. Jurisdiction roots
    /// sit at level 2; every child below is parent level + 1.
    pub fn build(&self) -> HierarchyNode {
        let mut root = HierarchyNode::synthetic(SUPER_ROOT_ID, &self.config.title, None, 0);
        for jurisdiction in Jurisdiction::all_in_order() {
            let container = self.build_jurisdiction(jurisdiction);
            if !container.children.is_empty() {
                root.children.push(container);
            }
        }
        tracing::debug!(
            "built hierarchy: {} jurisdictions, {} nodes",
            root.children.len(),
            root.descendant_count()
        );
        root
    }

    fn build_jurisdiction(&self, jurisdiction: Jurisdiction) -> HierarchyNode {
        let mut container = HierarchyNode::synthetic(
            jurisdiction.container_id(),
            self.config.jurisdiction_label(jurisdiction),
            Some(jurisdiction),
            1,
        );
        let members = self.store.jurisdiction_members(jurisdiction);
        let mut path = BTreeSet::new();
        for root_id in self.infer_roots(&members) {
            container
                .children
                .push(self.build_node(&root_id, 2, &mut path));
        }
        container
    }

    /// Root inference with the fail-open ladder: (1) entities no structural
    /// relation subordinates; (2) if none, entities whose structural parents
    /// all sit outside the jurisdiction; (3) if still none (fully cyclic
    /// data), every member. Never fails closed on non-empty input.
    fn infer_roots(&self, members: &[EntityId]) -> Vec<EntityId> {
        let roots: Vec<EntityId> = members
            .iter()
            .filter(|id| !self.store.has_structural_parent(id))
            .cloned()
            .collect();
        if !roots.is_empty() || members.is_empty() {
            return roots;
        }

        let member_set: BTreeSet<&EntityId> = members.iter().collect();
        let parentless: Vec<EntityId> = members
            .iter()
            .filter(|id| {
                self.store
                    .parents_of(id)
                    .iter()
                    .all(|parent| !member_set.contains(parent))
            })
            .cloned()
            .collect();
        if !parentless.is_empty() {
            tracing::warn!(
                "no structural roots found, falling back to {} parentless entities",
                parentless.len()
            );
            return parentless;
        }

        tracing::warn!(
            "fully cyclic jurisdiction, treating all {} entities as roots",
            members.len()
        );
        members.to_vec()
    }

    fn build_node(&self, id: &EntityId, level: u32, path: &mut BTreeSet<EntityId>) -> HierarchyNode {
        // Ids handed in here always resolve: members come from the store and
        // children_of only returns validated endpoints.
        let Some(entity) = self.store.get(id) else {
            return HierarchyNode::synthetic(id.as_str(), id.as_str(), None, level);
        };
        let mut node = HierarchyNode::from_entity(entity, level);
        path.insert(id.clone());
        for child_id in self.store.children_of(id) {
            if path.contains(&child_id) {
                // Back-edge on the current build path: emit a childless leaf
                // instead of recursing.
                tracing::warn!("structural cycle at {} -> {}, cutting descent", id, child_id);
                if let Some(child) = self.store.get(&child_id) {
                    node.children.push(HierarchyNode::from_entity(child, level + 1));
                }
            } else {
                node.children.push(self.build_node(&child_id, level + 1, path));
            }
        }
        path.remove(id);
        node
    }
}

/// Convenience wrapper for the one-shot build.
pub fn build_hierarchy(store: &OrgStore, config: &ChartConfig) -> HierarchyNode {
    HierarchyBuilder::new(store, config).build()
}
