//! Mutable expand/collapse view state layered over an immutable hierarchy.
//!
//! The built [`HierarchyNode`](crate::hierarchy::HierarchyNode) tree is never
//! mutated by interaction. A [`ViewTree`] mirrors it with per-position state:
//! each [`ViewNode`] keeps its subtree in one of two slots, `children`
//! (visible) or `hidden`, so collapsing moves data aside instead of
//! deleting it, and re-expanding restores the prior view exactly. State is
//! keyed by tree position, not entity id: the same entity at two positions
//! tracks independent state.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{
    error::CivigraphError,
    hierarchy::HierarchyNode,
    properties::{EntityId, Jurisdiction},
};

/// Address of a view node: child indices from the root. The root itself is
/// the empty path. Rendered as `/`-separated indices for host interop.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        NodePath(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        NodePath(segments)
    }

    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", rendered.join("/"))
    }
}

impl FromStr for NodePath {
    type Err = CivigraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(NodePath::root());
        }
        let segments = s
            .split('/')
            .map(|seg| {
                seg.parse::<usize>().map_err(|_| {
                    CivigraphError::Command(format!("invalid node path segment '{seg}' in '{s}'"))
                })
            })
            .collect::<Result<Vec<usize>, CivigraphError>>()?;
        Ok(NodePath(segments))
    }
}

/// Outcome of a toggle, used by the session's node-click dispatch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Expanded,
    Collapsed,
    /// The node has no subtree; visibility state is untouched.
    Leaf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub id: String,
    pub title: String,
    pub person_name: Option<String>,
    pub entity: Option<EntityId>,
    pub jurisdiction: Option<Jurisdiction>,
    pub level: u32,
    expanded: bool,
    children: Vec<ViewNode>,
    hidden: Vec<ViewNode>,
}

impl ViewNode {
    fn mirror(node: &HierarchyNode) -> Self {
        ViewNode {
            id: node.id.clone(),
            title: node.title.clone(),
            person_name: node.person_name.clone(),
            entity: node.entity.clone(),
            jurisdiction: node.jurisdiction,
            level: node.level,
            expanded: true,
            children: node.children.iter().map(ViewNode::mirror).collect(),
            hidden: Vec::new(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// True when a subtree exists in either slot.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty() || !self.hidden.is_empty()
    }

    pub fn visible_children(&self) -> &[ViewNode] {
        &self.children
    }

    /// Ids of the subtree roots, wherever the subtree currently sits.
    pub fn child_ids(&self) -> Vec<&str> {
        let slot = if self.children.is_empty() {
            &self.hidden
        } else {
            &self.children
        };
        slot.iter().map(|c| c.id.as_str()).collect()
    }

    fn collapse_recursive(&mut self) {
        if !self.children.is_empty() {
            self.hidden = std::mem::take(&mut self.children);
        }
        self.expanded = false;
        for child in &mut self.hidden {
            child.collapse_recursive();
        }
    }

    fn expand_recursive(&mut self) {
        if !self.hidden.is_empty() {
            self.children = std::mem::take(&mut self.hidden);
        }
        self.expanded = true;
        for child in &mut self.children {
            child.expand_recursive();
        }
    }

    /// One-level toggle. Descendants keep their own expanded/collapsed
    /// state in the hidden slot, so re-expanding restores the prior view.
    fn toggle(&mut self) -> ToggleOutcome {
        if !self.children.is_empty() {
            self.hidden = std::mem::take(&mut self.children);
            self.expanded = false;
            ToggleOutcome::Collapsed
        } else if !self.hidden.is_empty() {
            self.children = std::mem::take(&mut self.hidden);
            self.expanded = true;
            ToggleOutcome::Expanded
        } else {
            ToggleOutcome::Leaf
        }
    }

    fn total_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .chain(self.hidden.iter())
            .map(ViewNode::total_count)
            .sum::<usize>()
    }

    fn find_entity(&self, id: &EntityId, path: NodePath) -> Option<NodePath> {
        if self.entity.as_ref() == Some(id) {
            return Some(path);
        }
        let slot = if self.children.is_empty() {
            &self.hidden
        } else {
            &self.children
        };
        for (index, child) in slot.iter().enumerate() {
            if let Some(found) = child.find_entity(id, path.child(index)) {
                return Some(found);
            }
        }
        None
    }
}

/// The view-state tree for the collapsible org chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTree {
    root: ViewNode,
}

impl ViewTree {
    /// Wrap a built hierarchy. Initial state shows the super-root and the
    /// jurisdiction containers, everything below collapsed.
    pub fn new(hierarchy: &HierarchyNode) -> Self {
        let mut root = ViewNode::mirror(hierarchy);
        for child in &mut root.children {
            child.collapse_recursive();
        }
        ViewTree { root }
    }

    pub fn root(&self) -> &ViewNode {
        &self.root
    }

    pub fn node(&self, path: &NodePath) -> Option<&ViewNode> {
        let mut current = &self.root;
        for &segment in path.segments() {
            current = current.children.get(segment)?;
        }
        Some(current)
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut ViewNode> {
        let mut current = &mut self.root;
        for &segment in path.segments() {
            current = current.children.get_mut(segment)?;
        }
        Some(current)
    }

    /// Toggle one level at `path`. Errors only on a path that resolves to no
    /// visible node (e.g. from a stale frame).
    pub fn toggle(&mut self, path: &NodePath) -> Result<ToggleOutcome, CivigraphError> {
        let node = self
            .node_mut(path)
            .ok_or_else(|| CivigraphError::NotFound(format!("no node at path '{path}'")))?;
        Ok(node.toggle())
    }

    /// Collapse the subtree at `path` transitively: every descendant ends up
    /// collapsed, unlike [`ViewTree::toggle`] which preserves their state.
    pub fn collapse_subtree(&mut self, path: &NodePath) -> Result<(), CivigraphError> {
        let node = self
            .node_mut(path)
            .ok_or_else(|| CivigraphError::NotFound(format!("no node at path '{path}'")))?;
        node.collapse_recursive();
        Ok(())
    }

    /// Expand every node. Idempotent.
    pub fn expand_all(&mut self) {
        self.root.expand_recursive();
    }

    /// Collapse everything below the top-level containers, which stay
    /// visible. Idempotent; matches the initial load state.
    pub fn collapse_all(&mut self) {
        for child in &mut self.root.children {
            child.collapse_recursive();
        }
    }

    /// Lazy preorder walk of the currently visible nodes (the root plus
    /// every node reachable through expanded nodes' visible children).
    /// Restartable: each call yields a fresh iterator.
    pub fn visible(&self) -> VisibleIter<'_> {
        VisibleIter {
            stack: vec![(NodePath::root(), &self.root)],
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Total node count, hidden subtrees included.
    pub fn total_count(&self) -> usize {
        self.root.total_count()
    }

    /// Parent→child pairs over the visible tree, for the tree renderer.
    pub fn visible_links(&self) -> Vec<(NodePath, NodePath)> {
        let mut links = Vec::new();
        for (path, node) in self.visible() {
            for (index, _) in node.children.iter().enumerate() {
                links.push((path.clone(), path.child(index)));
            }
        }
        links
    }

    /// First position of `id` anywhere in the tree, hidden slots included.
    pub fn find_entity(&self, id: &EntityId) -> Option<NodePath> {
        self.root.find_entity(id, NodePath::root())
    }
}

/// Iterator over `(path, node)` pairs of visible nodes, preorder.
pub struct VisibleIter<'a> {
    stack: Vec<(NodePath, &'a ViewNode)>,
}

impl<'a> Iterator for VisibleIter<'a> {
    type Item = (NodePath, &'a ViewNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (index, child) in node.children.iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ChartConfig, hierarchy::build_hierarchy, store::OrgStore};
    use crate::properties::RelationKind;
    use crate::tests::helpers::{entity, relation};

    fn two_level_tree() -> ViewTree {
        let store = OrgStore::new(
            vec![
                entity("mayor-001", "Office of the Mayor", "Mayor", "City of San Diego"),
                entity("city-fire-chief", "Fire Chief", "Fire Chief", "City of San Diego"),
                entity("fire-station-1", "Station 1", "Fire Station", "City of San Diego"),
            ],
            vec![
                relation("rel-001", "mayor-001", "city-fire-chief", RelationKind::Oversees),
                relation("rel-002", "city-fire-chief", "fire-station-1", RelationKind::Oversees),
            ],
        );
        ViewTree::new(&build_hierarchy(&store, &ChartConfig::default()))
    }

    #[test]
    fn initial_state_shows_containers_collapsed() {
        let tree = two_level_tree();
        // Visible: super-root + city container
        assert_eq!(tree.visible_count(), 2);
        assert_eq!(tree.total_count(), 5);
        let container = tree.node(&NodePath::root().child(0)).unwrap();
        assert!(!container.is_expanded());
        assert!(container.has_children());
    }

    #[test]
    fn node_path_round_trips_through_display() {
        let path = NodePath::root().child(0).child(2).child(1);
        let parsed: NodePath = path.to_string().parse().unwrap();
        assert_eq!(parsed, path);
        assert_eq!("".parse::<NodePath>().unwrap(), NodePath::root());
        assert!("0/x".parse::<NodePath>().is_err());
    }

    #[test]
    fn toggle_restores_descendant_state() {
        let mut tree = two_level_tree();
        let container = NodePath::root().child(0);
        let mayor = container.child(0);
        let chief = mayor.child(0);

        // Expand down to the fire chief, then expand the chief too.
        assert_eq!(tree.toggle(&container).unwrap(), ToggleOutcome::Expanded);
        assert_eq!(tree.toggle(&mayor).unwrap(), ToggleOutcome::Expanded);
        assert_eq!(tree.toggle(&chief).unwrap(), ToggleOutcome::Expanded);
        assert_eq!(tree.visible_count(), 5);

        // Collapse one level at the mayor; the chief's expansion must
        // survive in the hidden slot.
        assert_eq!(tree.toggle(&mayor).unwrap(), ToggleOutcome::Collapsed);
        assert_eq!(tree.visible_count(), 3);
        assert_eq!(tree.toggle(&mayor).unwrap(), ToggleOutcome::Expanded);
        assert_eq!(tree.visible_count(), 5);
        assert!(tree.node(&chief).unwrap().is_expanded());
    }

    #[test]
    fn stale_path_is_not_found() {
        let mut tree = two_level_tree();
        let bogus = NodePath::root().child(7);
        assert!(matches!(
            tree.toggle(&bogus),
            Err(CivigraphError::NotFound(_))
        ));
    }
}
