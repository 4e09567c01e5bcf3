//! The boundary to the external layout/drawing collaborator.
//!
//! The core computes plain-data frames; an SVG/force-layout engine on the
//! other side of [`RenderBridge`] draws them and feeds interaction events
//! back as [`InputEvent`]s. Sizing and labeling hints are computed here from
//! config so the drawing layer stays policy-free.

use serde::{Deserialize, Serialize};

use crate::{
    properties::{Entity, EntityClass, EntityId, Jurisdiction, RelationCategory, RelationKind,
        Relationship},
    view::NodePath,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStats {
    pub total: usize,
    pub visible: usize,
}

/// One visible node of the collapsible tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// View position, rendered as a `/`-separated index path. Echo it back
    /// in [`InputEvent::NodeClick`].
    pub path: String,
    pub id: String,
    pub title: String,
    pub person_name: Option<String>,
    pub jurisdiction: Option<Jurisdiction>,
    pub level: u32,
    pub radius: f32,
    pub has_children: bool,
    pub collapsed: bool,
}

/// Parent→child pair of visible tree positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeFrame {
    pub nodes: Vec<TreeNode>,
    pub links: Vec<TreeLink>,
    pub stats: ViewStats,
}

/// One node of the force-directed network view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: EntityId,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    pub class: EntityClass,
    pub radius: f32,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub id: String,
    pub source: EntityId,
    pub target: EntityId,
    pub kind: RelationKind,
    pub category: RelationCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkFrame {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

impl NetworkFrame {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Detail-panel payload: the selected entity and every relationship touching
/// it, in source order. The host groups by category and derives direction by
/// comparing endpoint ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDetails {
    pub entity: Entity,
    pub relationships: Vec<Relationship>,
}

/// One row of the search dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: EntityId,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    pub kind: String,
}

/// Operations the core invokes on the drawing layer.
pub trait RenderBridge {
    fn render_tree(&mut self, frame: &TreeFrame);
    fn render_network(&mut self, frame: &NetworkFrame);
    fn highlight(&mut self, id: &EntityId);
    fn clear_highlight(&mut self);
    fn show_details(&mut self, details: &EntityDetails);
    fn show_search(&mut self, hits: &[SearchHit]);
    /// A filter/search produced nothing; render an empty state, not an error.
    fn show_empty(&mut self, message: &str);
    /// Terminal data-unavailable display.
    fn show_error(&mut self, message: &str);
}

/// Interaction callbacks arriving from the drawing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Click on a tree node (by view position).
    NodeClick(NodePath),
    /// Click on a network node (by entity id).
    NetworkClick(EntityId),
    NodeHover(EntityId),
    HoverEnd,
    /// Drag lifecycle of a network node. Positions belong to the layout
    /// collaborator; the core ignores these.
    DragStart(EntityId, (f32, f32)),
    Drag(EntityId, (f32, f32)),
    DragEnd(EntityId, (f32, f32)),
    /// Keystroke in the search box, stamped with the host's monotonic
    /// millisecond clock for debouncing.
    SearchInput(String, u64),
    Resize(Dimensions),
}
