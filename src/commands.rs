use enumset::EnumSet;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    filter::FilterState,
    properties::{EntityClass, EntityId, Jurisdiction, RelationCategory},
    render::{
        Dimensions, EntityDetails, InputEvent, NetworkFrame, SearchHit, TreeFrame,
    },
    view::NodePath,
};

/// Command interface between the host's input handling and the chart
/// session. Every user interaction becomes one `Op`; dispatching it yields
/// an [`OpResult`] for the render bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Click on a tree node: branches toggle, leaves show details.
    NodeClick(NodePath),
    /// Toggle a branch without the leaf routing.
    Toggle(NodePath),
    ExpandAll,
    CollapseAll,
    SetJurisdictions(EnumSet<Jurisdiction>),
    SetClasses(EnumSet<EntityClass>),
    SetCategories(EnumSet<RelationCategory>),
    SetFilter(FilterState),
    /// Select an entity (network click or search hit).
    Select(EntityId),
    Hover(EntityId),
    HoverEnd,
    /// Run a search immediately (host already debounced).
    Search(String),
    /// Search keystroke, stamped with the host clock; rate-limited by the
    /// session's debouncer.
    SearchInput(String, u64),
    /// Timer tick draining the debouncer.
    PollSearch(u64),
    Resize(Dimensions),
    /// Re-emit the current frames unchanged.
    Refresh,
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Op::NodeClick(path) => write!(f, "NodeClick({path})"),
            Op::Toggle(path) => write!(f, "Toggle({path})"),
            Op::ExpandAll => write!(f, "ExpandAll"),
            Op::CollapseAll => write!(f, "CollapseAll"),
            Op::SetJurisdictions(set) => write!(f, "SetJurisdictions({set:?})"),
            Op::SetClasses(set) => write!(f, "SetClasses({set:?})"),
            Op::SetCategories(set) => write!(f, "SetCategories({set:?})"),
            Op::SetFilter(_) => write!(f, "SetFilter"),
            Op::Select(id) => write!(f, "Select({id})"),
            Op::Hover(id) => write!(f, "Hover({id})"),
            Op::HoverEnd => write!(f, "HoverEnd"),
            Op::Search(query) => write!(f, "Search({query})"),
            Op::SearchInput(query, at) => write!(f, "SearchInput({query}, {at})"),
            Op::PollSearch(at) => write!(f, "PollSearch({at})"),
            Op::Resize(dims) => write!(f, "Resize({}x{})", dims.width, dims.height),
            Op::Refresh => write!(f, "Refresh"),
        }
    }
}

impl Op {
    /// Map a render-bridge callback to a command. Drag events are layout
    /// concerns and map to nothing.
    pub fn from_event(event: InputEvent) -> Option<Op> {
        match event {
            InputEvent::NodeClick(path) => Some(Op::NodeClick(path)),
            InputEvent::NetworkClick(id) => Some(Op::Select(id)),
            InputEvent::NodeHover(id) => Some(Op::Hover(id)),
            InputEvent::HoverEnd => Some(Op::HoverEnd),
            InputEvent::DragStart(_, _) | InputEvent::Drag(_, _) | InputEvent::DragEnd(_, _) => {
                None
            }
            InputEvent::SearchInput(query, at) => Some(Op::SearchInput(query, at)),
            InputEvent::Resize(dims) => Some(Op::Resize(dims)),
        }
    }
}

/// What an operation produced. [`crate::session::apply_result`] maps each
/// variant onto the render bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OpResult {
    /// State unchanged (or nothing to show yet).
    None,
    Tree(TreeFrame),
    Network(NetworkFrame),
    /// Both frames, e.g. after a resize.
    Redraw(TreeFrame, NetworkFrame),
    Details(EntityDetails),
    SearchHits(Vec<SearchHit>),
    Highlight(EntityId),
    ClearHighlight,
    /// Terminal: data never loaded. Every subsequent op yields this again.
    Unavailable(String),
}

impl Display for OpResult {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            OpResult::None => write!(f, "None"),
            OpResult::Tree(frame) => write!(
                f,
                "Tree({} visible of {})",
                frame.stats.visible, frame.stats.total
            ),
            OpResult::Network(frame) => write!(
                f,
                "Network({} nodes, {} edges)",
                frame.nodes.len(),
                frame.edges.len()
            ),
            OpResult::Redraw(tree, network) => write!(
                f,
                "Redraw(tree: {} visible, network: {} nodes)",
                tree.stats.visible,
                network.nodes.len()
            ),
            OpResult::Details(details) => write!(
                f,
                "Details({}, {} relationships)",
                details.entity.id,
                details.relationships.len()
            ),
            OpResult::SearchHits(hits) => write!(f, "SearchHits({})", hits.len()),
            OpResult::Highlight(id) => write!(f, "Highlight({id})"),
            OpResult::ClearHighlight => write!(f, "ClearHighlight"),
            OpResult::Unavailable(msg) => write!(f, "Unavailable({msg})"),
        }
    }
}
