//! The chart session: command dispatch over the core structures.
//!
//! A [`Session`] owns the store, the built hierarchy, the view tree and the
//! filter state, and turns [`Op`]s into [`OpResult`]s synchronously. It is
//! the only mutable aggregate in the crate; the host shell (wasm bindings,
//! tests, a native embedder) holds exactly one per chart and calls
//! [`Session::dispatch`] from its event handlers.
//!
//! A failed data load constructs the session in a terminal `Unavailable`
//! phase: no partially-initialized structures are reachable, and every
//! subsequent op re-emits the data-unavailable result.

use serde::{Deserialize, Serialize};

use crate::{
    codec::Dataset,
    commands::{Op, OpResult},
    config::ChartConfig,
    error::CivigraphError,
    filter::{filter, search, Debouncer, FilterState},
    hierarchy::{build_hierarchy, HierarchyNode},
    properties::EntityId,
    render::{
        Dimensions, EntityDetails, NetworkEdge, NetworkFrame, NetworkNode, RenderBridge,
        SearchHit, TreeFrame, TreeLink, TreeNode, ViewStats,
    },
    store::OrgStore,
    view::{NodePath, ToggleOutcome, ViewTree},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Ready,
    /// Terminal: the one-time data fetch failed.
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    config: ChartConfig,
    store: OrgStore,
    hierarchy: HierarchyNode,
    view: ViewTree,
    filters: FilterState,
    debouncer: Debouncer,
    selection: Option<EntityId>,
    dimensions: Dimensions,
    phase: Phase,
}

impl Session {
    /// Wrap a loaded store. Builds the hierarchy once; the view tree starts
    /// with everything below the jurisdiction containers collapsed.
    pub fn new(store: OrgStore, config: ChartConfig) -> Self {
        let hierarchy = build_hierarchy(&store, &config);
        let view = ViewTree::new(&hierarchy);
        let debouncer = Debouncer::new(config.debounce_ms);
        let dimensions = Dimensions {
            width: config.width,
            height: config.height,
        };
        Session {
            config,
            store,
            hierarchy,
            view,
            filters: FilterState::default(),
            debouncer,
            selection: None,
            dimensions,
            phase: Phase::Ready,
        }
    }

    pub fn from_dataset(dataset: Dataset, config: ChartConfig) -> Self {
        Session::new(dataset.into_store(), config)
    }

    /// Construct the terminal failure session. The store is empty and the
    /// phase never leaves `Unavailable`.
    pub fn unavailable<S: Into<String>>(message: S, config: ChartConfig) -> Self {
        let mut session = Session::new(OrgStore::default(), config);
        session.phase = Phase::Unavailable(message.into());
        session
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn store(&self) -> &OrgStore {
        &self.store
    }

    pub fn hierarchy(&self) -> &HierarchyNode {
        &self.hierarchy
    }

    pub fn view(&self) -> &ViewTree {
        &self.view
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn selection(&self) -> Option<&EntityId> {
        self.selection.as_ref()
    }

    /// Last dimensions reported by the host, for layout hand-off.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Dispatch one command. Synchronous and re-entrant-safe: only the
    /// session's own view/filter/selection state mutates. Stale node paths
    /// and unknown ids degrade to `OpResult::None` with a warning.
    pub fn dispatch(&mut self, op: Op) -> Result<OpResult, CivigraphError> {
        tracing::debug!("dispatch {op}");
        if let Phase::Unavailable(message) = &self.phase {
            return Ok(OpResult::Unavailable(message.clone()));
        }
        match op {
            Op::NodeClick(path) => self.node_click(&path),
            Op::Toggle(path) => match self.view.toggle(&path) {
                Ok(_) => Ok(OpResult::Tree(self.tree_frame())),
                Err(err) => Ok(self.stale_input(err)),
            },
            Op::ExpandAll => {
                self.view.expand_all();
                Ok(OpResult::Tree(self.tree_frame()))
            }
            Op::CollapseAll => {
                self.view.collapse_all();
                Ok(OpResult::Tree(self.tree_frame()))
            }
            Op::SetJurisdictions(set) => {
                self.filters.jurisdictions = set;
                Ok(OpResult::Network(self.network_frame()))
            }
            Op::SetClasses(set) => {
                self.filters.classes = set;
                Ok(OpResult::Network(self.network_frame()))
            }
            Op::SetCategories(set) => {
                self.filters.categories = set;
                Ok(OpResult::Network(self.network_frame()))
            }
            Op::SetFilter(state) => {
                self.filters = state;
                Ok(OpResult::Network(self.network_frame()))
            }
            Op::Select(id) => self.select(&id),
            Op::Hover(id) => {
                if self.store.get(&id).is_some() {
                    Ok(OpResult::Highlight(id))
                } else {
                    Ok(self.stale_input(CivigraphError::NotFound(id.to_string())))
                }
            }
            Op::HoverEnd => Ok(OpResult::ClearHighlight),
            Op::Search(query) => Ok(OpResult::SearchHits(self.search_hits(&query))),
            Op::SearchInput(query, at) => {
                self.debouncer.push(query, at);
                Ok(OpResult::None)
            }
            Op::PollSearch(at) => match self.debouncer.poll(at) {
                Some(query) => Ok(OpResult::SearchHits(self.search_hits(&query))),
                None => Ok(OpResult::None),
            },
            Op::Resize(dims) => {
                self.dimensions = dims;
                Ok(OpResult::Redraw(self.tree_frame(), self.network_frame()))
            }
            Op::Refresh => Ok(OpResult::Redraw(self.tree_frame(), self.network_frame())),
        }
    }

    /// Node-click dispatch rule: branches toggle one level, leaves surface
    /// their entity's details. Synthetic leaves (an empty container) are a
    /// no-op.
    fn node_click(&mut self, path: &NodePath) -> Result<OpResult, CivigraphError> {
        match self.view.toggle(path) {
            Ok(ToggleOutcome::Expanded) | Ok(ToggleOutcome::Collapsed) => {
                Ok(OpResult::Tree(self.tree_frame()))
            }
            Ok(ToggleOutcome::Leaf) => {
                let entity_id = self
                    .view
                    .node(path)
                    .and_then(|node| node.entity.clone());
                match entity_id {
                    Some(id) => self.select(&id),
                    None => Ok(OpResult::None),
                }
            }
            Err(err) => Ok(self.stale_input(err)),
        }
    }

    fn select(&mut self, id: &EntityId) -> Result<OpResult, CivigraphError> {
        let Some(entity) = self.store.get(id) else {
            return Ok(self.stale_input(CivigraphError::NotFound(id.to_string())));
        };
        self.selection = Some(id.clone());
        let relationships = self
            .store
            .relationships_for(id)
            .into_iter()
            .cloned()
            .collect();
        Ok(OpResult::Details(EntityDetails {
            entity: entity.clone(),
            relationships,
        }))
    }

    /// Host handed us an id/path that no longer resolves (stale frame).
    /// Recoverable: warn and show nothing.
    fn stale_input(&self, err: CivigraphError) -> OpResult {
        tracing::warn!("ignoring stale input: {err}");
        OpResult::None
    }

    fn search_hits(&self, query: &str) -> Vec<SearchHit> {
        search(&self.store, query, self.config.search_limit)
            .into_iter()
            .map(|entity| SearchHit {
                id: entity.id.clone(),
                name: entity.name.clone(),
                jurisdiction: entity.jurisdiction,
                kind: entity.kind.clone(),
            })
            .collect()
    }

    /// The visible tree as renderer payload. Cheap to recompute; resize and
    /// refresh re-emit it unchanged for the same view state.
    pub fn tree_frame(&self) -> TreeFrame {
        let nodes = self
            .view
            .visible()
            .map(|(path, node)| TreeNode {
                path: path.to_string(),
                id: node.id.clone(),
                title: node.title.clone(),
                person_name: node.person_name.clone(),
                jurisdiction: node.jurisdiction,
                level: node.level,
                radius: self.config.level_radius(node.level),
                has_children: node.has_children(),
                collapsed: node.has_children() && !node.is_expanded(),
            })
            .collect();
        let links = self
            .view
            .visible_links()
            .into_iter()
            .map(|(source, target)| TreeLink {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect();
        TreeFrame {
            nodes,
            links,
            stats: ViewStats {
                total: self.view.total_count(),
                visible: self.view.visible_count(),
            },
        }
    }

    /// The filtered network as renderer payload. An empty frame renders as
    /// an empty state, never as an error.
    pub fn network_frame(&self) -> NetworkFrame {
        let result = filter(&self.store, &self.filters);
        let nodes = result
            .entities
            .iter()
            .map(|entity| NetworkNode {
                id: entity.id.clone(),
                name: entity.name.clone(),
                jurisdiction: entity.jurisdiction,
                class: entity.class,
                radius: self.config.class_radius(entity.class),
                show_label: self.config.show_label(entity.class),
            })
            .collect();
        let edges = result
            .relationships
            .iter()
            .map(|relationship| NetworkEdge {
                id: relationship.id.clone(),
                source: relationship.source.clone(),
                target: relationship.target.clone(),
                kind: relationship.kind,
                category: relationship.category,
            })
            .collect();
        NetworkFrame { nodes, edges }
    }
}

/// Map an [`OpResult`] onto the render bridge.
pub fn apply_result<B: RenderBridge>(result: &OpResult, bridge: &mut B) {
    match result {
        OpResult::None => {}
        OpResult::Tree(frame) => bridge.render_tree(frame),
        OpResult::Network(frame) => {
            if frame.is_empty() {
                bridge.show_empty("No entities match the current filters");
            } else {
                bridge.render_network(frame);
            }
        }
        OpResult::Redraw(tree, network) => {
            bridge.render_tree(tree);
            if network.is_empty() {
                bridge.show_empty("No entities match the current filters");
            } else {
                bridge.render_network(network);
            }
        }
        OpResult::Details(details) => {
            bridge.highlight(&details.entity.id);
            bridge.show_details(details);
        }
        OpResult::SearchHits(hits) => bridge.show_search(hits),
        OpResult::Highlight(id) => bridge.highlight(id),
        OpResult::ClearHighlight => bridge.clear_highlight(),
        OpResult::Unavailable(message) => bridge.show_error(message),
    }
}
