//! # civigraph
//!
//! A Rust library for deriving rooted organizational hierarchies from
//! relationship edge lists and maintaining interactive view state over them.
//!
//! ## Overview
//!
//! civigraph takes an organization's structure, a flat table of entities
//! (departments, elected offices, boards) plus a flat table of directed,
//! typed relationships between them (oversight, reporting, appointment),
//! and turns it into two renderable forms: a collapsible hierarchical tree
//! and a filtered relationship network. Drawing itself is delegated to an
//! external SVG/force-layout collaborator behind the
//! [`render::RenderBridge`] trait; the core stays synchronous, I/O-free and
//! fully testable without a rendering surface.
//!
//! ### Key Features
//!
//! - **Root inference**: jurisdiction-partitioned root detection from edge
//!   semantics, with a fail-open ladder for disconnected or cyclic data
//! - **Cycle-safe construction**: a path-set guard bounds recursion on any
//!   input; cycles degrade to childless leaves, never hangs or errors
//! - **Lossless view state**: expand/collapse moves subtrees between
//!   visible and hidden slots, so re-expanding restores the prior view
//!   exactly; state is per tree position, not per entity
//! - **Pure filtering**: deterministic, order-preserving entity/relationship
//!   reduction from enum-set predicates; empty output is a state, not an
//!   error
//! - **Command dispatch**: every interaction is an [`commands::Op`] in, an
//!   [`commands::OpResult`] out, keeping hosts free of core logic
//! - **Error tolerance**: malformed edges drop with a warning; a failed
//!   load degrades to a terminal data-unavailable display state
//!
//! ## Architecture
//!
//! The library is organized around several key components:
//!
//! - **[`store`]**: validated entity/relationship collection ([`store::OrgStore`])
//!   over a petgraph relationship graph
//! - **[`hierarchy`]**: rooted, leveled tree construction per jurisdiction
//! - **[`view`]**: mutable expand/collapse state ([`view::ViewTree`])
//! - **[`filter`]**: network-view predicates, search, debouncing
//! - **[`session`]**: the command-dispatch controller owning all of the above
//! - **[`render`]**: frame payloads and the bridge trait to the drawing layer
//! - **[`codec`]**: CSV source records in, compiled JSON dataset out
//! - **[`properties`]**: entity/relationship building blocks and classifiers
//!
//! Data flows `store → hierarchy → view → render bridge` for the tree view
//! and `store → filter → render bridge` for the network view; interaction
//! events flow back through [`session::Session::dispatch`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use civigraph::{
//!     codec::{parse_entities, parse_relationships},
//!     commands::Op,
//!     config::ChartConfig,
//!     session::Session,
//!     store::OrgStore,
//! };
//!
//! fn main() -> Result<(), civigraph::CivigraphError> {
//!     let entities = parse_entities(&std::fs::read_to_string("data/entities.csv")?)?;
//!     let relationships =
//!         parse_relationships(&std::fs::read_to_string("data/relationships.csv")?)?;
//!
//!     let store = OrgStore::new(entities, relationships);
//!     let mut session = Session::new(store, ChartConfig::default());
//!
//!     // Initial view: jurisdiction containers visible, collapsed.
//!     let frame = session.tree_frame();
//!     println!("{} visible of {}", frame.stats.visible, frame.stats.total);
//!
//!     // Every interaction is an Op.
//!     let result = session.dispatch(Op::ExpandAll)?;
//!     println!("{result}");
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Structural relations
//!
//! Only `oversees` and `reports_to` edges shape the tree: an entity is a
//! root when nothing oversees it and it reports to nothing; the children of
//! `E` are the targets it oversees plus the sources reporting to it, in
//! source order, deduplicated by id. Appointment and other categories are
//! retained for the detail panel but never affect placement.
//!
//! ### View state vs. structure
//!
//! The built [`hierarchy::HierarchyNode`] tree is immutable. The
//! [`view::ViewTree`] mirrors it with per-position `children`/`hidden`
//! slots, which is what makes collapse lossless and lets the same entity
//! hold different expand state at different tree positions.
//!
//! ### Failure semantics
//!
//! Nothing in the core is fatal: dangling edges and cycles degrade with
//! warnings, empty filter output renders as an empty state, and a failed
//! data fetch produces a session whose every op reports data-unavailable.
//!
//! ## Features
//!
//! - **default**: the synchronous core
//! - **wasm**: browser bindings ([`wasm::OrgChartWasm`])
//! - **service**: live-reload development server (used by the CLI)
//! - **bin**: the `civigraph` CLI (`validate`, `build`, `serve`)
//!
//! ## Module Guide
//!
//! Start with [`session::Session`] for the interactive surface, or
//! [`hierarchy::build_hierarchy`] to use tree construction standalone. See
//! [`properties`] for the data model.

pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod properties;
pub mod render;
pub mod session;
pub mod store;
#[cfg(test)]
mod tests;
pub mod view;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::*;
