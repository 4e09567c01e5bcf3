//! WASM bindings for civigraph
//!
//! This module provides the JavaScript-accessible chart session for the
//! browser-embedded viewer. The host fetches the data once, constructs an
//! [`OrgChartWasm`], wires DOM events to the op methods, and draws whatever
//! frames come back.
//!
//! ## Usage
//!
//! ```javascript,ignore
//! import init, { OrgChartWasm } from './civigraph.js';
//!
//! async function main() {
//!     await init();
//!
//!     let chart;
//!     try {
//!         const response = await fetch('dataset.json');
//!         chart = OrgChartWasm.from_json(await response.text(), null);
//!     } catch (err) {
//!         chart = OrgChartWasm.unavailable(String(err));
//!     }
//!
//!     drawTree(chart.tree());
//!     drawNetwork(chart.network());
//!
//!     // Frames echo each node's view path; hand it back on click.
//!     svg.on('click', (e) => apply(chart.node_click(e.target.dataset.path)));
//! }
//! ```
//!
//! Every op method returns the serialized `OpResult` as a plain JavaScript
//! object with external enum tagging, e.g. `{ Tree: { nodes: [...], links:
//! [...], stats: {...} } }` or `"ClearHighlight"` for unit variants. Frame
//! payloads contain only arrays and plain structs, never `Map` objects.

use wasm_bindgen::prelude::*;

use crate::{
    codec::{parse_entities, parse_relationships, Dataset},
    commands::{Op, OpResult},
    config::ChartConfig,
    error::CivigraphError,
    properties::{EntityClass, EntityId, Jurisdiction, RelationCategory},
    render::Dimensions,
    session::Session,
};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_wasm::set_as_global_default();
    });
}

fn parse_config(config_toml: Option<String>) -> ChartConfig {
    match config_toml {
        Some(text) => ChartConfig::from_toml(&text).unwrap_or_else(|err| {
            tracing::warn!("invalid config toml, using defaults: {err}");
            ChartConfig::default()
        }),
        None => ChartConfig::default(),
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|err| {
        tracing::warn!("result serialization failed: {err}");
        JsValue::NULL
    })
}

/// The browser chart session.
#[wasm_bindgen]
pub struct OrgChartWasm {
    session: Session,
}

impl OrgChartWasm {
    fn dispatch(&mut self, op: Op) -> JsValue {
        match self.session.dispatch(op) {
            Ok(result) => to_js(&result),
            Err(err) => to_js(&OpResult::Unavailable(err.to_string())),
        }
    }

    fn from_load(
        loaded: Result<Session, CivigraphError>,
        config: ChartConfig,
    ) -> OrgChartWasm {
        let session = loaded.unwrap_or_else(|err| {
            tracing::warn!("data load failed: {err}");
            Session::unavailable(err.to_string(), config)
        });
        OrgChartWasm { session }
    }
}

#[wasm_bindgen]
impl OrgChartWasm {
    /// Construct from a compiled `dataset.json` document. A parse failure
    /// yields a session in the terminal data-unavailable state rather than
    /// throwing.
    pub fn from_json(text: &str, config_toml: Option<String>) -> OrgChartWasm {
        init_tracing();
        let config = parse_config(config_toml);
        let loaded =
            Dataset::from_json(text).map(|dataset| Session::from_dataset(dataset, config.clone()));
        OrgChartWasm::from_load(loaded, config)
    }

    /// Construct from the raw CSV pair, for hosts that fetch the source
    /// tables directly.
    pub fn from_csv(
        entities_csv: &str,
        relationships_csv: &str,
        config_toml: Option<String>,
    ) -> OrgChartWasm {
        init_tracing();
        let config = parse_config(config_toml);
        let loaded = parse_entities(entities_csv).and_then(|entities| {
            let relationships = parse_relationships(relationships_csv)?;
            Ok(Session::from_dataset(
                Dataset::new(entities, relationships),
                config.clone(),
            ))
        });
        OrgChartWasm::from_load(loaded, config)
    }

    /// Construct directly in the data-unavailable state (fetch failed before
    /// any text arrived).
    pub fn unavailable(message: &str) -> OrgChartWasm {
        init_tracing();
        OrgChartWasm {
            session: Session::unavailable(message, ChartConfig::default()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.session.phase(), crate::session::Phase::Ready)
    }

    /// Current tree frame (nodes, links, stats) as a plain object.
    pub fn tree(&self) -> JsValue {
        to_js(&self.session.tree_frame())
    }

    /// Current filtered network frame (nodes, edges) as a plain object.
    pub fn network(&self) -> JsValue {
        to_js(&self.session.network_frame())
    }

    pub fn node_click(&mut self, path: &str) -> JsValue {
        match path.parse() {
            Ok(path) => self.dispatch(Op::NodeClick(path)),
            Err(err) => {
                tracing::warn!("bad node path from host: {err}");
                to_js(&OpResult::None)
            }
        }
    }

    pub fn toggle(&mut self, path: &str) -> JsValue {
        match path.parse() {
            Ok(path) => self.dispatch(Op::Toggle(path)),
            Err(err) => {
                tracing::warn!("bad node path from host: {err}");
                to_js(&OpResult::None)
            }
        }
    }

    pub fn expand_all(&mut self) -> JsValue {
        self.dispatch(Op::ExpandAll)
    }

    pub fn collapse_all(&mut self) -> JsValue {
        self.dispatch(Op::CollapseAll)
    }

    /// `jurisdictions` is a JS array of `"city" | "county" | "regional"`;
    /// an empty array means show nothing, pass all three for "all".
    pub fn set_jurisdictions(&mut self, jurisdictions: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<Vec<Jurisdiction>>(jurisdictions) {
            Ok(values) => self.dispatch(Op::SetJurisdictions(values.into_iter().collect())),
            Err(err) => to_js(&OpResult::Unavailable(
                CivigraphError::Command(format!("bad jurisdiction list: {err}")).to_string(),
            )),
        }
    }

    /// `classes` is a JS array of `"elected" | "departments" | "boards"`.
    pub fn set_classes(&mut self, classes: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<Vec<EntityClass>>(classes) {
            Ok(values) => self.dispatch(Op::SetClasses(values.into_iter().collect())),
            Err(err) => to_js(&OpResult::Unavailable(
                CivigraphError::Command(format!("bad class list: {err}")).to_string(),
            )),
        }
    }

    /// `categories` is a JS array of `"hierarchical" | "appointment" |
    /// "advisory" | "other"`.
    pub fn set_categories(&mut self, categories: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<Vec<RelationCategory>>(categories) {
            Ok(values) => self.dispatch(Op::SetCategories(values.into_iter().collect())),
            Err(err) => to_js(&OpResult::Unavailable(
                CivigraphError::Command(format!("bad category list: {err}")).to_string(),
            )),
        }
    }

    pub fn select(&mut self, id: &str) -> JsValue {
        self.dispatch(Op::Select(EntityId::from(id)))
    }

    pub fn hover(&mut self, id: &str) -> JsValue {
        self.dispatch(Op::Hover(EntityId::from(id)))
    }

    pub fn hover_end(&mut self) -> JsValue {
        self.dispatch(Op::HoverEnd)
    }

    /// Immediate search, bypassing the debouncer.
    pub fn search(&mut self, query: &str) -> JsValue {
        self.dispatch(Op::Search(query.to_string()))
    }

    /// Record a keystroke; pair with [`OrgChartWasm::poll_search`] on a
    /// timer. `now_ms` is any monotonic millisecond clock, e.g.
    /// `performance.now()`.
    pub fn search_input(&mut self, query: &str, now_ms: f64) -> JsValue {
        self.dispatch(Op::SearchInput(query.to_string(), now_ms as u64))
    }

    pub fn poll_search(&mut self, now_ms: f64) -> JsValue {
        self.dispatch(Op::PollSearch(now_ms as u64))
    }

    pub fn resize(&mut self, width: f32, height: f32) -> JsValue {
        self.dispatch(Op::Resize(Dimensions { width, height }))
    }

    /// Re-emit both frames unchanged.
    pub fn refresh(&mut self) -> JsValue {
        self.dispatch(Op::Refresh)
    }
}
