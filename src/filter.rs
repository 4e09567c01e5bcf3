//! Filter engine for the network view, plus entity search.
//!
//! Filtering is a pure function from `(store, state)` to a reduced
//! entity/relationship pair: recomputed in full on every change, always
//! deterministic and order-preserving relative to the store. An empty result
//! is a valid outcome (renders as an empty state), distinct from a load
//! failure.

use enumset::EnumSet;
use regex::{escape as re_escape, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    properties::{Entity, EntityClass, EntityId, Jurisdiction, RelationCategory, Relationship},
    store::OrgStore,
};

/// Predicate configuration for the network view. Each dimension admits a set
/// of variants; the full set means "all" (the filter-button default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub jurisdictions: EnumSet<Jurisdiction>,
    pub classes: EnumSet<EntityClass>,
    pub categories: EnumSet<RelationCategory>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            jurisdictions: EnumSet::all(),
            classes: EnumSet::all(),
            categories: EnumSet::all(),
        }
    }
}

impl FilterState {
    /// True when every dimension admits everything (the identity filter).
    pub fn is_all(&self) -> bool {
        self.jurisdictions == EnumSet::all()
            && self.classes == EnumSet::all()
            && self.categories == EnumSet::all()
    }

    pub fn entity_passes(&self, entity: &Entity) -> bool {
        self.jurisdictions.contains(entity.jurisdiction) && self.classes.contains(entity.class)
    }
}

/// The reduced set the network view renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl FilterResult {
    /// Empty output is not an error; the caller renders an empty-state
    /// message instead of an error panel.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Apply `state` to the store. An entity passes when both entity predicates
/// admit it; a relationship passes when both endpoints passed and its
/// category is admitted.
pub fn filter(store: &OrgStore, state: &FilterState) -> FilterResult {
    let entities: Vec<Entity> = store
        .entities()
        .filter(|e| state.entity_passes(e))
        .cloned()
        .collect();

    let ids: BTreeSet<&EntityId> = entities.iter().map(|e| &e.id).collect();

    let relationships: Vec<Relationship> = store
        .relationships()
        .iter()
        .filter(|r| {
            ids.contains(&r.source) && ids.contains(&r.target) && state.categories.contains(r.category)
        })
        .cloned()
        .collect();

    FilterResult {
        entities,
        relationships,
    }
}

/// Case-insensitive entity-name search in store order, truncated to `limit`.
/// The query is regex-escaped before matching; a blank query matches
/// nothing.
pub fn search<'a>(store: &'a OrgStore, query: &str, limit: usize) -> Vec<&'a Entity> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let matcher = match RegexBuilder::new(&re_escape(trimmed))
        .case_insensitive(true)
        .build()
    {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::warn!("search matcher build failed for '{trimmed}': {err}");
            return Vec::new();
        }
    };
    store
        .entities()
        .filter(|e| matcher.is_match(&e.name))
        .take(limit)
        .collect()
}

/// Trailing-edge rate limiter for search input. The core is synchronous, so
/// the host drives it with its own monotonic millisecond clock: `push` on
/// every keystroke, `poll` on every tick; `poll` yields the query once the
/// quiet period elapses.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    interval_ms: u64,
    pending: Option<String>,
    deadline_ms: Option<u64>,
}

impl Debouncer {
    pub fn new(interval_ms: u64) -> Self {
        Debouncer {
            interval_ms,
            pending: None,
            deadline_ms: None,
        }
    }

    pub fn push<S: Into<String>>(&mut self, query: S, now_ms: u64) {
        self.pending = Some(query.into());
        self.deadline_ms = Some(now_ms + self.interval_ms);
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<String> {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::RelationKind;
    use crate::tests::helpers::{entity, relation, sample_store};

    #[test]
    fn all_pass_filter_is_identity() {
        let store = sample_store();
        let result = filter(&store, &FilterState::default());
        let input: Vec<&Entity> = store.entities().collect();
        assert_eq!(result.entities.len(), input.len());
        for (filtered, original) in result.entities.iter().zip(input) {
            assert_eq!(filtered, original);
        }
        assert_eq!(result.relationships, store.relationships().to_vec());
    }

    #[test]
    fn empty_jurisdiction_yields_empty_result_not_error() {
        let store = OrgStore::new(
            vec![entity("mayor-001", "Office of the Mayor", "Mayor", "City of San Diego")],
            vec![],
        );
        let state = FilterState {
            jurisdictions: EnumSet::only(Jurisdiction::County),
            ..FilterState::default()
        };
        let result = filter(&store, &state);
        assert!(result.is_empty());
        assert!(result.entities.is_empty());
        assert!(result.relationships.is_empty());
    }

    #[test]
    fn relationship_needs_both_endpoints_in_filtered_set() {
        let store = OrgStore::new(
            vec![
                entity("mayor-001", "Office of the Mayor", "Mayor", "City of San Diego"),
                entity("county-cao", "County CAO", "Chief Administrative Officer", "County of San Diego"),
            ],
            vec![relation("rel-001", "mayor-001", "county-cao", RelationKind::Other)],
        );
        // Both entities pass under "all"; restricting to City drops the
        // county endpoint and with it the edge.
        assert_eq!(filter(&store, &FilterState::default()).relationships.len(), 1);
        let city_only = FilterState {
            jurisdictions: EnumSet::only(Jurisdiction::City),
            ..FilterState::default()
        };
        let result = filter(&store, &city_only);
        assert_eq!(result.entities.len(), 1);
        assert!(result.relationships.is_empty());
    }

    #[test]
    fn category_predicate_applies_to_surviving_edges() {
        let store = sample_store();
        let hierarchical_only = FilterState {
            categories: EnumSet::only(RelationCategory::Hierarchical),
            ..FilterState::default()
        };
        let result = filter(&store, &hierarchical_only);
        assert!(result
            .relationships
            .iter()
            .all(|r| r.category == RelationCategory::Hierarchical));
        assert!(result.relationships.len() < store.relationships().len());
    }

    #[test]
    fn search_is_case_insensitive_ordered_and_limited() {
        let store = sample_store();
        let hits = search(&store, "FIRE", 10);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|e| e.name.to_lowercase().contains("fire")));

        let limited = search(&store, "o", 2);
        assert_eq!(limited.len(), 2);

        assert!(search(&store, "   ", 10).is_empty());
        // Regex metacharacters are matched literally, not as patterns.
        assert!(search(&store, "may.r", 10).is_empty());
    }

    #[test]
    fn debouncer_fires_once_after_quiet_period() {
        let mut debouncer = Debouncer::new(150);
        debouncer.push("fir", 0);
        debouncer.push("fire", 100);
        assert_eq!(debouncer.poll(200), None);
        assert_eq!(debouncer.poll(250), Some("fire".to_string()));
        assert_eq!(debouncer.poll(400), None);
        assert!(debouncer.is_idle());
    }
}
