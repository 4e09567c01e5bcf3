//! The compiled dataset artifact.
//!
//! `civigraph build` compiles the CSV pair (plus optional roster) into one
//! JSON document; the browser viewer fetches it once at startup and hands
//! the text to [`Dataset::from_json`]. Entities arrive already classified
//! and roster-enriched, so the wasm side never re-runs load logic.

use serde::{Deserialize, Serialize};

use crate::{
    error::CivigraphError,
    properties::{Entity, Relationship, Roster},
    store::OrgStore,
};

pub const DATASET_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub version: u32,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl Dataset {
    pub fn new(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        Dataset {
            version: DATASET_VERSION,
            entities,
            relationships,
        }
    }

    /// Compile from parsed parts, merging the roster if one was supplied.
    pub fn compile(
        mut entities: Vec<Entity>,
        relationships: Vec<Relationship>,
        roster: Option<&Roster>,
    ) -> Self {
        if let Some(roster) = roster {
            for entity in &mut entities {
                roster.apply(entity);
            }
        }
        Dataset::new(entities, relationships)
    }

    pub fn from_json(text: &str) -> Result<Self, CivigraphError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, CivigraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Hand the data to a store; referential validation happens there.
    pub fn into_store(self) -> OrgStore {
        OrgStore::new(self.entities, self.relationships)
    }
}
