//! CSV parsing for the tabular source records.
//!
//! The record structs mirror the source schema column-for-column; conversion
//! into domain types happens here so the rest of the crate never sees raw
//! rows. A row with a missing key field is a load error; missing optional
//! fields become `None`.

use serde::Deserialize;
use url::Url;

use crate::{
    error::CivigraphError,
    properties::{Entity, EntityId, RelationCategory, RelationKind, Relationship},
};

#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub legal_source: Option<String>,
    #[serde(default)]
    pub parent_entity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipRecord {
    #[serde(default)]
    pub relationship_id: String,
    #[serde(default)]
    pub source_entity_id: String,
    #[serde(default)]
    pub target_entity_id: String,
    #[serde(default)]
    pub relationship_type: String,
    #[serde(default)]
    pub relationship_category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub authority_source: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}

/// Validate a website URL; unparseable values drop to `None` with a warning
/// rather than failing the load.
fn checked_url(entity_id: &str, raw: Option<String>) -> Option<String> {
    let raw = non_empty(raw)?;
    match Url::parse(&raw) {
        Ok(url) => Some(url.to_string()),
        Err(err) => {
            tracing::warn!("entity {entity_id}: dropping invalid website_url '{raw}': {err}");
            None
        }
    }
}

impl EntityRecord {
    pub fn into_entity(self) -> Result<Entity, CivigraphError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(CivigraphError::Load(format!(
                "entity row '{}' is missing an id",
                self.name
            )));
        }
        let mut entity = Entity::new(
            EntityId::from(id),
            self.name.trim(),
            self.kind.trim(),
            self.jurisdiction.trim(),
        );
        entity.description = non_empty(self.description);
        entity.website_url = checked_url(id, self.website_url);
        entity.legal_source = non_empty(self.legal_source);
        Ok(entity)
    }
}

impl RelationshipRecord {
    pub fn into_relationship(self) -> Result<Relationship, CivigraphError> {
        let id = self.relationship_id.trim();
        if id.is_empty() {
            return Err(CivigraphError::Load(
                "relationship row is missing a relationship_id".to_string(),
            ));
        }
        let source = self.source_entity_id.trim();
        let target = self.target_entity_id.trim();
        if source.is_empty() || target.is_empty() {
            return Err(CivigraphError::Load(format!(
                "relationship {id} is missing an endpoint id"
            )));
        }
        let kind = RelationKind::parse(&self.relationship_type);
        let mut relationship = Relationship::new(id, source, target, kind);
        if let Some(raw) = non_empty(self.relationship_category) {
            relationship.category = RelationCategory::parse(&raw);
        }
        relationship.description = non_empty(self.description);
        relationship.authority_source = non_empty(self.authority_source);
        Ok(relationship)
    }
}

/// Parse the entities table from CSV text.
pub fn parse_entities(text: &str) -> Result<Vec<Entity>, CivigraphError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut entities = Vec::new();
    for result in reader.deserialize::<EntityRecord>() {
        entities.push(result?.into_entity()?);
    }
    tracing::debug!("parsed {} entity records", entities.len());
    Ok(entities)
}

/// Parse the relationships table from CSV text.
pub fn parse_relationships(text: &str) -> Result<Vec<Relationship>, CivigraphError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut relationships = Vec::new();
    for result in reader.deserialize::<RelationshipRecord>() {
        relationships.push(result?.into_relationship()?);
    }
    tracing::debug!("parsed {} relationship records", relationships.len());
    Ok(relationships)
}
