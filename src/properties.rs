pub use enumset::EnumSet;
/// [crate::properties] contains the basic building blocks for assembling and
/// manipulating an [crate::store::OrgStore] and the structures derived from it.
use enumset::EnumSetType;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};
use titlecase::titlecase;

use crate::error::CivigraphError;

/// Stable identifier for an entity, taken verbatim from the source data
/// (e.g. `mayor-001`, `city-fire-chief`). Identity is the id string; every
/// other entity field is descriptive.
#[derive(Clone, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId(id)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Governing scope of an entity. Classified once at load time from the raw
/// jurisdiction string; the raw string is retained on the entity for display.
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, Hash, EnumSetType)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    City,
    County,
    Regional,
}

impl Jurisdiction {
    /// Synthetic container node id for this jurisdiction's subtree.
    pub fn container_id(&self) -> &'static str {
        match self {
            Jurisdiction::City => "city-root",
            Jurisdiction::County => "county-root",
            Jurisdiction::Regional => "regional-root",
        }
    }

    pub fn all_in_order() -> [Jurisdiction; 3] {
        [
            Jurisdiction::City,
            Jurisdiction::County,
            Jurisdiction::Regional,
        ]
    }
}

impl Display for Jurisdiction {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Jurisdiction::City => write!(f, "city"),
            Jurisdiction::County => write!(f, "county"),
            Jurisdiction::Regional => write!(f, "regional"),
        }
    }
}

/// Broad entity category used by the network view's filter buttons and for
/// sizing/labeling hints.
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, Hash, EnumSetType)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "lowercase")]
pub enum EntityClass {
    Elected,
    Departments,
    Boards,
}

impl Display for EntityClass {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            EntityClass::Elected => write!(f, "elected"),
            EntityClass::Departments => write!(f, "departments"),
            EntityClass::Boards => write!(f, "boards"),
        }
    }
}

/// Directed relationship type. `Oversees` and `ReportsTo` are the structural
/// subset that hierarchy construction consumes; everything else is retained
/// for detail display only.
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, Hash, EnumSetType)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Oversees,
    ReportsTo,
    Appoints,
    Other,
}

impl RelationKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "oversees" => RelationKind::Oversees,
            "reports_to" => RelationKind::ReportsTo,
            "appoints" => RelationKind::Appoints,
            _ => RelationKind::Other,
        }
    }

    /// Structural relations define parent/child placement in the hierarchy.
    pub fn is_structural(&self) -> bool {
        matches!(self, RelationKind::Oversees | RelationKind::ReportsTo)
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            RelationKind::Oversees => write!(f, "oversees"),
            RelationKind::ReportsTo => write!(f, "reports_to"),
            RelationKind::Appoints => write!(f, "appoints"),
            RelationKind::Other => write!(f, "other"),
        }
    }
}

/// Relationship grouping used by the network view's category filter and the
/// detail panel's section headings.
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, Hash, EnumSetType)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "lowercase")]
pub enum RelationCategory {
    Hierarchical,
    Appointment,
    Advisory,
    Other,
}

impl RelationCategory {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "hierarchical" => RelationCategory::Hierarchical,
            "appointment" => RelationCategory::Appointment,
            "advisory" => RelationCategory::Advisory,
            _ => RelationCategory::Other,
        }
    }
}

impl Display for RelationCategory {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            RelationCategory::Hierarchical => write!(f, "hierarchical"),
            RelationCategory::Appointment => write!(f, "appointment"),
            RelationCategory::Advisory => write!(f, "advisory"),
            RelationCategory::Other => write!(f, "other"),
        }
    }
}

/// Classify a raw jurisdiction string. Strings that name neither a city nor
/// a county fall through to `Regional`; regional authorities carry
/// inconsistent labels in source data ("Regional", "SANDAG Region", ...).
pub fn classify_jurisdiction(raw: &str) -> Jurisdiction {
    if raw.contains("City") {
        Jurisdiction::City
    } else if raw.contains("County") {
        Jurisdiction::County
    } else {
        Jurisdiction::Regional
    }
}

/// Classify a raw entity type string into its broad class.
pub fn classify_entity_type(raw: &str) -> EntityClass {
    let lower = raw.to_lowercase();
    if lower.contains("mayor") || lower.contains("council") || lower.contains("supervisor") {
        EntityClass::Elected
    } else if lower.contains("board") || lower.contains("commission") || lower.contains("committee")
    {
        EntityClass::Boards
    } else {
        EntityClass::Departments
    }
}

/// A government body or position. Created once at load time from the source
/// records; immutable thereafter. Views wrap entities, they never mutate
/// them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Raw position/body type string from the source ("Mayor", "Department").
    pub kind: String,
    pub jurisdiction: Jurisdiction,
    /// Source jurisdiction string before classification.
    pub jurisdiction_label: String,
    pub class: EntityClass,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub legal_source: Option<String>,
    /// Current officeholder, when a roster supplies one.
    pub person_name: Option<String>,
    /// Title shown on the node; falls back to the title-cased raw type when
    /// no roster entry names the position.
    pub display_title: String,
}

impl Entity {
    /// Build an entity from its raw descriptive fields, deriving the
    /// classified jurisdiction/class and the display-title fallback.
    pub fn new<S: Into<String>>(id: EntityId, name: S, kind: S, jurisdiction_label: S) -> Self {
        let kind = kind.into();
        let jurisdiction_label = jurisdiction_label.into();
        Entity {
            jurisdiction: classify_jurisdiction(&jurisdiction_label),
            class: classify_entity_type(&kind),
            display_title: titlecase(&kind),
            id,
            name: name.into(),
            kind,
            jurisdiction_label,
            description: None,
            website_url: None,
            legal_source: None,
            person_name: None,
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A directed, typed edge between two entities. Endpoints are validated at
/// store construction; edges referencing unknown entities never reach the
/// derived views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub source: EntityId,
    pub target: EntityId,
    pub kind: RelationKind,
    pub category: RelationCategory,
    pub description: Option<String>,
    pub authority_source: Option<String>,
}

impl Relationship {
    pub fn new<I: Into<EntityId>>(id: &str, source: I, target: I, kind: RelationKind) -> Self {
        let category = match kind {
            RelationKind::Oversees | RelationKind::ReportsTo => RelationCategory::Hierarchical,
            RelationKind::Appoints => RelationCategory::Appointment,
            RelationKind::Other => RelationCategory::Other,
        };
        Relationship {
            id: id.to_string(),
            source: source.into(),
            target: target.into(),
            kind,
            category,
            description: None,
            authority_source: None,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.kind.is_structural()
    }

    pub fn touches(&self, id: &EntityId) -> bool {
        &self.source == id || &self.target == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other_end(&self, id: &EntityId) -> Option<&EntityId> {
        if &self.source == id {
            Some(&self.target)
        } else if &self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

impl Display for Relationship {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.kind, self.target)
    }
}

/// Optional leadership roster merged into entities at load time: entity id →
/// current officeholder and position title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub members: BTreeMap<String, RosterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub person_name: String,
    pub title: Option<String>,
}

impl Roster {
    pub fn from_toml(text: &str) -> Result<Self, CivigraphError> {
        Ok(toml::from_str(text)?)
    }

    /// Fill in `person_name`/`display_title` where the roster knows the
    /// position. Absent entries leave the entity's fallback title intact.
    pub fn apply(&self, entity: &mut Entity) {
        if let Some(entry) = self.members.get(entity.id.as_str()) {
            entity.person_name = Some(entry.person_name.clone());
            if let Some(title) = &entry.title {
                entity.display_title = title.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jurisdiction_classification_falls_back_to_regional() {
        assert_eq!(
            classify_jurisdiction("City of San Diego"),
            Jurisdiction::City
        );
        assert_eq!(
            classify_jurisdiction("County of San Diego"),
            Jurisdiction::County
        );
        assert_eq!(classify_jurisdiction("Regional"), Jurisdiction::Regional);
        assert_eq!(
            classify_jurisdiction("Port District"),
            Jurisdiction::Regional
        );
        assert_eq!(classify_jurisdiction(""), Jurisdiction::Regional);
    }

    #[test]
    fn entity_type_classification() {
        assert_eq!(classify_entity_type("Mayor"), EntityClass::Elected);
        assert_eq!(classify_entity_type("City Council"), EntityClass::Elected);
        assert_eq!(
            classify_entity_type("District 3 Supervisor"),
            EntityClass::Elected
        );
        assert_eq!(
            classify_entity_type("Planning Commission"),
            EntityClass::Boards
        );
        assert_eq!(
            classify_entity_type("Fire Department"),
            EntityClass::Departments
        );
        assert_eq!(
            classify_entity_type("Widget Works"),
            EntityClass::Departments
        );
    }

    #[test]
    fn relation_kind_parse() {
        assert_eq!(RelationKind::parse("oversees"), RelationKind::Oversees);
        assert_eq!(RelationKind::parse("reports_to"), RelationKind::ReportsTo);
        assert_eq!(RelationKind::parse("appoints"), RelationKind::Appoints);
        assert_eq!(RelationKind::parse("coordinates_with"), RelationKind::Other);
        assert!(RelationKind::Oversees.is_structural());
        assert!(RelationKind::ReportsTo.is_structural());
        assert!(!RelationKind::Appoints.is_structural());
    }

    #[test]
    fn display_title_falls_back_to_titlecased_kind() {
        let entity = Entity::new(
            EntityId::from("city-fire-chief"),
            "Fire Chief",
            "fire chief",
            "City of San Diego",
        );
        assert_eq!(entity.display_title, "Fire Chief");
        assert_eq!(entity.jurisdiction, Jurisdiction::City);
    }

    #[test]
    fn roster_overrides_title_and_person() {
        let toml_text = r#"
            [members.mayor-001]
            person_name = "Todd Gloria"
            title = "Mayor"
        "#;
        let roster = Roster::from_toml(toml_text).unwrap();
        let mut entity = Entity::new(
            EntityId::from("mayor-001"),
            "Office of the Mayor",
            "mayor",
            "City of San Diego",
        );
        roster.apply(&mut entity);
        assert_eq!(entity.person_name.as_deref(), Some("Todd Gloria"));
        assert_eq!(entity.display_title, "Mayor");

        let mut other = Entity::new(
            EntityId::from("city-clerk"),
            "Office of the City Clerk",
            "city clerk",
            "City of San Diego",
        );
        roster.apply(&mut other);
        assert_eq!(other.person_name, None);
        assert_eq!(other.display_title, "City Clerk");
    }
}
