//! Shared test utilities for store/hierarchy/view/filter testing

use crate::{
    properties::{Entity, EntityId, RelationKind, Relationship},
    store::OrgStore,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Helper function to create an entity from its raw descriptive fields
pub fn entity(id: &str, name: &str, kind: &str, jurisdiction: &str) -> Entity {
    Entity::new(EntityId::from(id), name, kind, jurisdiction)
}

/// Helper function to create a relationship edge
pub fn relation(id: &str, source: &str, target: &str, kind: RelationKind) -> Relationship {
    Relationship::new(id, source, target, kind)
}

/// A small three-jurisdiction organization with structural, appointment and
/// dangling edges:
///
/// - City: mayor oversees fire/police chiefs, council and mayor appoint the
///   ethics commission
/// - County: the CAO reports to the board of supervisors
/// - Regional: SANDAG stands alone
/// - One edge references an unknown entity and is dropped at construction
pub fn sample_store() -> OrgStore {
    init_logging();

    let entities = vec![
        entity("mayor-001", "Office of the Mayor", "Mayor", "City of San Diego"),
        entity("council-001", "City Council", "City Council", "City of San Diego"),
        entity(
            "city-fire-chief",
            "Fire-Rescue Department",
            "Fire Chief",
            "City of San Diego",
        ),
        entity(
            "city-police-chief",
            "Police Department",
            "Police Chief",
            "City of San Diego",
        ),
        entity(
            "ethics-board",
            "Ethics Commission",
            "Commission",
            "City of San Diego",
        ),
        entity(
            "county-board",
            "Board of Supervisors",
            "Board of Supervisors",
            "County of San Diego",
        ),
        entity(
            "county-cao",
            "Chief Administrative Office",
            "Chief Administrative Officer",
            "County of San Diego",
        ),
        entity("sandag", "SANDAG", "Regional Planning Agency", "Regional"),
    ];

    let relationships = vec![
        relation("rel-001", "mayor-001", "city-fire-chief", RelationKind::Oversees),
        relation("rel-002", "mayor-001", "city-police-chief", RelationKind::Oversees),
        relation("rel-003", "county-cao", "county-board", RelationKind::ReportsTo),
        relation("rel-004", "mayor-001", "ethics-board", RelationKind::Appoints),
        relation("rel-005", "council-001", "ethics-board", RelationKind::Appoints),
        relation("rel-006", "mayor-001", "ghost-999", RelationKind::Oversees),
    ];

    OrgStore::new(entities, relationships)
}
