//! Shared fixtures for integration tests
#![allow(dead_code)]

use civigraph::{
    codec::{parse_entities, parse_relationships},
    config::ChartConfig,
    session::Session,
    store::OrgStore,
};

/// Entities table in the source schema. Optional fields are partially
/// populated on purpose; loaders must tolerate the holes.
pub const ENTITIES_CSV: &str = "\
id,name,type,jurisdiction,description,website_url,legal_source,parent_entity
mayor-001,Office of the Mayor,Mayor,City of San Diego,Chief executive of the city,https://www.sandiego.gov/mayor,City Charter Article XV,
council-001,City Council,City Council,City of San Diego,Legislative body,,City Charter Article III,
city-fire-chief,Fire-Rescue Department,Fire Chief,City of San Diego,Fire and rescue services,,,mayor-001
city-police-chief,Police Department,Police Chief,City of San Diego,Law enforcement,,,mayor-001
ethics-board,Ethics Commission,Commission,City of San Diego,Governmental ethics oversight,,,
county-board,Board of Supervisors,Board of Supervisors,County of San Diego,County governing body,,,
county-cao,Chief Administrative Office,Chief Administrative Officer,County of San Diego,County operations,,,county-board
sandag,SANDAG,Regional Planning Agency,Regional,Regional planning and transportation,,,
";

/// Relationships table. `rel-006` deliberately references an unknown entity
/// and must be dropped during store construction.
pub const RELATIONSHIPS_CSV: &str = "\
relationship_id,source_entity_id,target_entity_id,relationship_type,relationship_category,description,authority_source
rel-001,mayor-001,city-fire-chief,oversees,hierarchical,Mayor oversees the fire department,City Charter
rel-002,mayor-001,city-police-chief,oversees,hierarchical,,
rel-003,county-cao,county-board,reports_to,hierarchical,CAO reports to the board,County Charter
rel-004,mayor-001,ethics-board,appoints,appointment,Mayor appoints commissioners,
rel-005,council-001,ethics-board,appoints,appointment,,
rel-006,mayor-001,ghost-999,oversees,hierarchical,Dangling edge,
";

pub fn sample_store() -> OrgStore {
    let entities = parse_entities(ENTITIES_CSV).expect("fixture entities parse");
    let relationships =
        parse_relationships(RELATIONSHIPS_CSV).expect("fixture relationships parse");
    OrgStore::new(entities, relationships)
}

pub fn sample_session() -> Session {
    Session::new(sample_store(), ChartConfig::default())
}
