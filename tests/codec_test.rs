//! Source parsing and dataset compilation

mod common;

use civigraph::{
    codec::{load_dir, parse_entities, parse_relationships, Dataset},
    error::CivigraphError,
    properties::{EntityClass, Jurisdiction, RelationCategory, RelationKind, Roster},
};
use common::{ENTITIES_CSV, RELATIONSHIPS_CSV};

#[test]
fn entities_parse_with_missing_optionals() {
    let entities = parse_entities(ENTITIES_CSV).unwrap();
    assert_eq!(entities.len(), 8);

    let mayor = &entities[0];
    assert_eq!(mayor.name, "Office of the Mayor");
    assert_eq!(mayor.jurisdiction, Jurisdiction::City);
    assert_eq!(mayor.class, EntityClass::Elected);
    assert_eq!(
        mayor.website_url.as_deref(),
        Some("https://www.sandiego.gov/mayor")
    );

    let council = &entities[1];
    assert_eq!(council.website_url, None);
    assert_eq!(council.legal_source.as_deref(), Some("City Charter Article III"));

    let sandag = &entities[7];
    assert_eq!(sandag.jurisdiction, Jurisdiction::Regional);
    assert_eq!(sandag.description.as_deref(), Some("Regional planning and transportation"));
}

#[test]
fn missing_entity_id_is_a_load_error() {
    let csv = "\
id,name,type,jurisdiction
,Nameless Department,Department,City of San Diego
";
    match parse_entities(csv) {
        Err(CivigraphError::Load(message)) => assert!(message.contains("missing an id")),
        other => panic!("expected Load error, got {other:?}"),
    }
}

#[test]
fn invalid_website_url_drops_to_none() {
    let csv = "\
id,name,type,jurisdiction,description,website_url,legal_source,parent_entity
dept-1,Department One,Department,City of San Diego,,not a url,,
";
    let entities = parse_entities(csv).unwrap();
    assert_eq!(entities[0].website_url, None);
}

#[test]
fn relationships_parse_and_classify() {
    let relationships = parse_relationships(RELATIONSHIPS_CSV).unwrap();
    assert_eq!(relationships.len(), 6);

    let oversees = &relationships[0];
    assert_eq!(oversees.kind, RelationKind::Oversees);
    assert_eq!(oversees.category, RelationCategory::Hierarchical);
    assert_eq!(oversees.authority_source.as_deref(), Some("City Charter"));

    let appoints = &relationships[3];
    assert_eq!(appoints.kind, RelationKind::Appoints);
    assert_eq!(appoints.category, RelationCategory::Appointment);
    assert_eq!(appoints.description.as_deref(), Some("Mayor appoints commissioners"));
}

#[test]
fn missing_relationship_id_is_a_load_error() {
    let csv = "\
relationship_id,source_entity_id,target_entity_id,relationship_type
,a,b,oversees
";
    assert!(matches!(
        parse_relationships(csv),
        Err(CivigraphError::Load(_))
    ));
}

#[test]
fn missing_endpoint_is_a_load_error() {
    let csv = "\
relationship_id,source_entity_id,target_entity_id,relationship_type
rel-001,a,,oversees
";
    match parse_relationships(csv) {
        Err(CivigraphError::Load(message)) => assert!(message.contains("rel-001")),
        other => panic!("expected Load error, got {other:?}"),
    }
}

#[test]
fn unknown_relationship_type_falls_back_to_other() {
    let csv = "\
relationship_id,source_entity_id,target_entity_id,relationship_type,relationship_category
rel-001,a,b,coordinates_with,advisory
";
    let relationships = parse_relationships(csv).unwrap();
    assert_eq!(relationships[0].kind, RelationKind::Other);
    assert_eq!(relationships[0].category, RelationCategory::Advisory);
    assert!(!relationships[0].is_structural());
}

#[test]
fn dataset_round_trips_through_json() {
    let dataset = Dataset::new(
        parse_entities(ENTITIES_CSV).unwrap(),
        parse_relationships(RELATIONSHIPS_CSV).unwrap(),
    );
    let json = dataset.to_json().unwrap();
    let restored = Dataset::from_json(&json).unwrap();
    assert_eq!(restored, dataset);

    // Store construction applies referential validation to the restored set.
    let store = restored.into_store();
    assert_eq!(store.entity_count(), 8);
    assert_eq!(store.relationships().len(), 5);
    assert_eq!(store.referential_gaps(), 1);
}

#[test]
fn compile_merges_roster_into_entities() {
    let roster = Roster::from_toml(
        r#"
        [members.mayor-001]
        person_name = "Todd Gloria"
        title = "Mayor"
    "#,
    )
    .unwrap();
    let dataset = Dataset::compile(
        parse_entities(ENTITIES_CSV).unwrap(),
        parse_relationships(RELATIONSHIPS_CSV).unwrap(),
        Some(&roster),
    );
    let mayor = &dataset.entities[0];
    assert_eq!(mayor.person_name.as_deref(), Some("Todd Gloria"));
    assert_eq!(mayor.display_title, "Mayor");
}

#[test]
fn load_dir_finds_the_conventional_file_pair() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sd_gov_entities_complete.csv"), ENTITIES_CSV).unwrap();
    std::fs::write(
        dir.path().join("sd_gov_relationships_complete.csv"),
        RELATIONSHIPS_CSV,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("roster.toml"),
        "[members.mayor-001]\nperson_name = \"Todd Gloria\"\ntitle = \"Mayor\"\n",
    )
    .unwrap();

    let (entities, relationships, roster) = load_dir(dir.path()).unwrap();
    assert_eq!(entities.len(), 8);
    assert_eq!(relationships.len(), 6);
    assert!(roster.is_some());
}

#[test]
fn load_dir_without_data_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_dir(dir.path()),
        Err(CivigraphError::NotFound(_))
    ));
}
