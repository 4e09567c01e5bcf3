//! Hierarchy construction against realistic source tables

mod common;

use civigraph::{
    config::ChartConfig,
    hierarchy::{build_hierarchy, HierarchyNode},
    properties::{Entity, EntityId, RelationKind, Relationship},
    store::OrgStore,
};
use common::sample_store;

fn child_ids(node: &HierarchyNode) -> Vec<&str> {
    node.children.iter().map(|c| c.id.as_str()).collect()
}

fn find<'a>(node: &'a HierarchyNode, id: &str) -> Option<&'a HierarchyNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|c| find(c, id))
}

#[test]
fn oversees_edge_places_child_under_root() {
    let store = OrgStore::new(
        vec![
            Entity::new(
                EntityId::from("mayor-001"),
                "Office of the Mayor",
                "Mayor",
                "City of San Diego",
            ),
            Entity::new(
                EntityId::from("city-fire-chief"),
                "Fire-Rescue Department",
                "Fire Chief",
                "City of San Diego",
            ),
        ],
        vec![Relationship::new(
            "rel-001",
            "mayor-001",
            "city-fire-chief",
            RelationKind::Oversees,
        )],
    );
    let root = build_hierarchy(&store, &ChartConfig::default());

    assert_eq!(root.children.len(), 1);
    let city = &root.children[0];
    assert_eq!(city.id, "city-root");
    assert_eq!(city.level, 1);
    assert_eq!(child_ids(city), vec!["mayor-001"]);

    let mayor = &city.children[0];
    assert_eq!(mayor.level, 2);
    assert_eq!(child_ids(mayor), vec!["city-fire-chief"]);
    assert_eq!(mayor.children[0].level, mayor.level + 1);
}

#[test_log::test]
fn ghost_reference_is_silently_excluded() {
    let root = build_hierarchy(&sample_store(), &ChartConfig::default());
    assert!(find(&root, "ghost-999").is_none());
    // The valid edges from the same source still produced children.
    let mayor = find(&root, "mayor-001").expect("mayor placed");
    assert_eq!(child_ids(mayor), vec!["city-fire-chief", "city-police-chief"]);
}

#[test]
fn three_jurisdiction_trees_under_one_super_root() {
    let root = build_hierarchy(&sample_store(), &ChartConfig::default());
    assert_eq!(root.level, 0);
    assert_eq!(
        child_ids(&root),
        vec!["city-root", "county-root", "regional-root"]
    );

    // Appointment edges subordinate nobody: the ethics commission stays a
    // city root even though two entities appoint it.
    let city = &root.children[0];
    assert_eq!(
        child_ids(city),
        vec!["mayor-001", "council-001", "ethics-board"]
    );

    // reports_to derives the child from the source side.
    let county = &root.children[1];
    assert_eq!(child_ids(county), vec!["county-board"]);
    assert_eq!(child_ids(&county.children[0]), vec!["county-cao"]);

    let regional = &root.children[2];
    assert_eq!(child_ids(regional), vec!["sandag"]);
}

#[test_log::test]
fn cycle_terminates_with_each_id_internal_at_most_once_per_path() {
    let entities: Vec<Entity> = ["a", "b", "c"]
        .iter()
        .map(|id| {
            Entity::new(
                EntityId::from(*id),
                format!("Department {id}").as_str(),
                "Department",
                "City of San Diego",
            )
        })
        .collect();
    let relationships = vec![
        Relationship::new("rel-001", "a", "b", RelationKind::Oversees),
        Relationship::new("rel-002", "b", "c", RelationKind::Oversees),
        Relationship::new("rel-003", "c", "a", RelationKind::Oversees),
    ];
    let store = OrgStore::new(entities, relationships);
    let root = build_hierarchy(&store, &ChartConfig::default());

    // Termination itself is the first property; then walk every root-to-leaf
    // path and check no id recurs as an internal (expanded) node.
    fn check_paths(node: &HierarchyNode, ancestors: &mut Vec<String>) {
        if !node.children.is_empty() {
            assert!(
                !ancestors.contains(&node.id),
                "{} recurs as internal node on a path",
                node.id
            );
            ancestors.push(node.id.clone());
            for child in &node.children {
                check_paths(child, ancestors);
            }
            ancestors.pop();
        }
    }
    check_paths(&root, &mut Vec::new());

    // Fully cyclic jurisdiction fails open: every member roots a tree.
    let city = &root.children[0];
    assert_eq!(child_ids(city), vec!["a", "b", "c"]);
}

#[test]
fn duplicate_edges_dedup_to_one_child_position() {
    let store = OrgStore::new(
        vec![
            Entity::new(EntityId::from("a"), "A", "Department", "City of San Diego"),
            Entity::new(EntityId::from("b"), "B", "Department", "City of San Diego"),
        ],
        vec![
            Relationship::new("rel-001", "a", "b", RelationKind::Oversees),
            Relationship::new("rel-002", "b", "a", RelationKind::ReportsTo),
        ],
    );
    let root = build_hierarchy(&store, &ChartConfig::default());
    let a = find(&root, "a").expect("a placed");
    assert_eq!(child_ids(a), vec!["b"]);
}

#[test]
fn shared_subordinate_appears_under_both_parents() {
    // Two superiors of one lab: strict-tree rendering duplicates the node,
    // one position per parent slot.
    let store = OrgStore::new(
        vec![
            Entity::new(EntityId::from("city-fire-chief"), "Fire-Rescue Department", "Fire Chief", "City of San Diego"),
            Entity::new(EntityId::from("city-police-chief"), "Police Department", "Police Chief", "City of San Diego"),
            Entity::new(EntityId::from("crime-lab"), "Forensic Laboratory", "Laboratory", "City of San Diego"),
        ],
        vec![
            Relationship::new("rel-001", "city-fire-chief", "crime-lab", RelationKind::Oversees),
            Relationship::new("rel-002", "city-police-chief", "crime-lab", RelationKind::Oversees),
        ],
    );
    let root = build_hierarchy(&store, &ChartConfig::default());
    let fire = find(&root, "city-fire-chief").expect("fire chief placed");
    let police = find(&root, "city-police-chief").expect("police chief placed");
    assert_eq!(child_ids(fire), vec!["crime-lab"]);
    assert_eq!(child_ids(police), vec!["crime-lab"]);
}

#[test]
fn missing_person_data_falls_back_to_entity_type() {
    let root = build_hierarchy(&sample_store(), &ChartConfig::default());
    let mayor = find(&root, "mayor-001").expect("mayor placed");
    assert_eq!(mayor.person_name, None);
    assert_eq!(mayor.title, "Mayor");
}
