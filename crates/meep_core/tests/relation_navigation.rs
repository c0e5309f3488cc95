use meep_core::db::open_db_in_memory;
use meep_core::model::relation::relations_from;
use meep_core::{
    Address, AreaOfEffect, AreaRepository, Coordinate, EntityKind, FuelType, Line, Owner,
    OwnerRepository, Project, ProjectRepository, Radius, RelationError, RepoError, Site,
    SqliteAreaRepository, SqliteOwnerRepository, SqliteProjectRepository,
    SqliteRelationNavigator,
};

#[test]
fn declared_relations_resolve_to_related_ids() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let areas = SqliteAreaRepository::try_new(&conn).unwrap();
    let nav = SqliteRelationNavigator::try_new(&conn).unwrap();

    let owner_id = owners.create_owner(&Owner::new("Howie", "Host")).unwrap();
    let coordinate_id = owners.create_coordinate(&Coordinate::new(1.0, 2.0)).unwrap();
    let address_id = owners
        .create_address(
            &Address::default()
                .owned_by(owner_id)
                .located_at(coordinate_id),
        )
        .unwrap();
    let project_id = projects.create_project(&Project::named("Solar")).unwrap();
    owners.link_project(owner_id, project_id).unwrap();
    let site_id = projects
        .create_site(&Site::new(1.0, 2.0).in_project(project_id))
        .unwrap();
    let radius_id = areas.create_radius(&Radius::new(5.0)).unwrap();
    let fuel_id = areas.create_fuel_type(&FuelType::new("Diesel")).unwrap();
    let area_id = areas
        .create_area(&AreaOfEffect {
            site_id: Some(site_id),
            radius_id: Some(radius_id),
            fuel_type_id: Some(fuel_id),
            address_id: Some(address_id),
            ..AreaOfEffect::default()
        })
        .unwrap();

    assert_eq!(
        nav.related_ids(EntityKind::Owner, owner_id, "addresses").unwrap(),
        vec![address_id]
    );
    assert_eq!(
        nav.related_ids(EntityKind::Project, project_id, "owners").unwrap(),
        vec![owner_id]
    );
    assert_eq!(
        nav.related_id(EntityKind::Address, address_id, "coordinate").unwrap(),
        Some(coordinate_id)
    );
    assert_eq!(
        nav.related_id(EntityKind::Coordinate, coordinate_id, "address").unwrap(),
        Some(address_id)
    );
    assert_eq!(
        nav.related_id(EntityKind::Site, site_id, "project").unwrap(),
        Some(project_id)
    );
    assert_eq!(
        nav.related_id(EntityKind::Radius, radius_id, "area_of_effect").unwrap(),
        Some(area_id)
    );
    assert_eq!(
        nav.related_ids(EntityKind::FuelType, fuel_id, "areas_of_effect").unwrap(),
        vec![area_id]
    );
    assert_eq!(
        nav.related_id(EntityKind::AreaOfEffect, area_id, "line").unwrap(),
        None
    );
}

#[test]
fn one_directional_links_have_no_reverse_navigation() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let areas = SqliteAreaRepository::try_new(&conn).unwrap();
    let nav = SqliteRelationNavigator::try_new(&conn).unwrap();

    let address_id = owners.create_address(&Address::default()).unwrap();
    let line_id = areas.create_line(&Line::ending_at(address_id)).unwrap();
    areas
        .create_area(&AreaOfEffect {
            line_id: Some(line_id),
            address_id: Some(address_id),
            ..AreaOfEffect::default()
        })
        .unwrap();

    assert_eq!(
        nav.related_id(EntityKind::Line, line_id, "end_location").unwrap(),
        Some(address_id)
    );

    for (source, id, name) in [
        (EntityKind::Line, line_id, "area_of_effect"),
        (EntityKind::Address, address_id, "line"),
        (EntityKind::Address, address_id, "area_of_effect"),
    ] {
        let err = nav.related_ids(source, id, name).unwrap_err();
        match err {
            RepoError::Relation(RelationError::Undeclared {
                source: err_source,
                name: err_name,
            }) => {
                assert_eq!(err_source, source);
                assert_eq!(err_name, name);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn missing_source_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let nav = SqliteRelationNavigator::try_new(&conn).unwrap();

    let err = nav
        .related_ids(EntityKind::Project, 12, "sites")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Project,
            id: 12
        }
    ));
}

#[test]
fn collection_relations_are_not_single_valued() {
    let conn = open_db_in_memory().unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let nav = SqliteRelationNavigator::try_new(&conn).unwrap();
    let project_id = projects.create_project(&Project::named("Solar")).unwrap();

    let err = nav
        .related_id(EntityKind::Project, project_id, "sites")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Relation(RelationError::NotSingleValued {
            source: EntityKind::Project,
            name: "sites"
        })
    ));
}

#[test]
fn every_declared_relation_query_runs() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let areas = SqliteAreaRepository::try_new(&conn).unwrap();
    let nav = SqliteRelationNavigator::try_new(&conn).unwrap();

    let ids = [
        (EntityKind::Owner, owners.create_owner(&Owner::default()).unwrap()),
        (EntityKind::Address, owners.create_address(&Address::default()).unwrap()),
        (
            EntityKind::Coordinate,
            owners.create_coordinate(&Coordinate::default()).unwrap(),
        ),
        (EntityKind::Project, projects.create_project(&Project::default()).unwrap()),
        (EntityKind::Site, projects.create_site(&Site::default()).unwrap()),
        (
            EntityKind::AreaOfEffect,
            areas.create_area(&AreaOfEffect::default()).unwrap(),
        ),
        (EntityKind::Radius, areas.create_radius(&Radius::default()).unwrap()),
        (EntityKind::Line, areas.create_line(&Line::default()).unwrap()),
        (EntityKind::FuelType, areas.create_fuel_type(&FuelType::default()).unwrap()),
    ];

    for (source, id) in ids {
        for decl in relations_from(source) {
            let related = nav.related_ids(source, id, decl.name).unwrap();
            assert!(related.is_empty(), "{source}.{} = {related:?}", decl.name);
        }
    }
}
