use chrono::{NaiveDate, TimeDelta};
use meep_core::db::open_db_in_memory;
use meep_core::{
    Address, AreaOfEffect, AreaRepository, Coordinate, EntityKind, FuelType, Line,
    ModelValidationError, Owner, OwnerRepository, Project, ProjectRepository, Radius, RepoError,
    Site, SqliteAreaRepository, SqliteOwnerRepository, SqliteProjectRepository,
};

fn sample_address() -> Address {
    Address {
        id: Some(87),
        ..Address::new("1882 133 Pl.", "Overland Park", "KS", 66209)
    }
}

fn sample_project() -> Project {
    Project {
        id: Some(42),
        name: Some("Clean kitchen".to_string()),
        start_date: NaiveDate::from_ymd_opt(1992, 12, 24),
        duration: Some(TimeDelta::days(365)),
        project_type: Some("Classified".to_string()),
        summary: Some("Go clean the kitchen. It is a mess.".to_string()),
    }
}

#[test]
fn address_fields_match_constructor_and_storage() {
    let address = sample_address();
    assert_eq!(address.id, Some(87));
    assert_eq!(address.address.as_deref(), Some("1882 133 Pl."));
    assert_eq!(address.city.as_deref(), Some("Overland Park"));
    assert_eq!(address.state.as_deref(), Some("KS"));
    assert_eq!(address.zip, Some(66209));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    let id = repo.create_address(&address).unwrap();
    assert_eq!(id, 87);
    assert_eq!(repo.get_address(87).unwrap(), Some(address));
}

#[test]
fn area_of_effect_keeps_explicit_id() {
    let area = AreaOfEffect::with_id(44442222).unwrap();
    assert_eq!(area.id, Some(44442222));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAreaRepository::try_new(&conn).unwrap();
    assert_eq!(repo.create_area(&area).unwrap(), 44442222);
    assert_eq!(repo.get_area(44442222).unwrap(), Some(area));
}

#[test]
fn coordinate_fields_round_trip() {
    let coordinate = Coordinate::with_id(44442222, 32.1, -87.42).unwrap();
    assert_eq!(coordinate.lat, Some(32.1));
    assert_eq!(coordinate.long, Some(-87.42));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    repo.create_coordinate(&coordinate).unwrap();
    assert_eq!(repo.get_coordinate(44442222).unwrap(), Some(coordinate));
}

#[test]
fn fuel_type_fields_round_trip() {
    let fuel = FuelType {
        id: Some(42),
        ..FuelType::new("Diesel")
    };
    assert_eq!(fuel.fuel.as_deref(), Some("Diesel"));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAreaRepository::try_new(&conn).unwrap();
    repo.create_fuel_type(&fuel).unwrap();
    assert_eq!(repo.get_fuel_type(42).unwrap(), Some(fuel));
}

#[test]
fn owner_fields_round_trip() {
    let owner = Owner::with_id(42, "Howie Mandell", "American actor and talk show host.").unwrap();
    assert_eq!(owner.name.as_deref(), Some("Howie Mandell"));
    assert_eq!(
        owner.summary.as_deref(),
        Some("American actor and talk show host.")
    );

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    repo.create_owner(&owner).unwrap();
    assert_eq!(repo.get_owner(42).unwrap(), Some(owner));
}

#[test]
fn line_and_radius_fields_round_trip() {
    let line = Line {
        id: Some(23),
        end_location_id: None,
    };
    let radius = Radius {
        id: Some(24),
        ..Radius::new(55.55)
    };

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAreaRepository::try_new(&conn).unwrap();
    repo.create_line(&line).unwrap();
    repo.create_radius(&radius).unwrap();
    assert_eq!(repo.get_line(23).unwrap(), Some(line));
    assert_eq!(repo.get_radius(24).unwrap().unwrap().radius, Some(55.55));
}

#[test]
fn project_fields_round_trip_including_date_and_duration() {
    let project = sample_project();
    assert_eq!(project.start_date, NaiveDate::from_ymd_opt(1992, 12, 24));
    assert_eq!(project.duration, Some(TimeDelta::days(365)));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();
    repo.create_project(&project).unwrap();
    let loaded = repo.get_project(42).unwrap().unwrap();
    assert_eq!(loaded, project);
    assert_eq!(loaded.end_date(), NaiveDate::from_ymd_opt(1993, 12, 24));
}

#[test]
fn site_fields_round_trip() {
    let site = Site {
        id: Some(42),
        ..Site::new(12.0, 34.3)
    };

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();
    repo.create_site(&site).unwrap();
    assert_eq!(repo.get_site(42).unwrap(), Some(site));
}

#[test]
fn empty_records_are_storable() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let areas = SqliteAreaRepository::try_new(&conn).unwrap();

    let address_id = owners.create_address(&Address::default()).unwrap();
    let site_id = projects.create_site(&Site::default()).unwrap();
    let area_id = areas.create_area(&AreaOfEffect::default()).unwrap();

    assert_eq!(
        owners.get_address(address_id).unwrap().unwrap().city,
        None
    );
    assert_eq!(projects.get_site(site_id).unwrap().unwrap().ghg_reduced, None);
    assert_eq!(areas.get_area(area_id).unwrap().unwrap().radius_id, None);
}

#[test]
fn non_positive_ids_and_non_finite_values_are_rejected() {
    assert_eq!(
        Owner::with_id(0, "x", "y").unwrap_err(),
        ModelValidationError::NonPositiveId {
            entity: EntityKind::Owner,
            id: 0
        }
    );

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAreaRepository::try_new(&conn).unwrap();
    let err = repo.create_radius(&Radius::new(f64::NAN)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::NonFiniteNumber {
            entity: EntityKind::Radius,
            field: "radius",
            ..
        })
    ));
}

#[test]
fn duplicate_explicit_id_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    repo.create_owner(&Owner::with_id(7, "a", "b").unwrap())
        .unwrap();
    let err = repo
        .create_owner(&Owner::with_id(7, "c", "d").unwrap())
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
}

#[test]
fn update_requires_persisted_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    let err = repo.update_owner(&Owner::new("a", "b")).unwrap_err();
    assert!(matches!(err, RepoError::Unsaved(EntityKind::Owner)));

    let err = repo
        .update_owner(&Owner::with_id(99, "a", "b").unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Owner,
            id: 99
        }
    ));
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let site = Site {
        id: Some(42),
        ..Site::new(12.0, 34.3)
    };
    let json = serde_json::to_value(&site).unwrap();
    assert_eq!(json["GHG_reduced"], 12.0);
    assert_eq!(json["GGE_reduced"], 34.3);

    let project = sample_project();
    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["start_date"], "1992-12-24");
    assert_eq!(json["duration_secs"], 365 * 24 * 60 * 60);

    let decoded: Project = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, project);

    let bare: Project = serde_json::from_value(serde_json::json!({ "name": "meep" })).unwrap();
    assert_eq!(bare.duration, None);
    assert_eq!(bare.name.as_deref(), Some("meep"));
}
