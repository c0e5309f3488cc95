use meep_core::db::open_db_in_memory;
use meep_core::{
    Address, Coordinate, EntityKind, Owner, OwnerRepository, Project, ProjectRepository,
    RepoError, SqliteOwnerRepository, SqliteProjectRepository,
};

fn howie() -> Owner {
    Owner::new("Howie Mandell", "American actor and talk show host.")
}

fn overland_park() -> Address {
    Address::new("1882 133 Pl.", "Overland Park", "KS", 66209)
}

#[test]
fn owner_addresses_are_appended_and_listed_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let owner_id = repo.create_owner(&howie()).unwrap();
    let first = repo.create_address(&overland_park()).unwrap();
    let second = repo
        .create_address(&Address::new("9 Elm St.", "Lawrence", "KS", 66044))
        .unwrap();
    assert!(repo.list_addresses_for_owner(owner_id).unwrap().is_empty());

    repo.attach_address(owner_id, second).unwrap();
    repo.attach_address(owner_id, first).unwrap();

    let ids: Vec<_> = repo
        .list_addresses_for_owner(owner_id)
        .unwrap()
        .into_iter()
        .map(|address| address.id.unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(
        repo.owner_of_address(first).unwrap().unwrap().id,
        Some(owner_id)
    );
}

#[test]
fn address_created_with_owner_id_shows_up_on_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let owner_id = repo.create_owner(&howie()).unwrap();
    let address_id = repo
        .create_address(&overland_park().owned_by(owner_id))
        .unwrap();

    let addresses = repo.list_addresses_for_owner(owner_id).unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].id, Some(address_id));
    assert_eq!(addresses[0].owner_id, Some(owner_id));
}

#[test]
fn reattaching_an_address_moves_it_between_owners() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let first_owner = repo.create_owner(&howie()).unwrap();
    let second_owner = repo.create_owner(&Owner::new("Ada", "Engineer")).unwrap();
    let address_id = repo.create_address(&overland_park()).unwrap();

    repo.attach_address(first_owner, address_id).unwrap();
    repo.attach_address(second_owner, address_id).unwrap();

    assert!(repo.list_addresses_for_owner(first_owner).unwrap().is_empty());
    assert_eq!(repo.list_addresses_for_owner(second_owner).unwrap().len(), 1);
}

#[test]
fn detach_address_clears_owner_link() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let owner_id = repo.create_owner(&howie()).unwrap();
    let address_id = repo
        .create_address(&overland_park().owned_by(owner_id))
        .unwrap();

    repo.detach_address(address_id).unwrap();
    assert!(repo.list_addresses_for_owner(owner_id).unwrap().is_empty());
    assert_eq!(repo.owner_of_address(address_id).unwrap(), None);
}

#[test]
fn deleting_owner_keeps_addresses_unowned() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let owner_id = repo.create_owner(&howie()).unwrap();
    let address_id = repo
        .create_address(&overland_park().owned_by(owner_id))
        .unwrap();

    repo.delete_owner(owner_id).unwrap();
    let address = repo.get_address(address_id).unwrap().unwrap();
    assert_eq!(address.owner_id, None);
}

#[test]
fn attach_to_missing_owner_or_address_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    let owner_id = repo.create_owner(&howie()).unwrap();
    let address_id = repo.create_address(&overland_park()).unwrap();

    let err = repo.attach_address(999, address_id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Owner,
            id: 999
        }
    ));

    let err = repo.attach_address(owner_id, 999).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Address,
            id: 999
        }
    ));

    let err = repo.list_addresses_for_owner(999).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn address_owner_foreign_key_is_enforced_on_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    let err = repo.create_address(&overland_park().owned_by(404)).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
}

#[test]
fn owners_and_projects_link_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();

    let howie_id = owners.create_owner(&howie()).unwrap();
    let ada_id = owners.create_owner(&Owner::new("Ada", "Engineer")).unwrap();
    let kitchen = projects
        .create_project(&Project::named("Clean kitchen"))
        .unwrap();
    let garage = projects.create_project(&Project::named("Clean garage")).unwrap();

    owners.link_project(howie_id, kitchen).unwrap();
    owners.link_project(howie_id, garage).unwrap();
    projects.add_owner(kitchen, ada_id).unwrap();

    let howie_projects: Vec<_> = owners
        .list_projects_for_owner(howie_id)
        .unwrap()
        .into_iter()
        .map(|project| project.id.unwrap())
        .collect();
    assert_eq!(howie_projects, vec![kitchen, garage]);

    let kitchen_owners: Vec<_> = projects
        .list_owners_for_project(kitchen)
        .unwrap()
        .into_iter()
        .map(|owner| owner.id.unwrap())
        .collect();
    assert_eq!(kitchen_owners, vec![howie_id, ada_id]);

    assert_eq!(
        owners.list_projects_for_owner(ada_id).unwrap()[0].name.as_deref(),
        Some("Clean kitchen")
    );
}

#[test]
fn linking_project_twice_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();

    let owner_id = owners.create_owner(&howie()).unwrap();
    let project_id = projects.create_project(&Project::named("Solar")).unwrap();

    owners.link_project(owner_id, project_id).unwrap();
    owners.link_project(owner_id, project_id).unwrap();
    projects.add_owner(project_id, owner_id).unwrap();

    assert_eq!(owners.list_projects_for_owner(owner_id).unwrap().len(), 1);
    assert_eq!(projects.list_owners_for_project(project_id).unwrap().len(), 1);
}

#[test]
fn unlink_project_reports_whether_a_link_existed() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();

    let owner_id = owners.create_owner(&howie()).unwrap();
    let project_id = projects.create_project(&Project::named("Solar")).unwrap();
    owners.link_project(owner_id, project_id).unwrap();

    assert!(owners.unlink_project(owner_id, project_id).unwrap());
    assert!(!owners.unlink_project(owner_id, project_id).unwrap());
    assert!(projects.list_owners_for_project(project_id).unwrap().is_empty());
}

#[test]
fn deleting_project_removes_owner_links() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();

    let owner_id = owners.create_owner(&howie()).unwrap();
    let project_id = projects.create_project(&Project::named("Solar")).unwrap();
    owners.link_project(owner_id, project_id).unwrap();

    projects.delete_project(project_id).unwrap();
    assert!(owners.list_projects_for_owner(owner_id).unwrap().is_empty());
    assert!(owners.get_owner(owner_id).unwrap().is_some());
}

#[test]
fn link_project_requires_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let owner_id = owners.create_owner(&howie()).unwrap();

    let err = owners.link_project(owner_id, 77).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Project,
            id: 77
        }
    ));
}

#[test]
fn address_and_coordinate_navigate_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let coordinate_id = repo.create_coordinate(&Coordinate::new(32.1, -87.42)).unwrap();
    let address_id = repo.create_address(&overland_park()).unwrap();
    assert_eq!(repo.coordinate_of_address(address_id).unwrap(), None);
    assert_eq!(repo.address_for_coordinate(coordinate_id).unwrap(), None);

    repo.set_address_coordinate(address_id, Some(coordinate_id))
        .unwrap();

    let coordinate = repo.coordinate_of_address(address_id).unwrap().unwrap();
    assert_eq!(coordinate.lat, Some(32.1));
    let address = repo.address_for_coordinate(coordinate_id).unwrap().unwrap();
    assert_eq!(address.id, Some(address_id));

    repo.set_address_coordinate(address_id, None).unwrap();
    assert_eq!(repo.address_for_coordinate(coordinate_id).unwrap(), None);
}

#[test]
fn a_coordinate_belongs_to_at_most_one_address() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let coordinate_id = repo.create_coordinate(&Coordinate::new(1.0, 2.0)).unwrap();
    repo.create_address(&overland_park().located_at(coordinate_id))
        .unwrap();
    let other = repo.create_address(&Address::default()).unwrap();

    let err = repo
        .set_address_coordinate(other, Some(coordinate_id))
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
}

#[test]
fn create_owner_with_addresses_assigns_the_new_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();
    let other = repo.create_owner(&Owner::new("Ada", "Engineer")).unwrap();

    let owner_id = repo
        .create_owner_with_addresses(
            &howie(),
            &[overland_park().owned_by(other), Address::default()],
        )
        .unwrap();

    let addresses = repo.list_addresses_for_owner(owner_id).unwrap();
    assert_eq!(addresses.len(), 2);
    assert!(repo.list_addresses_for_owner(other).unwrap().is_empty());
}

#[test]
fn create_owner_with_addresses_leaves_nothing_on_failure() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::try_new(&conn).unwrap();

    let err = repo
        .create_owner_with_addresses(
            &howie(),
            &[
                Address {
                    id: Some(5),
                    ..overland_park()
                },
                Address {
                    id: Some(5),
                    ..Address::default()
                },
            ],
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert!(repo.list_owners().unwrap().is_empty());
    assert_eq!(repo.get_address(5).unwrap(), None);
}
