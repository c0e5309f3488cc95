//! Owner/address repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `owners`, `addresses` and `coordinates`.
//! - Own the owner side of `Owner.addresses` (append/pop) and the
//!   `owner_projects` link table.
//! - Wire the one-to-one address/coordinate pair in both directions.
//!
//! # Invariants
//! - An address has at most one owner; detaching clears `owner_id`.
//! - Linking an owner to a project is idempotent.
//! - A coordinate locates at most one address (`UNIQUE coordinate_id`).
//! - Multi-row creates run in one immediate transaction and leave no rows
//!   behind on failure.

use crate::model::address::{Address, AddressId};
use crate::model::coordinate::{Coordinate, CoordinateId};
use crate::model::entity::EntityKind;
use crate::model::owner::{Owner, OwnerId};
use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{parse_project_row, PROJECT_SELECT_SQL};
use crate::repo::{
    ensure_connection_ready, expect_changed, persisted_id, require_entity, RepoError, RepoResult,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

pub(crate) const OWNER_SELECT_SQL: &str = "SELECT
    o.id AS id,
    o.name AS name,
    o.summary AS summary
FROM owners o";

const ADDRESS_SELECT_SQL: &str = "SELECT
    a.id AS id,
    a.address AS address,
    a.city AS city,
    a.state AS state,
    a.zip AS zip,
    a.owner_id AS owner_id,
    a.coordinate_id AS coordinate_id
FROM addresses a";

const COORDINATE_SELECT_SQL: &str = "SELECT
    c.id AS id,
    c.lat AS lat,
    c.long AS long
FROM coordinates c";

/// Repository interface for owners, their addresses and project links.
pub trait OwnerRepository {
    fn create_owner(&self, owner: &Owner) -> RepoResult<OwnerId>;
    /// Creates one owner together with its addresses, all or nothing.
    ///
    /// Any `owner_id` already set on the addresses is overridden.
    fn create_owner_with_addresses(
        &self,
        owner: &Owner,
        addresses: &[Address],
    ) -> RepoResult<OwnerId>;
    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<Owner>>;
    fn update_owner(&self, owner: &Owner) -> RepoResult<()>;
    /// Deletes an owner; its addresses become unowned and project links go.
    fn delete_owner(&self, id: OwnerId) -> RepoResult<()>;
    fn list_owners(&self) -> RepoResult<Vec<Owner>>;

    fn create_address(&self, address: &Address) -> RepoResult<AddressId>;
    fn get_address(&self, id: AddressId) -> RepoResult<Option<Address>>;
    fn update_address(&self, address: &Address) -> RepoResult<()>;
    fn delete_address(&self, id: AddressId) -> RepoResult<()>;
    /// Appends one address to `Owner.addresses`, moving it from any prior owner.
    fn attach_address(&self, owner_id: OwnerId, address_id: AddressId) -> RepoResult<()>;
    /// Removes one address from its owner's collection.
    fn detach_address(&self, address_id: AddressId) -> RepoResult<()>;
    fn list_addresses_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Address>>;
    fn owner_of_address(&self, address_id: AddressId) -> RepoResult<Option<Owner>>;

    fn create_coordinate(&self, coordinate: &Coordinate) -> RepoResult<CoordinateId>;
    fn get_coordinate(&self, id: CoordinateId) -> RepoResult<Option<Coordinate>>;
    /// Sets or clears the one-to-one coordinate of an address.
    fn set_address_coordinate(
        &self,
        address_id: AddressId,
        coordinate_id: Option<CoordinateId>,
    ) -> RepoResult<()>;
    fn coordinate_of_address(&self, address_id: AddressId) -> RepoResult<Option<Coordinate>>;
    fn address_for_coordinate(&self, coordinate_id: CoordinateId) -> RepoResult<Option<Address>>;

    fn link_project(&self, owner_id: OwnerId, project_id: ProjectId) -> RepoResult<()>;
    /// Returns whether a link existed.
    fn unlink_project(&self, owner_id: OwnerId, project_id: ProjectId) -> RepoResult<bool>;
    fn list_projects_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed owner repository.
pub struct SqliteOwnerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOwnerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &["owners", "addresses", "coordinates", "owner_projects"],
        )?;
        Ok(Self { conn })
    }
}

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn create_owner(&self, owner: &Owner) -> RepoResult<OwnerId> {
        owner.validate()?;
        insert_owner(self.conn, owner)
    }

    fn create_owner_with_addresses(
        &self,
        owner: &Owner,
        addresses: &[Address],
    ) -> RepoResult<OwnerId> {
        owner.validate()?;
        for address in addresses {
            address.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let owner_id = insert_owner(&tx, owner)?;
        for address in addresses {
            let owned = Address {
                owner_id: Some(owner_id),
                ..address.clone()
            };
            insert_address(&tx, &owned)?;
        }
        tx.commit()?;

        debug!(
            "event=owner_create module=repo status=ok owner_id={owner_id} address_count={}",
            addresses.len()
        );
        Ok(owner_id)
    }

    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<Owner>> {
        let owner = self
            .conn
            .query_row(
                &format!("{OWNER_SELECT_SQL} WHERE o.id = ?1;"),
                [id],
                read_owner_row,
            )
            .optional()?;
        owner.map(checked_owner).transpose()
    }

    fn update_owner(&self, owner: &Owner) -> RepoResult<()> {
        owner.validate()?;
        let id = persisted_id(EntityKind::Owner, owner.id)?;
        let changed = self.conn.execute(
            "UPDATE owners SET name = ?2, summary = ?3 WHERE id = ?1;",
            params![id, owner.name.as_deref(), owner.summary.as_deref()],
        )?;
        expect_changed(changed, EntityKind::Owner, id)
    }

    fn delete_owner(&self, id: OwnerId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM owners WHERE id = ?1;", [id])?;
        expect_changed(changed, EntityKind::Owner, id)
    }

    fn list_owners(&self) -> RepoResult<Vec<Owner>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{OWNER_SELECT_SQL} ORDER BY o.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut owners = Vec::new();
        while let Some(row) = rows.next()? {
            owners.push(parse_owner_row(row)?);
        }
        Ok(owners)
    }

    fn create_address(&self, address: &Address) -> RepoResult<AddressId> {
        address.validate()?;
        insert_address(self.conn, address)
    }

    fn get_address(&self, id: AddressId) -> RepoResult<Option<Address>> {
        fetch_address(self.conn, "a.id = ?1", id)
    }

    fn update_address(&self, address: &Address) -> RepoResult<()> {
        address.validate()?;
        let id = persisted_id(EntityKind::Address, address.id)?;
        let changed = self.conn.execute(
            "UPDATE addresses
             SET
                address = ?2,
                city = ?3,
                state = ?4,
                zip = ?5,
                owner_id = ?6,
                coordinate_id = ?7
             WHERE id = ?1;",
            params![
                id,
                address.address.as_deref(),
                address.city.as_deref(),
                address.state.as_deref(),
                address.zip,
                address.owner_id,
                address.coordinate_id,
            ],
        )?;
        expect_changed(changed, EntityKind::Address, id)
    }

    fn delete_address(&self, id: AddressId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM addresses WHERE id = ?1;", [id])?;
        expect_changed(changed, EntityKind::Address, id)
    }

    fn attach_address(&self, owner_id: OwnerId, address_id: AddressId) -> RepoResult<()> {
        require_entity(self.conn, EntityKind::Owner, owner_id)?;
        let changed = self.conn.execute(
            "UPDATE addresses SET owner_id = ?2 WHERE id = ?1;",
            params![address_id, owner_id],
        )?;
        expect_changed(changed, EntityKind::Address, address_id)?;
        debug!("event=address_attach module=repo status=ok owner_id={owner_id} address_id={address_id}");
        Ok(())
    }

    fn detach_address(&self, address_id: AddressId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE addresses SET owner_id = NULL WHERE id = ?1;",
            [address_id],
        )?;
        expect_changed(changed, EntityKind::Address, address_id)
    }

    fn list_addresses_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Address>> {
        require_entity(self.conn, EntityKind::Owner, owner_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{ADDRESS_SELECT_SQL} WHERE a.owner_id = ?1 ORDER BY a.id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut addresses = Vec::new();
        while let Some(row) = rows.next()? {
            addresses.push(parse_address_row(row)?);
        }
        Ok(addresses)
    }

    fn owner_of_address(&self, address_id: AddressId) -> RepoResult<Option<Owner>> {
        let address = self
            .get_address(address_id)?
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Address,
                id: address_id,
            })?;
        match address.owner_id {
            Some(owner_id) => self.get_owner(owner_id),
            None => Ok(None),
        }
    }

    fn create_coordinate(&self, coordinate: &Coordinate) -> RepoResult<CoordinateId> {
        coordinate.validate()?;
        self.conn.execute(
            "INSERT INTO coordinates (id, lat, long) VALUES (?1, ?2, ?3);",
            params![coordinate.id, coordinate.lat, coordinate.long],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_coordinate(&self, id: CoordinateId) -> RepoResult<Option<Coordinate>> {
        let coordinate = self
            .conn
            .query_row(
                &format!("{COORDINATE_SELECT_SQL} WHERE c.id = ?1;"),
                [id],
                read_coordinate_row,
            )
            .optional()?;
        match coordinate {
            Some(coordinate) => {
                coordinate.validate()?;
                Ok(Some(coordinate))
            }
            None => Ok(None),
        }
    }

    fn set_address_coordinate(
        &self,
        address_id: AddressId,
        coordinate_id: Option<CoordinateId>,
    ) -> RepoResult<()> {
        if let Some(coordinate_id) = coordinate_id {
            require_entity(self.conn, EntityKind::Coordinate, coordinate_id)?;
        }
        let changed = self.conn.execute(
            "UPDATE addresses SET coordinate_id = ?2 WHERE id = ?1;",
            params![address_id, coordinate_id],
        )?;
        expect_changed(changed, EntityKind::Address, address_id)
    }

    fn coordinate_of_address(&self, address_id: AddressId) -> RepoResult<Option<Coordinate>> {
        let address = self
            .get_address(address_id)?
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Address,
                id: address_id,
            })?;
        match address.coordinate_id {
            Some(coordinate_id) => self.get_coordinate(coordinate_id),
            None => Ok(None),
        }
    }

    fn address_for_coordinate(&self, coordinate_id: CoordinateId) -> RepoResult<Option<Address>> {
        require_entity(self.conn, EntityKind::Coordinate, coordinate_id)?;
        fetch_address(self.conn, "a.coordinate_id = ?1", coordinate_id)
    }

    fn link_project(&self, owner_id: OwnerId, project_id: ProjectId) -> RepoResult<()> {
        link_owner_project(self.conn, owner_id, project_id)
    }

    fn unlink_project(&self, owner_id: OwnerId, project_id: ProjectId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM owner_projects WHERE owner_id = ?1 AND project_id = ?2;",
            params![owner_id, project_id],
        )?;
        Ok(changed > 0)
    }

    fn list_projects_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Project>> {
        require_entity(self.conn, EntityKind::Owner, owner_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             INNER JOIN owner_projects op ON op.project_id = p.id
             WHERE op.owner_id = ?1
             ORDER BY p.id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

fn insert_owner(conn: &Connection, owner: &Owner) -> RepoResult<OwnerId> {
    conn.execute(
        "INSERT INTO owners (id, name, summary) VALUES (?1, ?2, ?3);",
        params![owner.id, owner.name.as_deref(), owner.summary.as_deref()],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_address(conn: &Connection, address: &Address) -> RepoResult<AddressId> {
    conn.execute(
        "INSERT INTO addresses (id, address, city, state, zip, owner_id, coordinate_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            address.id,
            address.address.as_deref(),
            address.city.as_deref(),
            address.state.as_deref(),
            address.zip,
            address.owner_id,
            address.coordinate_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts one `owner_projects` link; both sides must exist.
pub(crate) fn link_owner_project(
    conn: &Connection,
    owner_id: OwnerId,
    project_id: ProjectId,
) -> RepoResult<()> {
    require_entity(conn, EntityKind::Owner, owner_id)?;
    require_entity(conn, EntityKind::Project, project_id)?;
    conn.execute(
        "INSERT OR IGNORE INTO owner_projects (owner_id, project_id) VALUES (?1, ?2);",
        params![owner_id, project_id],
    )?;
    debug!("event=owner_project_link module=repo status=ok owner_id={owner_id} project_id={project_id}");
    Ok(())
}

pub(crate) fn parse_owner_row(row: &Row<'_>) -> RepoResult<Owner> {
    checked_owner(read_owner_row(row)?)
}

fn read_owner_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        summary: row.get("summary")?,
    })
}

fn checked_owner(owner: Owner) -> RepoResult<Owner> {
    owner.validate()?;
    Ok(owner)
}

fn fetch_address(conn: &Connection, predicate: &str, id: i64) -> RepoResult<Option<Address>> {
    let mut stmt = conn.prepare(&format!("{ADDRESS_SELECT_SQL} WHERE {predicate};"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_address_row(row)?));
    }
    Ok(None)
}

fn parse_address_row(row: &Row<'_>) -> RepoResult<Address> {
    let address = Address {
        id: Some(row.get("id")?),
        address: row.get("address")?,
        city: row.get("city")?,
        state: row.get("state")?,
        zip: row.get("zip")?,
        owner_id: row.get("owner_id")?,
        coordinate_id: row.get("coordinate_id")?,
    };
    address.validate()?;
    Ok(address)
}

fn read_coordinate_row(row: &Row<'_>) -> rusqlite::Result<Coordinate> {
    Ok(Coordinate {
        id: Some(row.get("id")?),
        lat: row.get("lat")?,
        long: row.get("long")?,
    })
}
