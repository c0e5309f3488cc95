//! Area-of-effect repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `areas_of_effect`, `radii`, `lines` and `fuel_types`.
//! - Wire the links an area declares: site, radius, line, fuel type and
//!   address.
//!
//! # Invariants
//! - Radius is navigable both ways; line and address only from the area.
//! - A fuel type row is shared: reassigning areas never copies it.
//! - Attaching a radius, line or address that already belongs to another
//!   area is rejected as `ConstraintViolation`.
//! - Fuel names match on `FuelType::lookup_key` (trimmed, Unicode
//!   lowercase), stored in `fuel_types.fuel_key`.
//! - An area created together with its shape is written in one immediate
//!   transaction; on failure neither row remains.

use crate::model::address::AddressId;
use crate::model::area::{AreaOfEffect, AreaOfEffectId};
use crate::model::entity::EntityKind;
use crate::model::fuel_type::{FuelType, FuelTypeId};
use crate::model::geometry::{Line, LineId, Radius, RadiusId};
use crate::model::site::SiteId;
use crate::repo::{
    ensure_connection_ready, expect_changed, persisted_id, require_entity, RepoResult,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const AREA_SELECT_SQL: &str = "SELECT
    ae.id AS id,
    ae.site_id AS site_id,
    ae.radius_id AS radius_id,
    ae.line_id AS line_id,
    ae.fuel_type_id AS fuel_type_id,
    ae.address_id AS address_id
FROM areas_of_effect ae";

/// Which single-valued link of an area a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AreaLink {
    Site,
    Radius,
    Line,
    FuelType,
    Address,
}

impl AreaLink {
    fn column(self) -> &'static str {
        match self {
            Self::Site => "site_id",
            Self::Radius => "radius_id",
            Self::Line => "line_id",
            Self::FuelType => "fuel_type_id",
            Self::Address => "address_id",
        }
    }

    fn target(self) -> EntityKind {
        match self {
            Self::Site => EntityKind::Site,
            Self::Radius => EntityKind::Radius,
            Self::Line => EntityKind::Line,
            Self::FuelType => EntityKind::FuelType,
            Self::Address => EntityKind::Address,
        }
    }
}

/// Repository interface for areas of effect and the shapes they reference.
pub trait AreaRepository {
    fn create_area(&self, area: &AreaOfEffect) -> RepoResult<AreaOfEffectId>;
    /// Creates `radius` and an area using it, all or nothing.
    ///
    /// `area.radius_id` is replaced by the new radius id.
    fn create_area_with_radius(
        &self,
        area: &AreaOfEffect,
        radius: &Radius,
    ) -> RepoResult<AreaOfEffectId>;
    /// Creates `line` and an area using it, all or nothing.
    ///
    /// `area.line_id` is replaced by the new line id.
    fn create_area_with_line(
        &self,
        area: &AreaOfEffect,
        line: &Line,
    ) -> RepoResult<AreaOfEffectId>;
    fn get_area(&self, id: AreaOfEffectId) -> RepoResult<Option<AreaOfEffect>>;
    fn update_area(&self, area: &AreaOfEffect) -> RepoResult<()>;
    fn delete_area(&self, id: AreaOfEffectId) -> RepoResult<()>;

    /// Appends one area to `Site.areas_of_effect`.
    fn add_area_to_site(&self, site_id: SiteId, area_id: AreaOfEffectId) -> RepoResult<()>;
    fn list_areas_for_site(&self, site_id: SiteId) -> RepoResult<Vec<AreaOfEffect>>;

    fn create_radius(&self, radius: &Radius) -> RepoResult<RadiusId>;
    fn get_radius(&self, id: RadiusId) -> RepoResult<Option<Radius>>;
    fn set_area_radius(
        &self,
        area_id: AreaOfEffectId,
        radius_id: Option<RadiusId>,
    ) -> RepoResult<()>;
    /// Back-link of the one-to-one radius relation.
    fn area_for_radius(&self, radius_id: RadiusId) -> RepoResult<Option<AreaOfEffect>>;

    fn create_line(&self, line: &Line) -> RepoResult<LineId>;
    fn get_line(&self, id: LineId) -> RepoResult<Option<Line>>;
    fn set_area_line(&self, area_id: AreaOfEffectId, line_id: Option<LineId>) -> RepoResult<()>;
    fn set_line_end_location(
        &self,
        line_id: LineId,
        address_id: Option<AddressId>,
    ) -> RepoResult<()>;

    fn create_fuel_type(&self, fuel_type: &FuelType) -> RepoResult<FuelTypeId>;
    fn get_fuel_type(&self, id: FuelTypeId) -> RepoResult<Option<FuelType>>;
    /// Exact match on the trimmed, case-folded fuel name.
    fn find_fuel_type_by_name(&self, fuel: &str) -> RepoResult<Option<FuelType>>;
    fn set_area_fuel_type(
        &self,
        area_id: AreaOfEffectId,
        fuel_type_id: Option<FuelTypeId>,
    ) -> RepoResult<()>;
    fn list_areas_for_fuel_type(&self, fuel_type_id: FuelTypeId) -> RepoResult<Vec<AreaOfEffect>>;

    fn set_area_address(
        &self,
        area_id: AreaOfEffectId,
        address_id: Option<AddressId>,
    ) -> RepoResult<()>;
}

/// SQLite-backed area repository.
pub struct SqliteAreaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAreaRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &["areas_of_effect", "radii", "lines", "fuel_types", "sites", "addresses"],
        )?;
        Ok(Self { conn })
    }

    fn set_link(
        &self,
        area_id: AreaOfEffectId,
        link: AreaLink,
        target: Option<i64>,
    ) -> RepoResult<()> {
        if let Some(target_id) = target {
            require_entity(self.conn, link.target(), target_id)?;
        }
        let changed = self.conn.execute(
            &format!(
                "UPDATE areas_of_effect SET {} = ?2 WHERE id = ?1;",
                link.column()
            ),
            params![area_id, target],
        )?;
        expect_changed(changed, EntityKind::AreaOfEffect, area_id)?;
        debug!(
            "event=area_link module=repo status=ok area_id={area_id} link={} target_id={}",
            link.column(),
            target.map_or_else(|| "null".to_string(), |id| id.to_string())
        );
        Ok(())
    }

    fn list_areas_where(&self, column: &str, id: i64) -> RepoResult<Vec<AreaOfEffect>> {
        let mut stmt = self.conn.prepare(&format!(
            "{AREA_SELECT_SQL} WHERE ae.{column} = ?1 ORDER BY ae.id ASC;"
        ))?;
        let mut rows = stmt.query([id])?;
        let mut areas = Vec::new();
        while let Some(row) = rows.next()? {
            areas.push(parse_area_row(row)?);
        }
        Ok(areas)
    }
}

impl AreaRepository for SqliteAreaRepository<'_> {
    fn create_area(&self, area: &AreaOfEffect) -> RepoResult<AreaOfEffectId> {
        area.validate()?;
        insert_area(self.conn, area)
    }

    fn create_area_with_radius(
        &self,
        area: &AreaOfEffect,
        radius: &Radius,
    ) -> RepoResult<AreaOfEffectId> {
        area.validate()?;
        radius.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let radius_id = insert_radius(&tx, radius)?;
        let area_id = insert_area(
            &tx,
            &AreaOfEffect {
                radius_id: Some(radius_id),
                ..area.clone()
            },
        )?;
        tx.commit()?;

        debug!("event=area_create module=repo status=ok area_id={area_id} radius_id={radius_id}");
        Ok(area_id)
    }

    fn create_area_with_line(
        &self,
        area: &AreaOfEffect,
        line: &Line,
    ) -> RepoResult<AreaOfEffectId> {
        area.validate()?;
        line.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let line_id = insert_line(&tx, line)?;
        let area_id = insert_area(
            &tx,
            &AreaOfEffect {
                line_id: Some(line_id),
                ..area.clone()
            },
        )?;
        tx.commit()?;

        debug!("event=area_create module=repo status=ok area_id={area_id} line_id={line_id}");
        Ok(area_id)
    }

    fn get_area(&self, id: AreaOfEffectId) -> RepoResult<Option<AreaOfEffect>> {
        Ok(self.list_areas_where("id", id)?.into_iter().next())
    }

    fn update_area(&self, area: &AreaOfEffect) -> RepoResult<()> {
        area.validate()?;
        let id = persisted_id(EntityKind::AreaOfEffect, area.id)?;
        let changed = self.conn.execute(
            "UPDATE areas_of_effect
             SET
                site_id = ?2,
                radius_id = ?3,
                line_id = ?4,
                fuel_type_id = ?5,
                address_id = ?6
             WHERE id = ?1;",
            params![
                id,
                area.site_id,
                area.radius_id,
                area.line_id,
                area.fuel_type_id,
                area.address_id,
            ],
        )?;
        expect_changed(changed, EntityKind::AreaOfEffect, id)
    }

    fn delete_area(&self, id: AreaOfEffectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM areas_of_effect WHERE id = ?1;", [id])?;
        expect_changed(changed, EntityKind::AreaOfEffect, id)
    }

    fn add_area_to_site(&self, site_id: SiteId, area_id: AreaOfEffectId) -> RepoResult<()> {
        self.set_link(area_id, AreaLink::Site, Some(site_id))
    }

    fn list_areas_for_site(&self, site_id: SiteId) -> RepoResult<Vec<AreaOfEffect>> {
        require_entity(self.conn, EntityKind::Site, site_id)?;
        self.list_areas_where(AreaLink::Site.column(), site_id)
    }

    fn create_radius(&self, radius: &Radius) -> RepoResult<RadiusId> {
        radius.validate()?;
        insert_radius(self.conn, radius)
    }

    fn get_radius(&self, id: RadiusId) -> RepoResult<Option<Radius>> {
        let radius = self
            .conn
            .query_row(
                "SELECT id, radius FROM radii WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Radius {
                        id: Some(row.get("id")?),
                        radius: row.get("radius")?,
                    })
                },
            )
            .optional()?;
        if let Some(radius) = radius.as_ref() {
            radius.validate()?;
        }
        Ok(radius)
    }

    fn set_area_radius(
        &self,
        area_id: AreaOfEffectId,
        radius_id: Option<RadiusId>,
    ) -> RepoResult<()> {
        self.set_link(area_id, AreaLink::Radius, radius_id)
    }

    fn area_for_radius(&self, radius_id: RadiusId) -> RepoResult<Option<AreaOfEffect>> {
        require_entity(self.conn, EntityKind::Radius, radius_id)?;
        Ok(self
            .list_areas_where(AreaLink::Radius.column(), radius_id)?
            .into_iter()
            .next())
    }

    fn create_line(&self, line: &Line) -> RepoResult<LineId> {
        line.validate()?;
        insert_line(self.conn, line)
    }

    fn get_line(&self, id: LineId) -> RepoResult<Option<Line>> {
        let line = self
            .conn
            .query_row(
                "SELECT id, end_location_id FROM lines WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Line {
                        id: Some(row.get("id")?),
                        end_location_id: row.get("end_location_id")?,
                    })
                },
            )
            .optional()?;
        if let Some(line) = line.as_ref() {
            line.validate()?;
        }
        Ok(line)
    }

    fn set_area_line(&self, area_id: AreaOfEffectId, line_id: Option<LineId>) -> RepoResult<()> {
        self.set_link(area_id, AreaLink::Line, line_id)
    }

    fn set_line_end_location(
        &self,
        line_id: LineId,
        address_id: Option<AddressId>,
    ) -> RepoResult<()> {
        if let Some(address_id) = address_id {
            require_entity(self.conn, EntityKind::Address, address_id)?;
        }
        let changed = self.conn.execute(
            "UPDATE lines SET end_location_id = ?2 WHERE id = ?1;",
            params![line_id, address_id],
        )?;
        expect_changed(changed, EntityKind::Line, line_id)
    }

    fn create_fuel_type(&self, fuel_type: &FuelType) -> RepoResult<FuelTypeId> {
        fuel_type.validate()?;
        self.conn.execute(
            "INSERT INTO fuel_types (id, fuel, fuel_key) VALUES (?1, ?2, ?3);",
            params![
                fuel_type.id,
                fuel_type.fuel.as_deref(),
                fuel_type.fuel.as_deref().map(FuelType::lookup_key),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_fuel_type(&self, id: FuelTypeId) -> RepoResult<Option<FuelType>> {
        fetch_fuel_type(self.conn, "id = ?1", &id)
    }

    fn find_fuel_type_by_name(&self, fuel: &str) -> RepoResult<Option<FuelType>> {
        fetch_fuel_type(self.conn, "fuel_key = ?1", &FuelType::lookup_key(fuel))
    }

    fn set_area_fuel_type(
        &self,
        area_id: AreaOfEffectId,
        fuel_type_id: Option<FuelTypeId>,
    ) -> RepoResult<()> {
        self.set_link(area_id, AreaLink::FuelType, fuel_type_id)
    }

    fn list_areas_for_fuel_type(&self, fuel_type_id: FuelTypeId) -> RepoResult<Vec<AreaOfEffect>> {
        require_entity(self.conn, EntityKind::FuelType, fuel_type_id)?;
        self.list_areas_where(AreaLink::FuelType.column(), fuel_type_id)
    }

    fn set_area_address(
        &self,
        area_id: AreaOfEffectId,
        address_id: Option<AddressId>,
    ) -> RepoResult<()> {
        self.set_link(area_id, AreaLink::Address, address_id)
    }
}

fn insert_area(conn: &Connection, area: &AreaOfEffect) -> RepoResult<AreaOfEffectId> {
    conn.execute(
        "INSERT INTO areas_of_effect (id, site_id, radius_id, line_id, fuel_type_id, address_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            area.id,
            area.site_id,
            area.radius_id,
            area.line_id,
            area.fuel_type_id,
            area.address_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_radius(conn: &Connection, radius: &Radius) -> RepoResult<RadiusId> {
    conn.execute(
        "INSERT INTO radii (id, radius) VALUES (?1, ?2);",
        params![radius.id, radius.radius],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_line(conn: &Connection, line: &Line) -> RepoResult<LineId> {
    conn.execute(
        "INSERT INTO lines (id, end_location_id) VALUES (?1, ?2);",
        params![line.id, line.end_location_id],
    )?;
    Ok(conn.last_insert_rowid())
}

fn fetch_fuel_type(
    conn: &Connection,
    predicate: &str,
    value: &dyn rusqlite::ToSql,
) -> RepoResult<Option<FuelType>> {
    let fuel_type = conn
        .query_row(
            &format!("SELECT id, fuel FROM fuel_types WHERE {predicate};"),
            [value],
            |row| {
                Ok(FuelType {
                    id: Some(row.get("id")?),
                    fuel: row.get("fuel")?,
                })
            },
        )
        .optional()?;
    if let Some(fuel_type) = fuel_type.as_ref() {
        fuel_type.validate()?;
    }
    Ok(fuel_type)
}

fn parse_area_row(row: &Row<'_>) -> RepoResult<AreaOfEffect> {
    let area = AreaOfEffect {
        id: Some(row.get("id")?),
        site_id: row.get("site_id")?,
        radius_id: row.get("radius_id")?,
        line_id: row.get("line_id")?,
        fuel_type_id: row.get("fuel_type_id")?,
        address_id: row.get("address_id")?,
    };
    area.validate()?;
    Ok(area)
}
