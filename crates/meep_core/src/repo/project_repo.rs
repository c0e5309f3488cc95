//! Project/site repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `projects` and `sites`.
//! - Own the project side of `Project.sites` and `Project.owners`.
//!
//! # Invariants
//! - Site listing is deterministic: `id ASC`.
//! - `duration` round-trips through whole seconds.

use crate::model::entity::EntityKind;
use crate::model::owner::{Owner, OwnerId};
use crate::model::project::{Project, ProjectId};
use crate::model::site::{Site, SiteId};
use crate::repo::owner_repo::{link_owner_project, parse_owner_row, OWNER_SELECT_SQL};
use crate::repo::{
    ensure_connection_ready, expect_changed, persisted_id, require_entity, RepoError, RepoResult,
};
use chrono::TimeDelta;
use rusqlite::{params, Connection, Row};

pub(crate) const PROJECT_SELECT_SQL: &str = "SELECT
    p.id AS id,
    p.name AS name,
    p.start_date AS start_date,
    p.duration_secs AS duration_secs,
    p.project_type AS project_type,
    p.summary AS summary
FROM projects p";

const SITE_SELECT_SQL: &str = "SELECT
    s.id AS id,
    s.ghg_reduced AS ghg_reduced,
    s.gge_reduced AS gge_reduced,
    s.project_id AS project_id
FROM sites s";

/// Repository interface for projects, their sites and owners.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    /// Deletes a project; its sites become unassigned and owner links go.
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;

    fn create_site(&self, site: &Site) -> RepoResult<SiteId>;
    fn get_site(&self, id: SiteId) -> RepoResult<Option<Site>>;
    fn update_site(&self, site: &Site) -> RepoResult<()>;
    fn delete_site(&self, id: SiteId) -> RepoResult<()>;
    /// Appends one site to `Project.sites`.
    fn add_site(&self, project_id: ProjectId, site_id: SiteId) -> RepoResult<()>;
    /// Removes one site from its project.
    fn remove_site(&self, site_id: SiteId) -> RepoResult<()>;
    fn list_sites_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Site>>;
    fn project_of_site(&self, site_id: SiteId) -> RepoResult<Option<Project>>;

    fn add_owner(&self, project_id: ProjectId, owner_id: OwnerId) -> RepoResult<()>;
    fn list_owners_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Owner>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["projects", "sites", "owner_projects", "owners"])?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;
        self.conn.execute(
            "INSERT INTO projects (id, name, start_date, duration_secs, project_type, summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                project.id,
                project.name.as_deref(),
                project.start_date,
                project.duration.map(|duration| duration.num_seconds()),
                project.project_type.as_deref(),
                project.summary.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE p.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;
        let id = persisted_id(EntityKind::Project, project.id)?;
        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?2,
                start_date = ?3,
                duration_secs = ?4,
                project_type = ?5,
                summary = ?6
             WHERE id = ?1;",
            params![
                id,
                project.name.as_deref(),
                project.start_date,
                project.duration.map(|duration| duration.num_seconds()),
                project.project_type.as_deref(),
                project.summary.as_deref(),
            ],
        )?;
        expect_changed(changed, EntityKind::Project, id)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        expect_changed(changed, EntityKind::Project, id)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY p.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn create_site(&self, site: &Site) -> RepoResult<SiteId> {
        site.validate()?;
        self.conn.execute(
            "INSERT INTO sites (id, ghg_reduced, gge_reduced, project_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![site.id, site.ghg_reduced, site.gge_reduced, site.project_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_site(&self, id: SiteId) -> RepoResult<Option<Site>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SITE_SELECT_SQL} WHERE s.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_site_row(row)?));
        }
        Ok(None)
    }

    fn update_site(&self, site: &Site) -> RepoResult<()> {
        site.validate()?;
        let id = persisted_id(EntityKind::Site, site.id)?;
        let changed = self.conn.execute(
            "UPDATE sites
             SET ghg_reduced = ?2, gge_reduced = ?3, project_id = ?4
             WHERE id = ?1;",
            params![id, site.ghg_reduced, site.gge_reduced, site.project_id],
        )?;
        expect_changed(changed, EntityKind::Site, id)
    }

    fn delete_site(&self, id: SiteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM sites WHERE id = ?1;", [id])?;
        expect_changed(changed, EntityKind::Site, id)
    }

    fn add_site(&self, project_id: ProjectId, site_id: SiteId) -> RepoResult<()> {
        require_entity(self.conn, EntityKind::Project, project_id)?;
        let changed = self.conn.execute(
            "UPDATE sites SET project_id = ?2 WHERE id = ?1;",
            params![site_id, project_id],
        )?;
        expect_changed(changed, EntityKind::Site, site_id)
    }

    fn remove_site(&self, site_id: SiteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE sites SET project_id = NULL WHERE id = ?1;",
            [site_id],
        )?;
        expect_changed(changed, EntityKind::Site, site_id)
    }

    fn list_sites_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Site>> {
        require_entity(self.conn, EntityKind::Project, project_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{SITE_SELECT_SQL} WHERE s.project_id = ?1 ORDER BY s.id ASC;"
        ))?;
        let mut rows = stmt.query([project_id])?;
        let mut sites = Vec::new();
        while let Some(row) = rows.next()? {
            sites.push(parse_site_row(row)?);
        }
        Ok(sites)
    }

    fn project_of_site(&self, site_id: SiteId) -> RepoResult<Option<Project>> {
        let site = self.get_site(site_id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Site,
            id: site_id,
        })?;
        match site.project_id {
            Some(project_id) => self.get_project(project_id),
            None => Ok(None),
        }
    }

    fn add_owner(&self, project_id: ProjectId, owner_id: OwnerId) -> RepoResult<()> {
        link_owner_project(self.conn, owner_id, project_id)
    }

    fn list_owners_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Owner>> {
        require_entity(self.conn, EntityKind::Project, project_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{OWNER_SELECT_SQL}
             INNER JOIN owner_projects op ON op.owner_id = o.id
             WHERE op.project_id = ?1
             ORDER BY o.id ASC;"
        ))?;
        let mut rows = stmt.query([project_id])?;
        let mut owners = Vec::new();
        while let Some(row) = rows.next()? {
            owners.push(parse_owner_row(row)?);
        }
        Ok(owners)
    }
}

pub(crate) fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let duration = match row.get::<_, Option<i64>>("duration_secs")? {
        Some(secs) => Some(TimeDelta::try_seconds(secs).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid duration `{secs}` in projects.duration_secs"
            ))
        })?),
        None => None,
    };

    let project = Project {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        start_date: row.get("start_date")?,
        duration,
        project_type: row.get("project_type")?,
        summary: row.get("summary")?,
    };
    project.validate()?;
    Ok(project)
}

fn parse_site_row(row: &Row<'_>) -> RepoResult<Site> {
    let site = Site {
        id: Some(row.get("id")?),
        ghg_reduced: row.get("ghg_reduced")?,
        gge_reduced: row.get("gge_reduced")?,
        project_id: row.get("project_id")?,
    };
    site.validate()?;
    Ok(site)
}
