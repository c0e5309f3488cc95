//! Project use-case service.
//!
//! # Responsibility
//! - Create projects and their sites with read-back.
//! - Aggregate site savings metrics per project.
//!
//! # Invariants
//! - Missing site metrics count as zero in totals.

use crate::model::entity::EntityKind;
use crate::model::project::{Project, ProjectId};
use crate::model::site::Site;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Summed savings across all sites of one project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionTotals {
    pub site_count: usize,
    pub ghg_reduced: f64,
    pub gge_reduced: f64,
}

/// Use-case service wrapper for project operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a project and returns the stored record.
    pub fn create_project(&self, project: &Project) -> RepoResult<Project> {
        let project_id = self.repo.create_project(project)?;
        info!("event=project_create module=service status=ok project_id={project_id}");
        self.require_project(project_id)
    }

    /// Creates one site inside an existing project.
    pub fn add_site(
        &self,
        project_id: ProjectId,
        ghg_reduced: f64,
        gge_reduced: f64,
    ) -> RepoResult<Site> {
        self.require_project(project_id)?;
        let site = Site::new(ghg_reduced, gge_reduced).in_project(project_id);
        let site_id = self.repo.create_site(&site)?;
        self.repo.get_site(site_id)?.ok_or_else(|| RepoError::InvalidData(format!(
            "created site {site_id} not found in read-back"
        )))
    }

    /// Sums GHG/GGE savings of every site in the project.
    pub fn reduction_totals(&self, project_id: ProjectId) -> RepoResult<ReductionTotals> {
        let sites = self.repo.list_sites_for_project(project_id)?;
        Ok(ReductionTotals {
            site_count: sites.len(),
            ghg_reduced: sites.iter().filter_map(|site| site.ghg_reduced).sum(),
            gge_reduced: sites.iter().filter_map(|site| site.gge_reduced).sum(),
        })
    }

    fn require_project(&self, project_id: ProjectId) -> RepoResult<Project> {
        self.repo.get_project(project_id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Project,
            id: project_id,
        })
    }
}
