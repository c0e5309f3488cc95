//! Site domain model.

use crate::model::entity::{validate_finite, validate_id, EntityKind, ModelValidationError};
use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};

/// Stable identifier of a site row.
pub type SiteId = i64;

/// Physical location within a project with measured savings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: Option<SiteId>,
    /// Greenhouse gas reduced.
    #[serde(rename = "GHG_reduced")]
    pub ghg_reduced: Option<f64>,
    /// Gasoline gallon equivalents reduced.
    #[serde(rename = "GGE_reduced")]
    pub gge_reduced: Option<f64>,
    /// Many-to-one side of `Project.sites`.
    pub project_id: Option<ProjectId>,
}

impl Site {
    pub fn new(ghg_reduced: f64, gge_reduced: f64) -> Self {
        Self {
            id: None,
            ghg_reduced: Some(ghg_reduced),
            gge_reduced: Some(gge_reduced),
            project_id: None,
        }
    }

    pub fn in_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::Site, self.id)?;
        validate_id(EntityKind::Project, self.project_id)?;
        validate_finite(EntityKind::Site, "ghg_reduced", self.ghg_reduced)?;
        validate_finite(EntityKind::Site, "gge_reduced", self.gge_reduced)
    }
}
