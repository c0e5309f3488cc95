//! Owner domain model.
//!
//! An owner is a person or organization tied to addresses (one-to-many)
//! and projects (many-to-many). Links live in storage, not on the record.

use crate::model::entity::{validate_id, EntityKind, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier of an owner row.
pub type OwnerId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// `None` until persisted.
    pub id: Option<OwnerId>,
    pub name: Option<String>,
    pub summary: Option<String>,
}

impl Owner {
    /// Creates an unsaved owner.
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            summary: Some(summary.into()),
        }
    }

    /// Creates an owner with a caller-provided id.
    ///
    /// # Errors
    /// - Returns `NonPositiveId` when `id <= 0`.
    pub fn with_id(
        id: OwnerId,
        name: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        let owner = Self {
            id: Some(id),
            ..Self::new(name, summary)
        };
        owner.validate()?;
        Ok(owner)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::Owner, self.id)
    }
}
