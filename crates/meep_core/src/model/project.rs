//! Project domain model.
//!
//! # Responsibility
//! - Define the project record shared by owners (many-to-many) and sites
//!   (one-to-many).
//! - Derive the scheduled end date from start date and duration.
//!
//! # Invariants
//! - `duration` is persisted as whole seconds; sub-second precision is
//!   dropped on write.

use crate::model::entity::{validate_id, EntityKind, ModelValidationError};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Stable identifier of a project row.
pub type ProjectId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// `None` until persisted.
    pub id: Option<ProjectId>,
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Planned length of the project.
    #[serde(rename = "duration_secs", with = "duration_secs", default)]
    pub duration: Option<TimeDelta>,
    /// Free-form classification, e.g. `thinning` or `prescribed_burn`.
    pub project_type: Option<String>,
    pub summary: Option<String>,
}

impl Project {
    /// Creates an unsaved project with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::Project, self.id)
    }

    /// Returns `start_date + duration` when both are known.
    ///
    /// Returns `None` when either side is unset or the sum leaves the
    /// supported calendar range.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let start = self.start_date?;
        let duration = self.duration?;
        start.checked_add_signed(duration)
    }
}

mod duration_secs {
    use chrono::TimeDelta;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<TimeDelta>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_some(&duration.num_seconds()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<TimeDelta>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<i64>::deserialize(deserializer)? {
            Some(secs) => TimeDelta::try_seconds(secs)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("duration_secs out of range: {secs}"))),
            None => Ok(None),
        }
    }
}
