//! Entity kinds and shared record validation.
//!
//! # Responsibility
//! - Name every persisted entity and map it to its storage table.
//! - Define validation errors shared by all entity records.
//!
//! # Invariants
//! - Persisted ids are strictly positive.
//! - Persisted floating point values are finite (SQLite stores NaN as NULL).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Every entity tracked by the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Owner,
    Address,
    Project,
    Site,
    AreaOfEffect,
    Radius,
    Line,
    Coordinate,
    FuelType,
}

impl EntityKind {
    /// Storage table backing this entity.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Owner => "owners",
            Self::Address => "addresses",
            Self::Project => "projects",
            Self::Site => "sites",
            Self::AreaOfEffect => "areas_of_effect",
            Self::Radius => "radii",
            Self::Line => "lines",
            Self::Coordinate => "coordinates",
            Self::FuelType => "fuel_types",
        }
    }

    /// Stable snake_case name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Address => "address",
            Self::Project => "project",
            Self::Site => "site",
            Self::AreaOfEffect => "area_of_effect",
            Self::Radius => "radius",
            Self::Line => "line",
            Self::Coordinate => "coordinate",
            Self::FuelType => "fuel_type",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    /// Ids are assigned by SQLite rowid semantics and must be > 0.
    NonPositiveId { entity: EntityKind, id: i64 },
    /// NaN and infinities cannot round-trip through storage.
    NonFiniteNumber {
        entity: EntityKind,
        field: &'static str,
        value: f64,
    },
    /// Text input that must carry content was blank.
    EmptyText {
        entity: EntityKind,
        field: &'static str,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId { entity, id } => {
                write!(f, "{entity} id must be positive, got {id}")
            }
            Self::NonFiniteNumber {
                entity,
                field,
                value,
            } => write!(f, "{entity}.{field} must be finite, got {value}"),
            Self::EmptyText { entity, field } => write!(f, "{entity}.{field} cannot be empty"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn validate_id(
    entity: EntityKind,
    id: Option<i64>,
) -> Result<(), ModelValidationError> {
    match id {
        Some(value) if value <= 0 => Err(ModelValidationError::NonPositiveId { entity, id: value }),
        _ => Ok(()),
    }
}

pub(crate) fn validate_finite(
    entity: EntityKind,
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ModelValidationError> {
    match value {
        Some(number) if !number.is_finite() => Err(ModelValidationError::NonFiniteNumber {
            entity,
            field,
            value: number,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_finite, validate_id, EntityKind, ModelValidationError};

    #[test]
    fn validate_id_accepts_unset_and_positive() {
        assert!(validate_id(EntityKind::Owner, None).is_ok());
        assert!(validate_id(EntityKind::Owner, Some(1)).is_ok());
        assert_eq!(
            validate_id(EntityKind::Site, Some(0)),
            Err(ModelValidationError::NonPositiveId {
                entity: EntityKind::Site,
                id: 0
            })
        );
    }

    #[test]
    fn validate_finite_rejects_nan() {
        let err = validate_finite(EntityKind::Radius, "radius", Some(f64::NAN)).unwrap_err();
        assert!(err.to_string().contains("radius.radius must be finite"));
    }

    #[test]
    fn every_kind_maps_to_distinct_table() {
        let kinds = [
            EntityKind::Owner,
            EntityKind::Address,
            EntityKind::Project,
            EntityKind::Site,
            EntityKind::AreaOfEffect,
            EntityKind::Radius,
            EntityKind::Line,
            EntityKind::Coordinate,
            EntityKind::FuelType,
        ];
        let tables: std::collections::HashSet<_> =
            kinds.iter().map(|kind| kind.table_name()).collect();
        assert_eq!(tables.len(), kinds.len());
    }
}
