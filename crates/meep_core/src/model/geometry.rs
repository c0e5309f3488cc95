//! Shape records that specify an area of effect: radius and line.
//!
//! # Invariants
//! - A radius belongs to at most one area and navigates back to it.
//! - A line belongs to at most one area but has no reverse navigation.

use crate::model::address::AddressId;
use crate::model::entity::{validate_finite, validate_id, EntityKind, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier of a radius row.
pub type RadiusId = i64;
/// Stable identifier of a line row.
pub type LineId = i64;

/// Circular zone around a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Radius {
    pub id: Option<RadiusId>,
    pub radius: Option<f64>,
}

impl Radius {
    pub fn new(radius: f64) -> Self {
        Self {
            id: None,
            radius: Some(radius),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::Radius, self.id)?;
        validate_finite(EntityKind::Radius, "radius", self.radius)
    }
}

/// Linear zone ending at an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: Option<LineId>,
    pub end_location_id: Option<AddressId>,
}

impl Line {
    pub fn ending_at(end_location_id: AddressId) -> Self {
        Self {
            id: None,
            end_location_id: Some(end_location_id),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::Line, self.id)?;
        validate_id(EntityKind::Address, self.end_location_id)
    }
}
