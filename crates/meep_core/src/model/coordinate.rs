//! Coordinate domain model.

use crate::model::entity::{validate_finite, validate_id, EntityKind, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier of a coordinate row.
pub type CoordinateId = i64;

/// Geographic point. Navigates back to the address that references it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub id: Option<CoordinateId>,
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    pub long: Option<f64>,
}

impl Coordinate {
    pub fn new(lat: f64, long: f64) -> Self {
        Self {
            id: None,
            lat: Some(lat),
            long: Some(long),
        }
    }

    pub fn with_id(id: CoordinateId, lat: f64, long: f64) -> Result<Self, ModelValidationError> {
        let coordinate = Self {
            id: Some(id),
            ..Self::new(lat, long)
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::Coordinate, self.id)?;
        validate_finite(EntityKind::Coordinate, "lat", self.lat)?;
        validate_finite(EntityKind::Coordinate, "long", self.long)
    }
}
