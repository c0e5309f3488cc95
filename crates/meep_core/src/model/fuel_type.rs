//! Fuel type domain model.
//!
//! One fuel type row is shared by every area of effect that burns it, so
//! areas compare fuel identity by `fuel_type_id`.

use crate::model::entity::{validate_id, EntityKind, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier of a fuel type row.
pub type FuelTypeId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelType {
    pub id: Option<FuelTypeId>,
    /// Fuel name as entered; unique by `lookup_key` in storage.
    pub fuel: Option<String>,
}

impl FuelType {
    pub fn new(fuel: impl Into<String>) -> Self {
        Self {
            id: None,
            fuel: Some(fuel.into()),
        }
    }

    /// Key two fuel names share when they name the same fuel.
    ///
    /// Trims whitespace and applies Unicode lowercasing, so "Éthanol" and
    /// " éthanol" collide.
    pub fn lookup_key(fuel: &str) -> String {
        fuel.trim().to_lowercase()
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::FuelType, self.id)
    }
}
