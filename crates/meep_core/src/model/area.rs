//! Area of effect domain model.
//!
//! # Responsibility
//! - Hold the foreign keys that specify a zone: radius, line, fuel type
//!   and address, plus the owning site.
//!
//! # Invariants
//! - `radius_id`, `line_id` and `address_id` are one-to-one and unique
//!   across all areas in storage.
//! - `fuel_type_id` is shared: many areas may point at one fuel type.

use crate::model::address::AddressId;
use crate::model::entity::{validate_id, EntityKind, ModelValidationError};
use crate::model::fuel_type::FuelTypeId;
use crate::model::geometry::{LineId, RadiusId};
use crate::model::site::SiteId;
use serde::{Deserialize, Serialize};

/// Stable identifier of an area of effect row.
pub type AreaOfEffectId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaOfEffect {
    pub id: Option<AreaOfEffectId>,
    pub site_id: Option<SiteId>,
    pub radius_id: Option<RadiusId>,
    pub line_id: Option<LineId>,
    pub fuel_type_id: Option<FuelTypeId>,
    pub address_id: Option<AddressId>,
}

impl AreaOfEffect {
    pub fn with_id(id: AreaOfEffectId) -> Result<Self, ModelValidationError> {
        let area = Self {
            id: Some(id),
            ..Self::default()
        };
        area.validate()?;
        Ok(area)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::AreaOfEffect, self.id)?;
        validate_id(EntityKind::Site, self.site_id)?;
        validate_id(EntityKind::Radius, self.radius_id)?;
        validate_id(EntityKind::Line, self.line_id)?;
        validate_id(EntityKind::FuelType, self.fuel_type_id)?;
        validate_id(EntityKind::Address, self.address_id)
    }
}
