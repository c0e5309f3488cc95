//! Address domain model.
//!
//! # Invariants
//! - `owner_id` is the many-to-one side of `Owner.addresses`.
//! - `coordinate_id` is one-to-one: a coordinate locates at most one address.
//! - The address does not navigate to the area of effect or line that
//!   reference it; those links are declared from the other side only.

use crate::model::coordinate::CoordinateId;
use crate::model::entity::{validate_id, EntityKind, ModelValidationError};
use crate::model::owner::OwnerId;
use serde::{Deserialize, Serialize};

/// Stable identifier of an address row.
pub type AddressId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// `None` until persisted.
    pub id: Option<AddressId>,
    /// Street line.
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<u32>,
    pub owner_id: Option<OwnerId>,
    pub coordinate_id: Option<CoordinateId>,
}

impl Address {
    /// Creates an unsaved, unowned address.
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: u32,
    ) -> Self {
        Self {
            id: None,
            address: Some(address.into()),
            city: Some(city.into()),
            state: Some(state.into()),
            zip: Some(zip),
            owner_id: None,
            coordinate_id: None,
        }
    }

    /// Sets the owning side of `Owner.addresses`.
    pub fn owned_by(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the one-to-one coordinate link.
    pub fn located_at(mut self, coordinate_id: CoordinateId) -> Self {
        self.coordinate_id = Some(coordinate_id);
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id(EntityKind::Address, self.id)?;
        validate_id(EntityKind::Owner, self.owner_id)?;
        validate_id(EntityKind::Coordinate, self.coordinate_id)
    }
}
