//! Area-of-effect use-case service.
//!
//! # Responsibility
//! - Resolve fuel names to one shared fuel type row.
//! - Define radius- and line-shaped areas in a single call.
//!
//! # Invariants
//! - Fuel names are trimmed and compared after Unicode lowercasing, so
//!   "Diesel"/"diesel" and "Éthanol"/"éthanol" each resolve to one row.
//! - Fuel names resolve before any shape row is written; the shape and its
//!   area are then created in one transaction.

use crate::model::address::AddressId;
use crate::model::area::AreaOfEffect;
use crate::model::entity::{EntityKind, ModelValidationError};
use crate::model::fuel_type::FuelType;
use crate::model::geometry::{Line, Radius};
use crate::model::site::SiteId;
use crate::repo::area_repo::AreaRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Use-case service wrapper for area operations.
pub struct AreaService<R: AreaRepository> {
    repo: R,
}

impl<R: AreaRepository> AreaService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the fuel type named `fuel`, creating it on first use.
    ///
    /// # Errors
    /// - `Validation(EmptyText)` when `fuel` is blank.
    pub fn fuel_type_named(&self, fuel: &str) -> RepoResult<FuelType> {
        let name = fuel.trim();
        if name.is_empty() {
            return Err(ModelValidationError::EmptyText {
                entity: EntityKind::FuelType,
                field: "fuel",
            }
            .into());
        }

        if let Some(existing) = self.repo.find_fuel_type_by_name(name)? {
            return Ok(existing);
        }

        let fuel_type_id = self.repo.create_fuel_type(&FuelType::new(name))?;
        info!("event=fuel_type_create module=service status=ok fuel_type_id={fuel_type_id}");
        self.reload_fuel_type(fuel_type_id)
    }

    /// Creates a radius and an area using it, optionally inside a site and
    /// burning a named fuel.
    ///
    /// A fuel type created for `fuel` stays even if the area insert fails;
    /// it is a shared lookup row, not part of the area.
    pub fn define_radius_area(
        &self,
        site_id: Option<SiteId>,
        radius: f64,
        fuel: Option<&str>,
    ) -> RepoResult<AreaOfEffect> {
        let fuel_type_id = match fuel {
            Some(name) => self.fuel_type_named(name)?.id,
            None => None,
        };
        let area = AreaOfEffect {
            site_id,
            fuel_type_id,
            ..AreaOfEffect::default()
        };
        let area_id = self
            .repo
            .create_area_with_radius(&area, &Radius::new(radius))?;
        self.reload_area(area_id)
    }

    /// Creates a line (optionally ending at an address) and an area using it.
    pub fn define_line_area(
        &self,
        site_id: Option<SiteId>,
        end_location: Option<AddressId>,
    ) -> RepoResult<AreaOfEffect> {
        let line = Line {
            id: None,
            end_location_id: end_location,
        };
        let area = AreaOfEffect {
            site_id,
            ..AreaOfEffect::default()
        };
        let area_id = self.repo.create_area_with_line(&area, &line)?;
        self.reload_area(area_id)
    }

    /// Lists every area sharing the named fuel; unknown fuels yield nothing.
    pub fn areas_for_fuel(&self, fuel: &str) -> RepoResult<Vec<AreaOfEffect>> {
        match self.repo.find_fuel_type_by_name(fuel.trim())? {
            Some(FuelType {
                id: Some(fuel_type_id),
                ..
            }) => self.repo.list_areas_for_fuel_type(fuel_type_id),
            _ => Ok(Vec::new()),
        }
    }

    fn reload_area(&self, area_id: i64) -> RepoResult<AreaOfEffect> {
        self.repo.get_area(area_id)?.ok_or_else(|| RepoError::InvalidData(format!(
            "created area {area_id} not found in read-back"
        )))
    }

    fn reload_fuel_type(&self, fuel_type_id: i64) -> RepoResult<FuelType> {
        self.repo
            .get_fuel_type(fuel_type_id)?
            .ok_or_else(|| RepoError::InvalidData(format!(
                "created fuel type {fuel_type_id} not found in read-back"
            )))
    }
}
