//! Core data model for fuel-reduction project tracking.
//! This crate owns the entity records, their relationships and storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, DatabaseConfig, LoggingConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::address::{Address, AddressId};
pub use model::area::{AreaOfEffect, AreaOfEffectId};
pub use model::coordinate::{Coordinate, CoordinateId};
pub use model::entity::{EntityKind, ModelValidationError};
pub use model::fuel_type::{FuelType, FuelTypeId};
pub use model::geometry::{Line, LineId, Radius, RadiusId};
pub use model::owner::{Owner, OwnerId};
pub use model::project::{Project, ProjectId};
pub use model::relation::{find_relation, Cardinality, RelationDecl, RelationError};
pub use model::site::{Site, SiteId};
pub use repo::area_repo::{AreaRepository, SqliteAreaRepository};
pub use repo::navigator::SqliteRelationNavigator;
pub use repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::area_service::AreaService;
pub use service::owner_service::{OwnerPortfolio, OwnerService};
pub use service::project_service::{ProjectService, ReductionTotals};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
