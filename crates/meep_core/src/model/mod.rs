//! Domain model for fuel-reduction project tracking.
//!
//! # Responsibility
//! - Define the entity records persisted by core.
//! - Declare which relationships are navigable and from which side.
//!
//! # Invariants
//! - Records carry foreign key ids, never embedded object graphs.
//! - An `id` of `None` means the record has not been persisted yet.

pub mod address;
pub mod area;
pub mod coordinate;
pub mod entity;
pub mod fuel_type;
pub mod geometry;
pub mod owner;
pub mod project;
pub mod relation;
pub mod site;
