//! Owner use-case service.
//!
//! # Responsibility
//! - Register owners together with their addresses.
//! - Assemble an owner's portfolio (addresses + projects) for callers.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::address::Address;
use crate::model::entity::EntityKind;
use crate::model::owner::{Owner, OwnerId};
use crate::model::project::{Project, ProjectId};
use crate::repo::owner_repo::OwnerRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Owner read model with both of its collections resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerPortfolio {
    pub owner: Owner,
    /// Sorted by address id.
    pub addresses: Vec<Address>,
    /// Sorted by project id.
    pub projects: Vec<Project>,
}

/// Use-case service wrapper for owner operations.
pub struct OwnerService<R: OwnerRepository> {
    repo: R,
}

impl<R: OwnerRepository> OwnerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one owner and appends every given address to it.
    ///
    /// Any `owner_id` already set on the addresses is overridden. When any
    /// insert fails, neither the owner nor its addresses are stored.
    pub fn register_owner(
        &self,
        owner: &Owner,
        addresses: &[Address],
    ) -> RepoResult<OwnerPortfolio> {
        let owner_id = self.repo.create_owner_with_addresses(owner, addresses)?;
        info!(
            "event=owner_register module=service status=ok owner_id={owner_id} address_count={}",
            addresses.len()
        );
        self.portfolio(owner_id)
    }

    /// Loads one owner with its addresses and projects.
    pub fn portfolio(&self, owner_id: OwnerId) -> RepoResult<OwnerPortfolio> {
        let owner = self.repo.get_owner(owner_id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Owner,
            id: owner_id,
        })?;
        Ok(OwnerPortfolio {
            owner,
            addresses: self.repo.list_addresses_for_owner(owner_id)?,
            projects: self.repo.list_projects_for_owner(owner_id)?,
        })
    }

    /// Adds the owner to a project's owners; repeating is a no-op.
    pub fn join_project(&self, owner_id: OwnerId, project_id: ProjectId) -> RepoResult<()> {
        self.repo.link_project(owner_id, project_id)
    }

    /// Removes the owner from a project's owners.
    pub fn leave_project(&self, owner_id: OwnerId, project_id: ProjectId) -> RepoResult<bool> {
        self.repo.unlink_project(owner_id, project_id)
    }
}
