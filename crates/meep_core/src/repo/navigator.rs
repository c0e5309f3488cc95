//! Catalog-driven relation navigation.
//!
//! # Responsibility
//! - Resolve `source.relation` to target ids using the declared catalog.
//! - Fail for navigations the catalog does not declare.
//!
//! # Invariants
//! - The source row must exist; a missing source is `NotFound`, never an
//!   empty result.
//! - Collection results are ordered by target id ascending.

use crate::model::entity::EntityKind;
use crate::model::relation::{find_relation, RelationDecl, RelationError};
use crate::repo::{ensure_connection_ready, query_ids, require_entity, RepoResult};
use log::debug;
use rusqlite::Connection;

/// SQLite-backed navigator over the relation catalog.
pub struct SqliteRelationNavigator<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationNavigator<'conn> {
    /// Constructs a navigator from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[])?;
        Ok(Self { conn })
    }

    /// Returns the ids reached by following `relation` from one source row.
    ///
    /// # Errors
    /// - `RepoError::Relation(Undeclared)` when `relation` is not declared
    ///   on `source`.
    /// - `RepoError::NotFound` when the source row does not exist.
    pub fn related_ids(
        &self,
        source: EntityKind,
        source_id: i64,
        relation: &str,
    ) -> RepoResult<Vec<i64>> {
        let decl = find_relation(source, relation)?;
        self.resolve(decl, source_id)
    }

    /// Returns the single id reached through a to-one relation.
    ///
    /// # Errors
    /// - Same as [`Self::related_ids`].
    /// - `RepoError::Relation(NotSingleValued)` for collection relations.
    pub fn related_id(
        &self,
        source: EntityKind,
        source_id: i64,
        relation: &str,
    ) -> RepoResult<Option<i64>> {
        let decl = find_relation(source, relation)?;
        if !decl.cardinality.is_single() {
            return Err(RelationError::NotSingleValued {
                source,
                name: decl.name,
            }
            .into());
        }
        Ok(self.resolve(decl, source_id)?.into_iter().next())
    }

    fn resolve(&self, decl: &RelationDecl, source_id: i64) -> RepoResult<Vec<i64>> {
        require_entity(self.conn, decl.source, source_id)?;
        let mut stmt = self.conn.prepare_cached(decl.query)?;
        let ids = query_ids(&mut stmt, source_id)?;
        debug!(
            "event=relation_navigate module=repo status=ok source={} relation={} target={} count={}",
            decl.source,
            decl.name,
            decl.target,
            ids.len()
        );
        Ok(ids)
    }
}
