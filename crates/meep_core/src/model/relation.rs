//! Declarative relation catalog.
//!
//! # Responsibility
//! - Declare every navigable relationship between entities in one table.
//! - Reject navigation names that were never declared.
//!
//! # Invariants
//! - A relation is navigable only from the side it is declared on. Line,
//!   AreaOfEffect.address and AreaOfEffect.line links are one-directional.
//! - Each `query` takes the source id as `?1` and yields non-null target
//!   ids ordered ascending.

use crate::model::entity::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shape of a declared relation, seen from its source side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// Whether navigation yields at most one target.
    pub fn is_single(self) -> bool {
        matches!(self, Self::OneToOne | Self::ManyToOne)
    }
}

/// One navigable relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDecl {
    pub source: EntityKind,
    pub name: &'static str,
    pub target: EntityKind,
    pub cardinality: Cardinality,
    pub query: &'static str,
}

/// Relation lookup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// `source` has no relation called `name`.
    Undeclared {
        source: EntityKind,
        name: String,
    },
    /// A single-valued accessor was used on a collection relation.
    NotSingleValued {
        source: EntityKind,
        name: &'static str,
    },
}

impl Display for RelationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undeclared { source, name } => {
                write!(f, "{source} has no relation `{name}`")
            }
            Self::NotSingleValued { source, name } => {
                write!(f, "{source}.{name} is a collection relation")
            }
        }
    }
}

impl Error for RelationError {}

const RELATIONS: &[RelationDecl] = &[
    RelationDecl {
        source: EntityKind::Owner,
        name: "addresses",
        target: EntityKind::Address,
        cardinality: Cardinality::OneToMany,
        query: "SELECT id FROM addresses WHERE owner_id = ?1 ORDER BY id ASC;",
    },
    RelationDecl {
        source: EntityKind::Owner,
        name: "projects",
        target: EntityKind::Project,
        cardinality: Cardinality::ManyToMany,
        query: "SELECT project_id FROM owner_projects WHERE owner_id = ?1 ORDER BY project_id ASC;",
    },
    RelationDecl {
        source: EntityKind::Address,
        name: "owner",
        target: EntityKind::Owner,
        cardinality: Cardinality::ManyToOne,
        query: "SELECT owner_id FROM addresses WHERE id = ?1 AND owner_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::Address,
        name: "coordinate",
        target: EntityKind::Coordinate,
        cardinality: Cardinality::OneToOne,
        query: "SELECT coordinate_id FROM addresses WHERE id = ?1 AND coordinate_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::Project,
        name: "owners",
        target: EntityKind::Owner,
        cardinality: Cardinality::ManyToMany,
        query: "SELECT owner_id FROM owner_projects WHERE project_id = ?1 ORDER BY owner_id ASC;",
    },
    RelationDecl {
        source: EntityKind::Project,
        name: "sites",
        target: EntityKind::Site,
        cardinality: Cardinality::OneToMany,
        query: "SELECT id FROM sites WHERE project_id = ?1 ORDER BY id ASC;",
    },
    RelationDecl {
        source: EntityKind::Site,
        name: "project",
        target: EntityKind::Project,
        cardinality: Cardinality::ManyToOne,
        query: "SELECT project_id FROM sites WHERE id = ?1 AND project_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::Site,
        name: "areas_of_effect",
        target: EntityKind::AreaOfEffect,
        cardinality: Cardinality::OneToMany,
        query: "SELECT id FROM areas_of_effect WHERE site_id = ?1 ORDER BY id ASC;",
    },
    RelationDecl {
        source: EntityKind::AreaOfEffect,
        name: "site",
        target: EntityKind::Site,
        cardinality: Cardinality::ManyToOne,
        query: "SELECT site_id FROM areas_of_effect WHERE id = ?1 AND site_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::AreaOfEffect,
        name: "radius",
        target: EntityKind::Radius,
        cardinality: Cardinality::OneToOne,
        query: "SELECT radius_id FROM areas_of_effect WHERE id = ?1 AND radius_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::AreaOfEffect,
        name: "line",
        target: EntityKind::Line,
        cardinality: Cardinality::OneToOne,
        query: "SELECT line_id FROM areas_of_effect WHERE id = ?1 AND line_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::AreaOfEffect,
        name: "fuel_type",
        target: EntityKind::FuelType,
        cardinality: Cardinality::ManyToOne,
        query: "SELECT fuel_type_id FROM areas_of_effect WHERE id = ?1 AND fuel_type_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::AreaOfEffect,
        name: "address",
        target: EntityKind::Address,
        cardinality: Cardinality::OneToOne,
        query: "SELECT address_id FROM areas_of_effect WHERE id = ?1 AND address_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::Radius,
        name: "area_of_effect",
        target: EntityKind::AreaOfEffect,
        cardinality: Cardinality::OneToOne,
        query: "SELECT id FROM areas_of_effect WHERE radius_id = ?1;",
    },
    RelationDecl {
        source: EntityKind::Line,
        name: "end_location",
        target: EntityKind::Address,
        cardinality: Cardinality::ManyToOne,
        query: "SELECT end_location_id FROM lines WHERE id = ?1 AND end_location_id IS NOT NULL;",
    },
    RelationDecl {
        source: EntityKind::Coordinate,
        name: "address",
        target: EntityKind::Address,
        cardinality: Cardinality::OneToOne,
        query: "SELECT id FROM addresses WHERE coordinate_id = ?1;",
    },
    RelationDecl {
        source: EntityKind::FuelType,
        name: "areas_of_effect",
        target: EntityKind::AreaOfEffect,
        cardinality: Cardinality::OneToMany,
        query: "SELECT id FROM areas_of_effect WHERE fuel_type_id = ?1 ORDER BY id ASC;",
    },
];

/// Returns every declared relation.
pub fn relations() -> &'static [RelationDecl] {
    RELATIONS
}

/// Returns relations navigable from `source`.
pub fn relations_from(source: EntityKind) -> impl Iterator<Item = &'static RelationDecl> {
    RELATIONS.iter().filter(move |decl| decl.source == source)
}

/// Looks up one declared relation by source entity and name.
///
/// # Errors
/// - Returns `RelationError::Undeclared` when no such navigation exists.
pub fn find_relation(source: EntityKind, name: &str) -> Result<&'static RelationDecl, RelationError> {
    RELATIONS
        .iter()
        .find(|decl| decl.source == source && decl.name == name)
        .ok_or_else(|| RelationError::Undeclared {
            source,
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{find_relation, relations, relations_from, Cardinality, RelationError};
    use crate::model::entity::EntityKind;
    use std::collections::HashSet;

    #[test]
    fn relation_names_are_unique_per_source() {
        let mut seen = HashSet::new();
        for decl in relations() {
            assert!(
                seen.insert((decl.source, decl.name)),
                "duplicate relation {}.{}",
                decl.source,
                decl.name
            );
        }
    }

    #[test]
    fn one_directional_links_are_not_navigable_in_reverse() {
        for (source, name) in [
            (EntityKind::Line, "area_of_effect"),
            (EntityKind::Address, "line"),
            (EntityKind::Address, "area_of_effect"),
        ] {
            let err = find_relation(source, name).unwrap_err();
            assert_eq!(
                err,
                RelationError::Undeclared {
                    source,
                    name: name.to_string()
                }
            );
        }
    }

    #[test]
    fn bidirectional_pairs_are_declared_on_both_sides() {
        let radius = find_relation(EntityKind::AreaOfEffect, "radius").unwrap();
        let back = find_relation(EntityKind::Radius, "area_of_effect").unwrap();
        assert_eq!(radius.target, back.source);
        assert_eq!(back.target, radius.source);

        let owners = find_relation(EntityKind::Project, "owners").unwrap();
        let projects = find_relation(EntityKind::Owner, "projects").unwrap();
        assert_eq!(owners.cardinality, Cardinality::ManyToMany);
        assert_eq!(projects.cardinality, Cardinality::ManyToMany);
    }

    #[test]
    fn every_query_binds_source_id() {
        for decl in relations() {
            assert!(decl.query.contains("?1"), "{}.{}", decl.source, decl.name);
        }
    }

    #[test]
    fn relations_from_filters_by_source() {
        let names: Vec<_> = relations_from(EntityKind::AreaOfEffect)
            .map(|decl| decl.name)
            .collect();
        assert_eq!(names, vec!["site", "radius", "line", "fuel_type", "address"]);
    }
}
