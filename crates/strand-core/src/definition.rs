// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resolution of declared schema into relationship definitions.
//!
//! A [`RelationshipDefinition`] is the schema of one side of an edge with its
//! inverse fully resolved. Resolution happens once per `(type, field)` and is
//! cached; definitions are immutable afterwards.
//!
//! Relationships without a declared inverse still get one: the related type
//! receives a synthesized *implicit* field (`implicit-{owner}:{field}`) so the
//! graph can find and sever every reference to an identifier when it is
//! deleted or unloaded.
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ident::{FieldKey, Identifier, TypeName};
use crate::schema::{Cardinality, InverseSpec, RelationshipSchema, SchemaSource};

/// Storage shape of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// `belongsTo`.
    Single,
    /// `hasMany`.
    Collection,
    /// Inverse-only side synthesized for an undeclared inverse.
    Implicit,
}

impl From<Cardinality> for EdgeKind {
    fn from(value: Cardinality) -> Self {
        match value {
            Cardinality::Single => Self::Single,
            Cardinality::Collection => Self::Collection,
        }
    }
}

/// Errors raised while resolving relationship definitions.
///
/// These are programmer errors: the schema or the operation is wrong, and
/// retrying cannot help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No relationship named `field` is declared on `ty`.
    #[error("no relationship `{field}` is declared on `{ty}`")]
    UnknownRelationship {
        /// Resource type.
        ty: TypeName,
        /// Requested field.
        field: FieldKey,
    },
    /// The declared inverse field does not exist on the related type.
    #[error("`{ty}.{field}` declares inverse `{inverse_type}.{inverse}`, which does not exist")]
    MissingInverse {
        /// Owning type.
        ty: TypeName,
        /// Owning field.
        field: FieldKey,
        /// Related type searched for the inverse.
        inverse_type: TypeName,
        /// Declared inverse field.
        inverse: FieldKey,
    },
    /// The inverse side does not point back at the owning field.
    #[error("`{ty}.{field}` and its inverse `{inverse_type}.{inverse}` disagree")]
    InverseMismatch {
        /// Owning type.
        ty: TypeName,
        /// Owning field.
        field: FieldKey,
        /// Related type.
        inverse_type: TypeName,
        /// Inverse field.
        inverse: FieldKey,
    },
    /// Inverse inference found more than one candidate.
    #[error("cannot infer the inverse of `{ty}.{field}`: candidates {candidates:?}")]
    AmbiguousInverse {
        /// Owning type.
        ty: TypeName,
        /// Owning field.
        field: FieldKey,
        /// Matching fields on the related type.
        candidates: Vec<FieldKey>,
    },
    /// A related identifier has a type the relationship does not accept.
    #[error("`{ty}.{field}` expects `{expected}` but received `{found}`")]
    TypeMismatch {
        /// Owning type.
        ty: TypeName,
        /// Owning field.
        field: FieldKey,
        /// Declared related type.
        expected: TypeName,
        /// Type of the offending identifier.
        found: TypeName,
    },
}

/// Resolved schema for one side of an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipDefinition {
    /// Field name (or synthesized implicit key).
    pub field: FieldKey,
    /// Storage shape.
    pub kind: EdgeKind,
    /// Type that owns this side.
    pub owner_type: TypeName,
    /// Declared type of the related resources.
    pub related_type: TypeName,
    /// Field on the related type holding the reciprocal edge.
    pub inverse_key: FieldKey,
    /// Storage shape of the reciprocal edge.
    pub inverse_kind: EdgeKind,
    /// True when the reciprocal edge was synthesized.
    pub inverse_is_implicit: bool,
    /// Whether the presentation layer loads this relationship lazily.
    pub is_async: bool,
    /// Whether related identifiers may have other types than `related_type`.
    pub is_polymorphic: bool,
    /// When `false` (on either side), local divergence survives canonical
    /// updates.
    pub reset_on_remote_update: bool,
}

impl RelationshipDefinition {
    /// True for synthesized inverse-only sides.
    pub fn is_implicit(&self) -> bool {
        self.kind == EdgeKind::Implicit
    }

    /// The declared inverse field, or `None` when the inverse is implicit.
    pub fn inverse_field(&self) -> Option<&FieldKey> {
        (!self.inverse_is_implicit).then_some(&self.inverse_key)
    }

    /// Checks that `value` may appear in this relationship.
    pub fn accepts(&self, value: &Identifier) -> Result<(), SchemaError> {
        if self.is_implicit() || self.is_polymorphic || *value.ty() == self.related_type {
            return Ok(());
        }
        Err(SchemaError::TypeMismatch {
            ty: self.owner_type.clone(),
            field: self.field.clone(),
            expected: self.related_type.clone(),
            found: value.ty().clone(),
        })
    }
}

/// Synthesized key of the implicit inverse of `owner_type.field`.
pub fn implicit_key(owner_type: &str, field: &str) -> FieldKey {
    format!("implicit-{owner_type}:{field}").into()
}

/// Cache of resolved definitions, keyed by `(type, field)`.
#[derive(Debug, Default)]
pub struct DefinitionCache {
    defs: FxHashMap<(TypeName, FieldKey), Arc<RelationshipDefinition>>,
}

impl DefinitionCache {
    /// Returns an already-resolved definition without consulting the schema.
    pub fn cached(&self, ty: &str, field: &str) -> Option<Arc<RelationshipDefinition>> {
        self.defs.get(&(ty.into(), field.into())).cloned()
    }

    /// Resolves the definition of `ty.field`, consulting `source` on a miss.
    pub fn resolve(
        &mut self,
        source: &dyn SchemaSource,
        ty: &str,
        field: &str,
    ) -> Result<Arc<RelationshipDefinition>, SchemaError> {
        if let Some(def) = self.cached(ty, field) {
            return Ok(def);
        }
        let declared =
            source
                .relationship(ty, field)
                .ok_or_else(|| SchemaError::UnknownRelationship {
                    ty: ty.into(),
                    field: field.into(),
                })?;
        let inverse = resolve_inverse(source, ty, &declared)?;
        let reset = declared.reset_on_remote_update
            && inverse.as_ref().is_none_or(|i| i.reset_on_remote_update);
        let def = match inverse {
            Some(inv) => RelationshipDefinition {
                field: declared.field.clone(),
                kind: declared.kind.into(),
                owner_type: ty.into(),
                related_type: declared.related_type.clone(),
                inverse_key: inv.field.clone(),
                inverse_kind: inv.kind.into(),
                inverse_is_implicit: false,
                is_async: declared.is_async,
                is_polymorphic: declared.is_polymorphic,
                reset_on_remote_update: reset,
            },
            None => RelationshipDefinition {
                field: declared.field.clone(),
                kind: declared.kind.into(),
                owner_type: ty.into(),
                related_type: declared.related_type.clone(),
                inverse_key: implicit_key(ty, field),
                inverse_kind: EdgeKind::Implicit,
                inverse_is_implicit: true,
                is_async: declared.is_async,
                is_polymorphic: declared.is_polymorphic,
                reset_on_remote_update: reset,
            },
        };
        let def = Arc::new(def);
        self.defs
            .insert((ty.into(), declared.field), Arc::clone(&def));
        Ok(def)
    }

    /// Resolves the reciprocal definition of `def` on `related_type`.
    ///
    /// For implicit inverses the synthesized definition is created and cached
    /// on first use. For declared inverses the related type must carry the
    /// inverse field and it must point back at `def`.
    pub fn inverse_of(
        &mut self,
        source: &dyn SchemaSource,
        def: &RelationshipDefinition,
        related_type: &str,
    ) -> Result<Arc<RelationshipDefinition>, SchemaError> {
        if def.is_implicit() {
            return self.resolve(source, related_type, &def.inverse_key);
        }
        if def.inverse_is_implicit {
            if let Some(existing) = self.cached(related_type, &def.inverse_key) {
                return Ok(existing);
            }
            let implicit = Arc::new(RelationshipDefinition {
                field: def.inverse_key.clone(),
                kind: EdgeKind::Implicit,
                owner_type: related_type.into(),
                related_type: def.owner_type.clone(),
                inverse_key: def.field.clone(),
                inverse_kind: def.kind,
                inverse_is_implicit: false,
                is_async: false,
                is_polymorphic: true,
                reset_on_remote_update: true,
            });
            self.defs.insert(
                (related_type.into(), def.inverse_key.clone()),
                Arc::clone(&implicit),
            );
            return Ok(implicit);
        }
        let inverse = match self.resolve(source, related_type, &def.inverse_key) {
            Ok(inverse) => inverse,
            Err(SchemaError::UnknownRelationship { .. }) => {
                return Err(SchemaError::MissingInverse {
                    ty: def.owner_type.clone(),
                    field: def.field.clone(),
                    inverse_type: related_type.into(),
                    inverse: def.inverse_key.clone(),
                })
            }
            Err(other) => return Err(other),
        };
        if inverse.inverse_key != def.field || inverse.inverse_is_implicit {
            return Err(SchemaError::InverseMismatch {
                ty: def.owner_type.clone(),
                field: def.field.clone(),
                inverse_type: related_type.into(),
                inverse: def.inverse_key.clone(),
            });
        }
        Ok(inverse)
    }
}

fn resolve_inverse(
    source: &dyn SchemaSource,
    ty: &str,
    declared: &RelationshipSchema,
) -> Result<Option<RelationshipSchema>, SchemaError> {
    match &declared.inverse {
        InverseSpec::None => Ok(None),
        InverseSpec::Field(name) => {
            let inverse = source
                .relationship(&declared.related_type, name)
                .ok_or_else(|| SchemaError::MissingInverse {
                    ty: ty.into(),
                    field: declared.field.clone(),
                    inverse_type: declared.related_type.clone(),
                    inverse: name.clone(),
                })?;
            let points_back = match &inverse.inverse {
                InverseSpec::Field(back) => *back == declared.field,
                InverseSpec::Auto => true,
                InverseSpec::None => false,
            };
            if !points_back {
                return Err(SchemaError::InverseMismatch {
                    ty: ty.into(),
                    field: declared.field.clone(),
                    inverse_type: declared.related_type.clone(),
                    inverse: name.clone(),
                });
            }
            Ok(Some(inverse))
        }
        InverseSpec::Auto => {
            let candidates: Vec<RelationshipSchema> = source
                .relationships(&declared.related_type)
                .into_iter()
                .filter(|r| &*r.related_type == ty)
                .filter(|r| !(*declared.related_type == *ty && r.field == declared.field))
                .filter(|r| match &r.inverse {
                    InverseSpec::Field(back) => *back == declared.field,
                    InverseSpec::Auto => true,
                    InverseSpec::None => false,
                })
                .collect();
            match candidates.len() {
                0 => Ok(None),
                1 => Ok(candidates.into_iter().next()),
                _ => Err(SchemaError::AmbiguousInverse {
                    ty: ty.into(),
                    field: declared.field.clone(),
                    candidates: candidates.into_iter().map(|r| r.field).collect(),
                }),
            }
        }
    }
}
