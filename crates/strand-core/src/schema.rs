// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Declared relationship schema and the lookup port the graph consumes.
//!
//! The schema describes what a resource type *declares*. The graph never
//! works with these values directly; the definition cache resolves them into
//! [`crate::RelationshipDefinition`]s, filling in inverses and implicit sides.
use std::collections::BTreeMap;

use crate::ident::{FieldKey, TypeName};

/// Cardinality of a declared relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cardinality {
    /// `belongsTo`: at most one related identifier.
    Single,
    /// `hasMany`: ordered, duplicate-free sequence of related identifiers.
    Collection,
}

/// How the inverse of a declared relationship is determined.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum InverseSpec {
    /// Infer the inverse from the related type's declarations.
    #[default]
    Auto,
    /// Explicitly no inverse; the graph tracks an implicit side for cleanup.
    None,
    /// Named inverse field on the related type.
    Field(FieldKey),
}

/// One relationship field as declared on a resource type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipSchema {
    /// Field name on the owning type.
    pub field: FieldKey,
    /// Single or collection.
    pub kind: Cardinality,
    /// Declared type of the related resources.
    pub related_type: TypeName,
    /// Inverse resolution strategy.
    pub inverse: InverseSpec,
    /// Whether the presentation layer loads this relationship lazily.
    pub is_async: bool,
    /// Whether values of types other than `related_type` are accepted.
    pub is_polymorphic: bool,
    /// When `false`, local divergence survives canonical updates.
    pub reset_on_remote_update: bool,
}

impl RelationshipSchema {
    fn declared(field: &str, kind: Cardinality, related_type: &str) -> Self {
        Self {
            field: field.into(),
            kind,
            related_type: related_type.into(),
            inverse: InverseSpec::Auto,
            is_async: false,
            is_polymorphic: false,
            reset_on_remote_update: true,
        }
    }

    /// Declares a single (`belongsTo`) relationship.
    pub fn belongs_to(field: &str, related_type: &str) -> Self {
        Self::declared(field, Cardinality::Single, related_type)
    }

    /// Declares a collection (`hasMany`) relationship.
    pub fn has_many(field: &str, related_type: &str) -> Self {
        Self::declared(field, Cardinality::Collection, related_type)
    }

    /// Names the inverse field on the related type.
    pub fn inverse(mut self, field: &str) -> Self {
        self.inverse = InverseSpec::Field(field.into());
        self
    }

    /// Declares that the relationship has no inverse.
    pub fn no_inverse(mut self) -> Self {
        self.inverse = InverseSpec::None;
        self
    }

    /// Marks the relationship as loaded lazily by the presentation layer.
    pub fn is_async(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Accepts related identifiers of any type carrying the inverse field.
    pub fn polymorphic(mut self) -> Self {
        self.is_polymorphic = true;
        self
    }

    /// Keeps local additions and removals across canonical updates.
    pub fn preserve_local_on_remote_update(mut self) -> Self {
        self.reset_on_remote_update = false;
        self
    }
}

/// Port through which the graph resolves declared relationships.
///
/// Implemented by the identity/schema layer of the store. Lookups must be
/// stable for the lifetime of the graph.
pub trait SchemaSource {
    /// Declared relationship `field` on `ty`, if any.
    fn relationship(&self, ty: &str, field: &str) -> Option<RelationshipSchema>;

    /// Every relationship declared on `ty`, in declaration order.
    fn relationships(&self, ty: &str) -> Vec<RelationshipSchema>;
}

/// In-memory [`SchemaSource`].
#[derive(Clone, Debug, Default)]
pub struct Schema {
    types: BTreeMap<TypeName, Vec<RelationshipSchema>>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `relationship` on `ty`, replacing an earlier declaration of the
    /// same field.
    pub fn declare(&mut self, ty: &str, relationship: RelationshipSchema) {
        let fields = self.types.entry(ty.into()).or_default();
        if let Some(existing) = fields.iter_mut().find(|r| r.field == relationship.field) {
            *existing = relationship;
        } else {
            fields.push(relationship);
        }
    }

    /// Builder form of [`Schema::declare`].
    pub fn with(mut self, ty: &str, relationship: RelationshipSchema) -> Self {
        self.declare(ty, relationship);
        self
    }

    /// Registers a type with no relationships so that it is known to the schema.
    pub fn with_type(mut self, ty: &str) -> Self {
        self.types.entry(ty.into()).or_default();
        self
    }
}

impl SchemaSource for Schema {
    fn relationship(&self, ty: &str, field: &str) -> Option<RelationshipSchema> {
        self.types
            .get(ty)
            .and_then(|fields| fields.iter().find(|r| &*r.field == field))
            .cloned()
    }

    fn relationships(&self, ty: &str) -> Vec<RelationshipSchema> {
        self.types.get(ty).cloned().unwrap_or_default()
    }
}
