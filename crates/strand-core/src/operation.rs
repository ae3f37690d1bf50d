// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Operations submitted to the graph.
//!
//! Remote (canonical) operations go through [`crate::Graph::push`]; local
//! operations go through [`crate::Graph::update`]. Unloading is a lifecycle
//! call ([`crate::Graph::unload`]) rather than an operation.
use crate::ident::{FieldKey, Identifier};
use crate::payload::RelationshipPayload;

/// One mutation of relationship state.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Remote: full replace of an edge's remote state from a canonical
    /// payload; the local state follows per `reset_on_remote_update`.
    UpdateRelationship {
        /// Owning identifier.
        record: Identifier,
        /// Relationship field.
        field: FieldKey,
        /// Canonical `{data, links, meta}` payload.
        value: RelationshipPayload,
    },
    /// Local: replace a single edge's local value.
    ReplaceRelatedRecord {
        /// Owning identifier.
        record: Identifier,
        /// Relationship field.
        field: FieldKey,
        /// New value; `None` clears the relationship.
        value: Option<Identifier>,
    },
    /// Local: replace a collection edge's local members.
    ReplaceRelatedRecords {
        /// Owning identifier.
        record: Identifier,
        /// Relationship field.
        field: FieldKey,
        /// New members, in order.
        value: Vec<Identifier>,
    },
    /// Local: insert one member into a collection edge.
    AddToRelatedRecords {
        /// Owning identifier.
        record: Identifier,
        /// Relationship field.
        field: FieldKey,
        /// Member to add.
        value: Identifier,
        /// Insert position; defaults to the end.
        index: Option<usize>,
    },
    /// Local: remove one member from a collection edge.
    RemoveFromRelatedRecords {
        /// Owning identifier.
        record: Identifier,
        /// Relationship field.
        field: FieldKey,
        /// Member to remove.
        value: Identifier,
        /// Position hint of the member.
        index: Option<usize>,
    },
    /// Remote: the record was deleted; every edge referencing it is severed.
    DeleteRecord {
        /// Deleted identifier.
        record: Identifier,
    },
}

impl Operation {
    /// `updateRelationship` with a full payload.
    pub fn update_relationship(
        record: &Identifier,
        field: &str,
        value: RelationshipPayload,
    ) -> Self {
        Self::UpdateRelationship {
            record: record.clone(),
            field: field.into(),
            value,
        }
    }

    /// `replaceRelatedRecord`.
    pub fn replace_related_record(
        record: &Identifier,
        field: &str,
        value: Option<&Identifier>,
    ) -> Self {
        Self::ReplaceRelatedRecord {
            record: record.clone(),
            field: field.into(),
            value: value.cloned(),
        }
    }

    /// `replaceRelatedRecords`.
    pub fn replace_related_records(record: &Identifier, field: &str, value: &[Identifier]) -> Self {
        Self::ReplaceRelatedRecords {
            record: record.clone(),
            field: field.into(),
            value: value.to_vec(),
        }
    }

    /// `addToRelatedRecords`.
    pub fn add_to_related_records(
        record: &Identifier,
        field: &str,
        value: &Identifier,
        index: Option<usize>,
    ) -> Self {
        Self::AddToRelatedRecords {
            record: record.clone(),
            field: field.into(),
            value: value.clone(),
            index,
        }
    }

    /// `removeFromRelatedRecords`.
    pub fn remove_from_related_records(
        record: &Identifier,
        field: &str,
        value: &Identifier,
        index: Option<usize>,
    ) -> Self {
        Self::RemoveFromRelatedRecords {
            record: record.clone(),
            field: field.into(),
            value: value.clone(),
            index,
        }
    }

    /// `deleteRecord`.
    pub fn delete_record(record: &Identifier) -> Self {
        Self::DeleteRecord {
            record: record.clone(),
        }
    }

    /// Wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateRelationship { .. } => "updateRelationship",
            Self::ReplaceRelatedRecord { .. } => "replaceRelatedRecord",
            Self::ReplaceRelatedRecords { .. } => "replaceRelatedRecords",
            Self::AddToRelatedRecords { .. } => "addToRelatedRecords",
            Self::RemoveFromRelatedRecords { .. } => "removeFromRelatedRecords",
            Self::DeleteRecord { .. } => "deleteRecord",
        }
    }

    /// True for operations carrying server-confirmed state.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::UpdateRelationship { .. } | Self::DeleteRecord { .. }
        )
    }

    /// Owning identifier.
    pub fn record(&self) -> &Identifier {
        match self {
            Self::UpdateRelationship { record, .. }
            | Self::ReplaceRelatedRecord { record, .. }
            | Self::ReplaceRelatedRecords { record, .. }
            | Self::AddToRelatedRecords { record, .. }
            | Self::RemoveFromRelatedRecords { record, .. }
            | Self::DeleteRecord { record } => record,
        }
    }

    /// Relationship field, if the operation targets one.
    pub fn field(&self) -> Option<&FieldKey> {
        match self {
            Self::UpdateRelationship { field, .. }
            | Self::ReplaceRelatedRecord { field, .. }
            | Self::ReplaceRelatedRecords { field, .. }
            | Self::AddToRelatedRecords { field, .. }
            | Self::RemoveFromRelatedRecords { field, .. } => Some(field),
            Self::DeleteRecord { .. } => None,
        }
    }
}
