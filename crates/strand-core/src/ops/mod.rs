// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Operation processor.
//!
//! Each operation runs in two phases. Validation resolves every definition
//! the operation will touch (including inverse definitions of every incoming
//! identifier), checks cardinality and applies the duplicate policy. Only
//! then is state mutated, so a rejected operation leaves no trace.
//!
//! Mutation edits the target edge and then mirrors each membership change
//! onto the reciprocal edges, remote deltas in the remote view and local
//! deltas in the local view. Mirroring never recurses past one displaced
//! value, which keeps cascades bounded.
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use crate::config::DuplicatePolicy;
use crate::definition::{EdgeKind, RelationshipDefinition};
use crate::graph::{Graph, GraphError};
use crate::ident::{Identifier, TypeName};
use crate::operation::Operation;
use crate::ordered_set::OrderedSet;
use crate::unload;

mod add_to_related_records;
mod inverse;
mod remove_from_related_records;
mod replace_related_record;
mod replace_related_records;
mod update_relationship;

/// Which view of an edge a change applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum View {
    /// Server-confirmed state.
    Remote,
    /// Observed state.
    Local,
}

pub(crate) fn apply(graph: &mut Graph, op: Operation) -> Result<(), GraphError> {
    trace!(op = op.name(), record = %op.record(), "applying operation");
    match op {
        Operation::UpdateRelationship {
            record,
            field,
            value,
        } => update_relationship::apply(graph, &record, &field, value),
        Operation::ReplaceRelatedRecord {
            record,
            field,
            value,
        } => replace_related_record::apply(graph, &record, &field, value),
        Operation::ReplaceRelatedRecords {
            record,
            field,
            value,
        } => replace_related_records::apply(graph, &record, &field, &value),
        Operation::AddToRelatedRecords {
            record,
            field,
            value,
            index,
        } => add_to_related_records::apply(graph, &record, &field, &value, index),
        Operation::RemoveFromRelatedRecords {
            record,
            field,
            value,
            index,
        } => remove_from_related_records::apply(graph, &record, &field, &value, index),
        Operation::DeleteRecord { record } => {
            unload::delete_record(graph, &record);
            Ok(())
        }
    }
}

/// Resolves `record.field` and checks it has the storage shape `op` needs.
fn target(
    graph: &mut Graph,
    op: &'static str,
    record: &Identifier,
    field: &str,
    kind: EdgeKind,
) -> Result<Arc<RelationshipDefinition>, GraphError> {
    let def = graph.definition(record.ty(), field)?;
    if def.kind != kind {
        return Err(mismatch(op, &def));
    }
    Ok(def)
}

fn mismatch(op: &'static str, def: &RelationshipDefinition) -> GraphError {
    GraphError::CardinalityMismatch {
        op,
        ty: def.owner_type.clone(),
        field: def.field.clone(),
    }
}

/// The stored edge disagrees with the definition it was created from.
fn shape_corruption() -> GraphError {
    GraphError::InternalCorruption("stored edge shape disagrees with its definition")
}

/// Inverse definitions keyed by the related identifier's type.
#[derive(Debug, Default)]
struct Inverses(FxHashMap<TypeName, Arc<RelationshipDefinition>>);

impl Inverses {
    /// Type-checks every value against `def` and resolves its inverse.
    fn resolve<'a>(
        graph: &mut Graph,
        def: &RelationshipDefinition,
        values: impl IntoIterator<Item = &'a Identifier>,
    ) -> Result<Self, GraphError> {
        let mut out = FxHashMap::default();
        for value in values {
            def.accepts(value)?;
            if !out.contains_key(value.ty()) {
                let inverse = graph.inverse_definition(def, value.ty())?;
                out.insert(value.ty().clone(), inverse);
            }
        }
        Ok(Self(out))
    }

    fn get(&self, value: &Identifier) -> Option<&Arc<RelationshipDefinition>> {
        self.0.get(value.ty())
    }
}

/// Mirrors `added` onto reciprocal edges in `view`.
fn add_all(
    graph: &mut Graph,
    owner: &Identifier,
    added: &[Identifier],
    inverses: &Inverses,
    view: View,
) {
    for related in added {
        let Some(inverse) = inverses.get(related) else {
            debug_assert!(false, "inverse of {related} was not resolved");
            continue;
        };
        inverse::add_to_inverse(graph, related, inverse, owner, view);
    }
}

/// Mirrors `removed` onto reciprocal edges in `view`.
fn remove_all(
    graph: &mut Graph,
    owner: &Identifier,
    def: &RelationshipDefinition,
    removed: &[Identifier],
    view: View,
) {
    for related in removed {
        inverse::remove_from_inverse(graph, related, &def.inverse_key, owner, view);
    }
}

/// Applies the graph's duplicate policy to a collection payload.
fn dedupe(
    graph: &Graph,
    def: &RelationshipDefinition,
    values: &[Identifier],
) -> Result<OrderedSet<Identifier>, GraphError> {
    let mut out = OrderedSet::new();
    let mut dropped = 0_usize;
    for value in values {
        if out.push(value.clone()) {
            continue;
        }
        match graph.config.duplicates {
            DuplicatePolicy::Strict => {
                return Err(GraphError::DuplicateRelationshipEntry {
                    ty: def.owner_type.clone(),
                    field: def.field.clone(),
                    identifier: value.clone(),
                });
            }
            DuplicatePolicy::Dedupe => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(
            ty = %def.owner_type,
            field = %def.field,
            dropped,
            "duplicate relationship entries filtered"
        );
    }
    Ok(out)
}
