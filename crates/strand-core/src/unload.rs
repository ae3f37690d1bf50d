// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Removal of an identifier's edges and every reference to it.
//!
//! Both `deleteRecord` and `unload` sever an identifier the same way: its own
//! edges (declared and implicit) leave the graph, and the identifier is
//! removed from both views of every reciprocal edge that referenced it. The
//! reciprocal edges are found by looking up `(related, inverse_key)`; edges
//! that no longer exist are skipped, so severing is idempotent and safe in
//! any order relative to other identifiers.
//!
//! Implicit edges on related identifiers that become empty are pruned when
//! the severed identifier was deleted, and retained otherwise.
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::edge::Edge;
use crate::graph::Graph;
use crate::ident::{FieldKey, Identifier};

/// Marks `identifier` deleted and severs it.
///
/// Its declared edges that had observable members are reported as changed.
pub(crate) fn delete_record(graph: &mut Graph, identifier: &Identifier) {
    graph.deleted.insert(identifier.clone());
    let Some(edges) = graph.identifiers.remove(identifier) else {
        trace!(%identifier, "deleted identifier owned no edges");
        return;
    };
    for edge in edges.values() {
        if !edge.definition().is_implicit() && !edge.local_identifiers().is_empty() {
            graph.notify(identifier, edge.definition());
        }
    }
    sever(graph, identifier, &edges, true);
    debug!(%identifier, edges = edges.len(), "deleted");
}

/// Removes `identifier` from the graph. Unknown identifiers are a no-op.
pub(crate) fn unload(graph: &mut Graph, identifier: &Identifier) {
    let was_deleted = graph.deleted.remove(identifier);
    let Some(edges) = graph.identifiers.remove(identifier) else {
        trace!(%identifier, "unload of unknown identifier");
        return;
    };
    sever(graph, identifier, &edges, was_deleted);
    debug!(%identifier, edges = edges.len(), "unloaded");
}

fn sever(
    graph: &mut Graph,
    identifier: &Identifier,
    edges: &BTreeMap<FieldKey, Edge>,
    prune_implicit: bool,
) {
    for edge in edges.values() {
        let inverse_key = &edge.definition().inverse_key;
        for related in edge.related() {
            remove_completely_from_inverse(graph, &related, inverse_key, identifier, prune_implicit);
        }
    }
}

fn remove_completely_from_inverse(
    graph: &mut Graph,
    related: &Identifier,
    field: &FieldKey,
    owner: &Identifier,
    prune_implicit: bool,
) {
    let Some(edges) = graph.identifiers.get_mut(related) else {
        return;
    };
    let Some(edge) = edges.get_mut(field) else {
        return;
    };
    let changed = edge.remove_completely(owner);
    let def = Arc::clone(edge.definition());
    if prune_implicit && def.is_implicit() && edge.is_empty() {
        edges.remove(field);
        if edges.is_empty() {
            graph.identifiers.remove(related);
        }
        trace!(%related, %field, "pruned empty implicit edge");
        return;
    }
    if changed {
        graph.notify(related, &def);
    }
}
