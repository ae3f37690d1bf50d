// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reciprocal-edge maintenance.
//!
//! `add_to_inverse` may displace the previous value of a single inverse edge;
//! the displaced identifier loses its reference through `remove_from_inverse`,
//! which never cascades further.
use std::sync::Arc;

use crate::definition::RelationshipDefinition;
use crate::edge::Edge;
use crate::graph::Graph;
use crate::ident::{FieldKey, Identifier};

use super::View;

/// Adds `owner` to the edge `(related, inverse.field)` in `view`, creating
/// the edge on first reference.
pub(super) fn add_to_inverse(
    graph: &mut Graph,
    related: &Identifier,
    inverse: &Arc<RelationshipDefinition>,
    owner: &Identifier,
    view: View,
) {
    let (changed, displaced) = match graph.edge_mut(related, inverse) {
        Edge::Implicit(edge) => {
            edge.add(owner, view == View::Remote);
            (false, None)
        }
        Edge::Collection(edge) => match view {
            View::Remote => {
                edge.add_remote_member(owner);
                (false, None)
            }
            View::Local => (edge.add_local(owner, None), None),
        },
        Edge::Single(edge) => match view {
            View::Remote => (false, edge.set_remote_from_inverse(owner)),
            View::Local => match edge.set_local(owner) {
                Some(previous) => (true, previous),
                None => (false, None),
            },
        },
    };
    if let Some(displaced) = displaced.filter(|d| d != owner) {
        remove_from_inverse(graph, &displaced, &inverse.inverse_key, related, view);
    }
    if changed {
        graph.notify(related, inverse);
    }
}

/// Removes `owner` from the edge `(related, field)` in `view`.
///
/// Does nothing when that edge does not exist, so severed or unloaded
/// identifiers are never brought back.
pub(super) fn remove_from_inverse(
    graph: &mut Graph,
    related: &Identifier,
    field: &FieldKey,
    owner: &Identifier,
    view: View,
) {
    let Some(edge) = graph.existing_edge_mut(related, field) else {
        return;
    };
    let def = Arc::clone(edge.definition());
    let changed = match edge {
        Edge::Implicit(edge) => {
            edge.remove(owner, view == View::Remote);
            false
        }
        Edge::Collection(edge) => match view {
            View::Remote => {
                edge.remove_remote_member(owner);
                false
            }
            View::Local => edge.remove_local(owner, None),
        },
        Edge::Single(edge) => match view {
            View::Remote => {
                edge.clear_remote(owner);
                false
            }
            View::Local => edge.clear_local(owner),
        },
    };
    if changed {
        graph.notify(related, &def);
    }
}
