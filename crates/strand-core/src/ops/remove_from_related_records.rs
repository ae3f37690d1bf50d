// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `removeFromRelatedRecords`: local removal from a `hasMany` sequence.
use std::slice;

use crate::definition::EdgeKind;
use crate::edge::Edge;
use crate::graph::{Graph, GraphError};
use crate::ident::Identifier;

use super::View;

const OP: &str = "removeFromRelatedRecords";

pub(super) fn apply(
    graph: &mut Graph,
    record: &Identifier,
    field: &str,
    value: &Identifier,
    index: Option<usize>,
) -> Result<(), GraphError> {
    let def = super::target(graph, OP, record, field, EdgeKind::Collection)?;
    def.accepts(value)?;

    let Edge::Collection(edge) = graph.edge_mut(record, &def) else {
        return Err(super::shape_corruption());
    };
    if !edge.remove_local(value, index) {
        return Ok(());
    }
    super::remove_all(graph, record, &def, slice::from_ref(value), View::Local);
    graph.notify(record, &def);
    Ok(())
}
