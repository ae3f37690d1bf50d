// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `addToRelatedRecords`: positional local insert into a `hasMany` sequence.
use std::slice;

use crate::definition::EdgeKind;
use crate::edge::Edge;
use crate::graph::{Graph, GraphError};
use crate::ident::Identifier;

use super::{Inverses, View};

const OP: &str = "addToRelatedRecords";

pub(super) fn apply(
    graph: &mut Graph,
    record: &Identifier,
    field: &str,
    value: &Identifier,
    index: Option<usize>,
) -> Result<(), GraphError> {
    let def = super::target(graph, OP, record, field, EdgeKind::Collection)?;
    let inverses = Inverses::resolve(graph, &def, [value])?;

    let Edge::Collection(edge) = graph.edge_mut(record, &def) else {
        return Err(super::shape_corruption());
    };
    if !edge.add_local(value, index) {
        return Ok(());
    }
    super::add_all(graph, record, slice::from_ref(value), &inverses, View::Local);
    graph.notify(record, &def);
    Ok(())
}
