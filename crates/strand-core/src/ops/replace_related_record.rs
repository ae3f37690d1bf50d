// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `replaceRelatedRecord`: local replace of a `belongsTo` value.
use crate::definition::EdgeKind;
use crate::edge::Edge;
use crate::graph::{Graph, GraphError};
use crate::ident::Identifier;

use super::{Inverses, View};

const OP: &str = "replaceRelatedRecord";

pub(super) fn apply(
    graph: &mut Graph,
    record: &Identifier,
    field: &str,
    value: Option<Identifier>,
) -> Result<(), GraphError> {
    let def = super::target(graph, OP, record, field, EdgeKind::Single)?;
    let inverses = Inverses::resolve(graph, &def, value.iter())?;

    let Edge::Single(edge) = graph.edge_mut(record, &def) else {
        return Err(super::shape_corruption());
    };
    edge.state.has_received_data = true;
    if edge.local_state == value {
        return Ok(());
    }
    let previous = std::mem::replace(&mut edge.local_state, value.clone());

    super::remove_all(graph, record, &def, previous.as_slice(), View::Local);
    super::add_all(graph, record, value.as_slice(), &inverses, View::Local);
    graph.notify(record, &def);
    Ok(())
}
