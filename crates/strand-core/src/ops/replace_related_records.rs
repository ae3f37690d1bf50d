// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `replaceRelatedRecords`: local replace of a `hasMany` sequence.
use crate::definition::EdgeKind;
use crate::edge::Edge;
use crate::graph::{Graph, GraphError};
use crate::ident::Identifier;

use super::{Inverses, View};

const OP: &str = "replaceRelatedRecords";

pub(super) fn apply(
    graph: &mut Graph,
    record: &Identifier,
    field: &str,
    values: &[Identifier],
) -> Result<(), GraphError> {
    let def = super::target(graph, OP, record, field, EdgeKind::Collection)?;
    let values = super::dedupe(graph, &def, values)?;
    let inverses = Inverses::resolve(graph, &def, values.iter())?;

    let Edge::Collection(edge) = graph.edge_mut(record, &def) else {
        return Err(super::shape_corruption());
    };
    let change = edge.replace_local(&values);

    // Removals first so a single inverse moved between owners ends on the new one.
    super::remove_all(graph, record, &def, &change.removed, View::Local);
    super::add_all(graph, record, &change.added, &inverses, View::Local);
    if change.changed {
        graph.notify(record, &def);
    }
    Ok(())
}
