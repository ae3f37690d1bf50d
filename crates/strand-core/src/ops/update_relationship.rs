// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `updateRelationship`: canonical replace of an edge from a server payload.
//!
//! The remote view is replaced outright. The local view is reset to match
//! unless the relationship preserves local divergence, in which case the
//! local diff is carried over onto the new remote baseline.
//!
//! A payload without `data` records links and meta only. A synchronous
//! relationship that has never received data treats such a payload as empty
//! linkage. When `links.related` changes without accompanying data the edge
//! is marked stale so the presentation layer knows to refetch.
use std::sync::Arc;

use crate::definition::{EdgeKind, RelationshipDefinition};
use crate::edge::{Edge, EdgeState};
use crate::graph::{Graph, GraphError};
use crate::ident::Identifier;
use crate::ordered_set::OrderedSet;
use crate::payload::{Links, RelationshipData, RelationshipPayload};

use super::{Inverses, View};

const OP: &str = "updateRelationship";

pub(super) fn apply(
    graph: &mut Graph,
    record: &Identifier,
    field: &str,
    payload: RelationshipPayload,
) -> Result<(), GraphError> {
    let def = graph.definition(record.ty(), field)?;
    let has_received_data = graph
        .peek(record, field)
        .is_some_and(|edge| edge.state().has_received_data);
    let implied_empty = payload.data.is_none() && !def.is_async && !has_received_data;
    match def.kind {
        EdgeKind::Collection => collection(graph, record, &def, &payload, implied_empty),
        EdgeKind::Single => single(graph, record, &def, &payload, implied_empty),
        EdgeKind::Implicit => Err(super::mismatch(OP, &def)),
    }
}

fn collection(
    graph: &mut Graph,
    record: &Identifier,
    def: &Arc<RelationshipDefinition>,
    payload: &RelationshipPayload,
    implied_empty: bool,
) -> Result<(), GraphError> {
    let values = match &payload.data {
        Some(RelationshipData::Collection(values)) => Some(super::dedupe(graph, def, values)?),
        Some(RelationshipData::Single(None)) => Some(OrderedSet::new()),
        Some(RelationshipData::Single(Some(_))) => return Err(super::mismatch(OP, def)),
        None if implied_empty => Some(OrderedSet::new()),
        None => None,
    };
    let inverses = Inverses::resolve(graph, def, values.iter().flatten())?;

    let Edge::Collection(edge) = graph.edge_mut(record, def) else {
        return Err(super::shape_corruption());
    };
    let went_stale = record_links_and_meta(
        &mut edge.links,
        &mut edge.meta,
        &mut edge.state,
        payload,
        values.is_some(),
    );
    let change = values.map(|values| edge.replace_remote(values, def.reset_on_remote_update));

    if let Some(change) = change {
        super::remove_all(graph, record, def, &change.remote_removed, View::Remote);
        super::add_all(graph, record, &change.remote_added, &inverses, View::Remote);
        super::remove_all(graph, record, def, &change.local_removed, View::Local);
        super::add_all(graph, record, &change.local_added, &inverses, View::Local);
        if change.local_changed {
            graph.notify(record, def);
        }
    }
    if went_stale {
        graph.notify(record, def);
    }
    Ok(())
}

/// Before/after values of a single edge across a canonical update.
struct SingleUpdate {
    previous_remote: Option<Identifier>,
    previous_local: Option<Identifier>,
    remote: Option<Identifier>,
    local: Option<Identifier>,
}

fn single(
    graph: &mut Graph,
    record: &Identifier,
    def: &Arc<RelationshipDefinition>,
    payload: &RelationshipPayload,
    implied_empty: bool,
) -> Result<(), GraphError> {
    let value = match &payload.data {
        Some(RelationshipData::Single(value)) => Some(value.clone()),
        Some(RelationshipData::Collection(_)) => return Err(super::mismatch(OP, def)),
        None if implied_empty => Some(None),
        None => None,
    };
    let inverses = Inverses::resolve(graph, def, value.iter().flatten())?;

    let Edge::Single(edge) = graph.edge_mut(record, def) else {
        return Err(super::shape_corruption());
    };
    let went_stale = record_links_and_meta(
        &mut edge.links,
        &mut edge.meta,
        &mut edge.state,
        payload,
        value.is_some(),
    );
    let update = value.map(|value| {
        let previous_remote = std::mem::replace(&mut edge.remote_state, value.clone());
        let previous_local = edge.local_state.clone();
        edge.state.has_received_data = true;
        edge.state.is_empty = value.is_none();
        if def.reset_on_remote_update || previous_local == previous_remote {
            edge.local_state.clone_from(&value);
        }
        SingleUpdate {
            previous_remote,
            previous_local,
            local: edge.local_state.clone(),
            remote: value,
        }
    });

    if let Some(update) = update {
        if update.previous_remote != update.remote {
            let removed = update.previous_remote.as_slice();
            super::remove_all(graph, record, def, removed, View::Remote);
            super::add_all(graph, record, update.remote.as_slice(), &inverses, View::Remote);
        }
        if update.previous_local != update.local {
            let removed = update.previous_local.as_slice();
            super::remove_all(graph, record, def, removed, View::Local);
            super::add_all(graph, record, update.local.as_slice(), &inverses, View::Local);
            graph.notify(record, def);
        }
    }
    if went_stale {
        graph.notify(record, def);
    }
    Ok(())
}

/// Records links and meta from `payload`. Returns `true` when the edge went
/// stale: its related link changed and no linkage came with it.
fn record_links_and_meta(
    links: &mut Option<Links>,
    meta: &mut Option<serde_json::Value>,
    state: &mut EdgeState,
    payload: &RelationshipPayload,
    has_data: bool,
) -> bool {
    let mut went_stale = false;
    if let Some(next) = &payload.links {
        let previous = links.as_ref().and_then(|l| l.related.as_ref());
        let related_changed = next.related.is_some() && next.related.as_ref() != previous;
        if related_changed && !has_data {
            went_stale = !state.is_stale;
            state.is_stale = true;
        }
        *links = Some(next.clone());
    }
    if let Some(next) = &payload.meta {
        *meta = Some(next.clone());
    }
    if has_data {
        state.is_stale = false;
    }
    went_stale
}
