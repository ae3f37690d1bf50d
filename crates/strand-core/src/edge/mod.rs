// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge storage: the relationship state for one `(identifier, field)` pair.
//!
//! Every edge keeps two views. The *remote* view is the last value the server
//! confirmed; the *local* view is what observers see, including unsaved
//! mutations. Edges never reference each other directly; the reciprocal edge
//! is found by looking up `(related, definition.inverse_key)` in the graph.
use std::sync::Arc;

mod collection;
mod implicit;
mod single;

pub use collection::CollectionEdge;
pub use implicit::ImplicitEdge;
pub use single::SingleEdge;

use crate::definition::{EdgeKind, RelationshipDefinition};
use crate::ident::Identifier;
use crate::payload::{RelationshipData, RelationshipPayload};

/// Load-state flags tracked per declared edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeState {
    /// Linkage has been received at least once (remote or local).
    pub has_received_data: bool,
    /// The last received single linkage was null.
    pub is_empty: bool,
    /// Links changed without accompanying linkage; data should be refetched.
    pub is_stale: bool,
}

/// Relationship state for one `(identifier, field)` pair.
#[derive(Clone, Debug)]
pub enum Edge {
    /// `belongsTo`.
    Single(SingleEdge),
    /// `hasMany`.
    Collection(CollectionEdge),
    /// Inverse-only bookkeeping.
    Implicit(ImplicitEdge),
}

impl Edge {
    pub(crate) fn new(definition: Arc<RelationshipDefinition>, identifier: Identifier) -> Self {
        match definition.kind {
            EdgeKind::Single => Self::Single(SingleEdge::new(definition, identifier)),
            EdgeKind::Collection => Self::Collection(CollectionEdge::new(definition, identifier)),
            EdgeKind::Implicit => Self::Implicit(ImplicitEdge::new(definition, identifier)),
        }
    }

    /// Resolved definition of this side.
    pub fn definition(&self) -> &Arc<RelationshipDefinition> {
        match self {
            Self::Single(e) => &e.definition,
            Self::Collection(e) => &e.definition,
            Self::Implicit(e) => &e.definition,
        }
    }

    /// Owning identifier.
    pub fn identifier(&self) -> &Identifier {
        match self {
            Self::Single(e) => &e.identifier,
            Self::Collection(e) => &e.identifier,
            Self::Implicit(e) => &e.identifier,
        }
    }

    /// Load-state flags; implicit edges report the defaults.
    pub fn state(&self) -> EdgeState {
        match self {
            Self::Single(e) => e.state,
            Self::Collection(e) => e.state,
            Self::Implicit(_) => EdgeState::default(),
        }
    }

    /// Local state as a relationship payload.
    ///
    /// Implicit edges render their local members as collection linkage.
    pub fn get_data(&self) -> RelationshipPayload {
        match self {
            Self::Single(e) => e.get_data(),
            Self::Collection(e) => e.get_data(),
            Self::Implicit(e) => RelationshipPayload {
                data: Some(RelationshipData::Collection(e.local_members.to_vec())),
                ..RelationshipPayload::default()
            },
        }
    }

    /// Local state; same as [`Edge::get_data`].
    pub fn get_local_data(&self) -> RelationshipPayload {
        self.get_data()
    }

    /// Remote state as a relationship payload.
    pub fn get_remote_data(&self) -> RelationshipPayload {
        match self {
            Self::Single(e) => e.get_remote_data(),
            Self::Collection(e) => e.get_remote_data(),
            Self::Implicit(e) => RelationshipPayload {
                data: Some(RelationshipData::Collection(e.remote_members.to_vec())),
                ..RelationshipPayload::default()
            },
        }
    }

    /// Related identifiers in the local view, in order.
    pub fn local_identifiers(&self) -> Vec<Identifier> {
        match self {
            Self::Single(e) => e.local_state.iter().cloned().collect(),
            Self::Collection(e) => e.local_state(),
            Self::Implicit(e) => e.local_members.to_vec(),
        }
    }

    /// Related identifiers in the remote view, in order.
    pub fn remote_identifiers(&self) -> Vec<Identifier> {
        match self {
            Self::Single(e) => e.remote_state.iter().cloned().collect(),
            Self::Collection(e) => e.remote_state.to_vec(),
            Self::Implicit(e) => e.remote_members.to_vec(),
        }
    }

    /// Every identifier referenced by either view.
    pub(crate) fn related(&self) -> Vec<Identifier> {
        match self {
            Self::Single(e) => e.related(),
            Self::Collection(e) => e.related(),
            Self::Implicit(e) => e.related(),
        }
    }

    /// True when neither view references anything.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(e) => e.remote_state.is_none() && e.local_state.is_none(),
            Self::Collection(e) => {
                e.remote_state.is_empty() && e.additions.is_none() && e.local_state().is_empty()
            }
            Self::Implicit(e) => e.is_empty(),
        }
    }

    pub(crate) fn flush(&mut self) {
        if let Self::Collection(e) = self {
            e.flush();
        }
    }

    /// Removes every trace of `value`. Returns `true` if the local view changed.
    pub(crate) fn remove_completely(&mut self, value: &Identifier) -> bool {
        match self {
            Self::Single(e) => e.remove_completely(value),
            Self::Collection(e) => e.remove_completely(value),
            Self::Implicit(e) => e.remove_completely(value),
        }
    }
}
