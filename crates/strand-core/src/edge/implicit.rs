// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Inverse-only edge storage.
use std::sync::Arc;

use crate::definition::RelationshipDefinition;
use crate::ident::Identifier;
use crate::ordered_set::OrderedSet;

/// Reverse index for a relationship whose inverse was never declared.
///
/// Invisible to the presentation layer; it exists so that deleting or
/// unloading the owning identifier can find every edge that references it.
#[derive(Clone, Debug)]
pub struct ImplicitEdge {
    pub(crate) definition: Arc<RelationshipDefinition>,
    pub(crate) identifier: Identifier,
    pub(crate) remote_members: OrderedSet<Identifier>,
    pub(crate) local_members: OrderedSet<Identifier>,
}

impl ImplicitEdge {
    pub(crate) fn new(definition: Arc<RelationshipDefinition>, identifier: Identifier) -> Self {
        Self {
            definition,
            identifier,
            remote_members: OrderedSet::new(),
            local_members: OrderedSet::new(),
        }
    }

    /// Identifiers referencing the owner in their server-confirmed state.
    pub fn remote_members(&self) -> &[Identifier] {
        self.remote_members.as_slice()
    }

    /// Identifiers referencing the owner in their local state.
    pub fn local_members(&self) -> &[Identifier] {
        self.local_members.as_slice()
    }

    /// True when nothing references the owner.
    pub fn is_empty(&self) -> bool {
        self.remote_members.is_empty() && self.local_members.is_empty()
    }

    pub(crate) fn add(&mut self, value: &Identifier, remote: bool) {
        if remote {
            self.remote_members.push(value.clone());
        } else {
            self.local_members.push(value.clone());
        }
    }

    pub(crate) fn remove(&mut self, value: &Identifier, remote: bool) {
        if remote {
            self.remote_members.remove(value);
        } else {
            self.local_members.remove(value);
        }
    }

    /// Drops `value` from both views. Returns `true` if it was a local member.
    pub(crate) fn remove_completely(&mut self, value: &Identifier) -> bool {
        self.remote_members.remove(value);
        self.local_members.remove(value)
    }

    pub(crate) fn related(&self) -> Vec<Identifier> {
        let mut out = self.remote_members.clone();
        for v in &self.local_members {
            out.push(v.clone());
        }
        out.to_vec()
    }
}
