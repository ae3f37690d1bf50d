// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `belongsTo` edge storage.
use std::sync::Arc;

use crate::definition::RelationshipDefinition;
use crate::ident::Identifier;
use crate::payload::{Links, RelationshipData, RelationshipPayload};

use super::EdgeState;

/// Edge holding at most one related identifier per view.
#[derive(Clone, Debug)]
pub struct SingleEdge {
    pub(crate) definition: Arc<RelationshipDefinition>,
    pub(crate) identifier: Identifier,
    pub(crate) state: EdgeState,
    pub(crate) remote_state: Option<Identifier>,
    pub(crate) local_state: Option<Identifier>,
    pub(crate) links: Option<Links>,
    pub(crate) meta: Option<serde_json::Value>,
}

impl SingleEdge {
    pub(crate) fn new(definition: Arc<RelationshipDefinition>, identifier: Identifier) -> Self {
        Self {
            definition,
            identifier,
            state: EdgeState::default(),
            remote_state: None,
            local_state: None,
            links: None,
            meta: None,
        }
    }

    /// Server-confirmed value.
    pub fn remote_state(&self) -> Option<&Identifier> {
        self.remote_state.as_ref()
    }

    /// Observed value, including unsaved local changes.
    pub fn local_state(&self) -> Option<&Identifier> {
        self.local_state.as_ref()
    }

    fn payload(&self, value: Option<&Identifier>) -> RelationshipPayload {
        let data = if value.is_some() || self.state.has_received_data {
            Some(RelationshipData::Single(value.cloned()))
        } else {
            None
        };
        RelationshipPayload {
            data,
            links: self.links.clone(),
            meta: self.meta.clone(),
        }
    }

    /// Local view as a payload.
    pub fn get_data(&self) -> RelationshipPayload {
        self.payload(self.local_state.as_ref())
    }

    /// Remote view as a payload.
    pub fn get_remote_data(&self) -> RelationshipPayload {
        self.payload(self.remote_state.as_ref())
    }

    /// Sets the remote value as the inverse side of another edge and returns
    /// the value it displaced. The local view is left as it was.
    pub(crate) fn set_remote_from_inverse(&mut self, value: &Identifier) -> Option<Identifier> {
        self.state.has_received_data = true;
        self.state.is_empty = false;
        self.remote_state.replace(value.clone())
    }

    /// Clears the remote view when it points at `value`.
    pub(crate) fn clear_remote(&mut self, value: &Identifier) {
        if self.remote_state.as_ref() == Some(value) {
            self.remote_state = None;
            self.state.is_empty = true;
        }
    }

    /// Points the local view at `value`. Returns the displaced value when the
    /// local view changed, or `None` when it already pointed at `value`.
    pub(crate) fn set_local(&mut self, value: &Identifier) -> Option<Option<Identifier>> {
        if self.local_state.as_ref() == Some(value) {
            return None;
        }
        self.state.has_received_data = true;
        Some(self.local_state.replace(value.clone()))
    }

    /// Clears the local view when it points at `value`. Returns `true` on change.
    pub(crate) fn clear_local(&mut self, value: &Identifier) -> bool {
        if self.local_state.as_ref() == Some(value) {
            self.local_state = None;
            return true;
        }
        false
    }

    /// Removes `value` from both views. Returns `true` if the local view changed.
    pub(crate) fn remove_completely(&mut self, value: &Identifier) -> bool {
        if self.remote_state.as_ref() == Some(value) {
            self.remote_state = None;
        }
        self.clear_local(value)
    }

    pub(crate) fn related(&self) -> Vec<Identifier> {
        let mut out: Vec<Identifier> = self.remote_state.iter().cloned().collect();
        if let Some(local) = &self.local_state {
            if !out.contains(local) {
                out.push(local.clone());
            }
        }
        out
    }
}
