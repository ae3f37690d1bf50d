// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `hasMany` edge storage.
//!
//! The local view is never stored independently of the remote view. It is
//! described as a diff (`additions`, `removals`) against `remote_state`, plus
//! a cached ordered rendering of the result. Membership invariants:
//!
//! - `additions ∩ remote_state = ∅`
//! - `removals ⊆ remote_state`
//! - local members = `(remote_state − removals) ∪ additions`
//!
//! When the cache is dirty it is rebuilt as `remote_state − removals` followed
//! by `additions`, in order.
use std::sync::Arc;

use crate::definition::RelationshipDefinition;
use crate::ident::Identifier;
use crate::ordered_set::OrderedSet;
use crate::payload::{Links, RelationshipData, RelationshipPayload};

use super::EdgeState;

/// Membership changes produced by a remote replace.
#[derive(Debug, Default)]
pub(crate) struct RemoteReplace {
    pub(crate) remote_added: Vec<Identifier>,
    pub(crate) remote_removed: Vec<Identifier>,
    pub(crate) local_added: Vec<Identifier>,
    pub(crate) local_removed: Vec<Identifier>,
    pub(crate) local_changed: bool,
}

/// Membership changes produced by a local replace.
#[derive(Debug, Default)]
pub(crate) struct LocalReplace {
    pub(crate) added: Vec<Identifier>,
    pub(crate) removed: Vec<Identifier>,
    pub(crate) changed: bool,
}

/// Edge holding an ordered, duplicate-free sequence of related identifiers.
#[derive(Clone, Debug)]
pub struct CollectionEdge {
    pub(crate) definition: Arc<RelationshipDefinition>,
    pub(crate) identifier: Identifier,
    pub(crate) state: EdgeState,
    pub(crate) remote_state: OrderedSet<Identifier>,
    pub(crate) additions: Option<OrderedSet<Identifier>>,
    pub(crate) removals: Option<OrderedSet<Identifier>>,
    pub(crate) local_state: Vec<Identifier>,
    pub(crate) is_dirty: bool,
    pub(crate) links: Option<Links>,
    pub(crate) meta: Option<serde_json::Value>,
}

impl CollectionEdge {
    pub(crate) fn new(definition: Arc<RelationshipDefinition>, identifier: Identifier) -> Self {
        Self {
            definition,
            identifier,
            state: EdgeState::default(),
            remote_state: OrderedSet::new(),
            additions: None,
            removals: None,
            local_state: Vec::new(),
            is_dirty: false,
            links: None,
            meta: None,
        }
    }

    /// Server-confirmed members, in order.
    pub fn remote_state(&self) -> &[Identifier] {
        self.remote_state.as_slice()
    }

    /// True when the local view has pending changes not yet folded into the
    /// cached rendering.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Locally added members not (yet) confirmed by the server.
    pub fn additions(&self) -> Vec<Identifier> {
        self.additions
            .as_ref()
            .map(OrderedSet::to_vec)
            .unwrap_or_default()
    }

    /// Server members locally removed.
    pub fn removals(&self) -> Vec<Identifier> {
        self.removals
            .as_ref()
            .map(OrderedSet::to_vec)
            .unwrap_or_default()
    }

    fn is_removed(&self, value: &Identifier) -> bool {
        self.removals.as_ref().is_some_and(|r| r.contains(value))
    }

    fn is_added(&self, value: &Identifier) -> bool {
        self.additions.as_ref().is_some_and(|a| a.contains(value))
    }

    /// Local membership test; does not require a flush.
    pub fn local_contains(&self, value: &Identifier) -> bool {
        (self.remote_state.contains(value) && !self.is_removed(value)) || self.is_added(value)
    }

    fn compute_local(&self) -> Vec<Identifier> {
        let mut state: Vec<Identifier> = self
            .remote_state
            .iter()
            .filter(|v| !self.is_removed(v))
            .cloned()
            .collect();
        if let Some(additions) = &self.additions {
            state.extend(additions.iter().cloned());
        }
        state
    }

    /// Local view in order, without touching the cache.
    pub fn local_state(&self) -> Vec<Identifier> {
        if self.is_dirty {
            self.compute_local()
        } else {
            self.local_state.clone()
        }
    }

    /// Folds pending changes into the cached local rendering.
    pub(crate) fn flush(&mut self) {
        if self.is_dirty {
            self.local_state = self.compute_local();
            self.is_dirty = false;
        }
    }

    fn payload(&self, values: Vec<Identifier>) -> RelationshipPayload {
        let data = if self.state.has_received_data || !values.is_empty() {
            Some(RelationshipData::Collection(values))
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
        self.payload(self.local_state())
    }

    /// Remote view as a payload.
    pub fn get_remote_data(&self) -> RelationshipPayload {
        self.payload(self.remote_state.to_vec())
    }

    fn drop_empty_diff(&mut self) {
        if self.additions.as_ref().is_some_and(OrderedSet::is_empty) {
            self.additions = None;
        }
        if self.removals.as_ref().is_some_and(OrderedSet::is_empty) {
            self.removals = None;
        }
    }

    /// Adds `value` to the local view at `index` (default: end).
    ///
    /// Returns `false` if `value` was already a local member.
    pub(crate) fn add_local(&mut self, value: &Identifier, index: Option<usize>) -> bool {
        if self.local_contains(value) {
            return false;
        }
        self.flush();
        if self.is_removed(value) {
            if let Some(removals) = self.removals.as_mut() {
                removals.remove(value);
            }
        } else {
            self.additions
                .get_or_insert_with(OrderedSet::new)
                .push(value.clone());
        }
        self.drop_empty_diff();
        self.state.has_received_data = true;
        let index = index.map_or(self.local_state.len(), |i| i.min(self.local_state.len()));
        self.local_state.insert(index, value.clone());
        true
    }

    /// Removes `value` from the local view. `index` is a position hint.
    ///
    /// Returns `false` if `value` was not a local member.
    pub(crate) fn remove_local(&mut self, value: &Identifier, index: Option<usize>) -> bool {
        if !self.local_contains(value) {
            return false;
        }
        self.flush();
        if self.is_added(value) {
            if let Some(additions) = self.additions.as_mut() {
                additions.remove(value);
            }
        } else {
            self.removals
                .get_or_insert_with(OrderedSet::new)
                .push(value.clone());
        }
        self.drop_empty_diff();
        let hinted = index.filter(|&i| self.local_state.get(i) == Some(value));
        if let Some(pos) = hinted.or_else(|| self.local_state.iter().position(|v| v == value)) {
            self.local_state.remove(pos);
        }
        true
    }

    /// Replaces the local view with `values`, preserving their order.
    pub(crate) fn replace_local(&mut self, values: &OrderedSet<Identifier>) -> LocalReplace {
        let previous = self.local_state();
        let previous_set: OrderedSet<Identifier> = previous.iter().cloned().collect();
        let removed: Vec<Identifier> = previous
            .iter()
            .filter(|v| !values.contains(v))
            .cloned()
            .collect();
        let added: Vec<Identifier> = values
            .iter()
            .filter(|v| !previous_set.contains(v))
            .cloned()
            .collect();

        let additions: OrderedSet<Identifier> = values
            .iter()
            .filter(|v| !self.remote_state.contains(v))
            .cloned()
            .collect();
        let removals: OrderedSet<Identifier> = self
            .remote_state
            .iter()
            .filter(|v| !values.contains(v))
            .cloned()
            .collect();
        self.additions = Some(additions);
        self.removals = Some(removals);
        self.drop_empty_diff();
        self.local_state = values.to_vec();
        self.is_dirty = false;
        self.state.has_received_data = true;

        LocalReplace {
            changed: previous != self.local_state,
            added,
            removed,
        }
    }

    /// Replaces the remote view with `values` and re-derives the local view.
    ///
    /// With `reset`, the local view becomes a copy of the remote view. Without
    /// it, the local diff survives and is re-applied on the new remote order:
    /// additions now confirmed by the server are folded in and removals of
    /// members the server dropped are forgotten. A push that repeats the
    /// current remote sequence leaves the local view exactly as it was.
    pub(crate) fn replace_remote(
        &mut self,
        values: OrderedSet<Identifier>,
        reset: bool,
    ) -> RemoteReplace {
        let previous_local = self.local_state();
        let remote_removed: Vec<Identifier> = self
            .remote_state
            .iter()
            .filter(|v| !values.contains(v))
            .cloned()
            .collect();
        let remote_added: Vec<Identifier> = values
            .iter()
            .filter(|v| !self.remote_state.contains(v))
            .cloned()
            .collect();
        let repeated = self.remote_state == values;
        self.remote_state = values;
        self.state.has_received_data = true;

        if reset {
            self.additions = None;
            self.removals = None;
            self.is_dirty = true;
        } else if !repeated {
            let remote = &self.remote_state;
            if let Some(additions) = self.additions.as_mut() {
                let confirmed: Vec<Identifier> =
                    additions.iter().filter(|v| remote.contains(v)).cloned().collect();
                for v in &confirmed {
                    additions.remove(v);
                }
            }
            if let Some(removals) = self.removals.as_mut() {
                let dropped: Vec<Identifier> =
                    removals.iter().filter(|v| !remote.contains(v)).cloned().collect();
                for v in &dropped {
                    removals.remove(v);
                }
            }
            self.drop_empty_diff();
            self.is_dirty = true;
        }

        let local_state = self.local_state();
        let previous_set: OrderedSet<Identifier> = previous_local.iter().cloned().collect();
        let local_removed = previous_local
            .iter()
            .filter(|v| !self.local_contains(v))
            .cloned()
            .collect();
        let local_added = local_state
            .iter()
            .filter(|v| !previous_set.contains(v))
            .cloned()
            .collect();
        RemoteReplace {
            local_changed: previous_local != local_state,
            remote_added,
            remote_removed,
            local_added,
            local_removed,
        }
    }

    /// Appends `value` to the remote view as the inverse side of another edge.
    ///
    /// Local membership is left as it was: a pending local addition of `value`
    /// is folded into the remote view, otherwise `value` is recorded as a
    /// local removal until the owning side's local view says otherwise.
    pub(crate) fn add_remote_member(&mut self, value: &Identifier) {
        if self.remote_state.contains(value) {
            return;
        }
        self.flush();
        let was_local = self.local_contains(value);
        self.remote_state.push(value.clone());
        self.state.has_received_data = true;
        if was_local {
            if let Some(additions) = self.additions.as_mut() {
                additions.remove(value);
            }
        } else {
            self.removals
                .get_or_insert_with(OrderedSet::new)
                .push(value.clone());
        }
        self.drop_empty_diff();
    }

    /// Removes `value` from the remote view as the inverse side of another
    /// edge. Local membership is left as it was.
    pub(crate) fn remove_remote_member(&mut self, value: &Identifier) {
        if !self.remote_state.contains(value) {
            return;
        }
        self.flush();
        let was_local = self.local_contains(value);
        self.remote_state.remove(value);
        if let Some(removals) = self.removals.as_mut() {
            removals.remove(value);
        }
        if was_local {
            self.additions
                .get_or_insert_with(OrderedSet::new)
                .push(value.clone());
        }
        self.drop_empty_diff();
    }

    /// Removes every trace of `value`. Returns `true` if the local view changed.
    pub(crate) fn remove_completely(&mut self, value: &Identifier) -> bool {
        let was_local = self.local_contains(value);
        self.remote_state.remove(value);
        if let Some(additions) = self.additions.as_mut() {
            additions.remove(value);
        }
        if let Some(removals) = self.removals.as_mut() {
            removals.remove(value);
        }
        self.drop_empty_diff();
        if !self.is_dirty {
            self.local_state.retain(|v| v != value);
        }
        was_local
    }

    pub(crate) fn related(&self) -> Vec<Identifier> {
        let mut out: OrderedSet<Identifier> = self.remote_state.iter().cloned().collect();
        if let Some(additions) = &self.additions {
            for v in additions {
                out.push(v.clone());
            }
        }
        out.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::EdgeKind;

    fn id(n: &str) -> Identifier {
        Identifier::new("config", n)
    }

    fn edge() -> CollectionEdge {
        let def = RelationshipDefinition {
            field: "configs".into(),
            kind: EdgeKind::Collection,
            owner_type: "app".into(),
            related_type: "config".into(),
            inverse_key: "app".into(),
            inverse_kind: EdgeKind::Single,
            inverse_is_implicit: false,
            is_async: false,
            is_polymorphic: false,
            reset_on_remote_update: true,
        };
        CollectionEdge::new(Arc::new(def), Identifier::new("app", "1"))
    }

    fn set(ids: &[&str]) -> OrderedSet<Identifier> {
        ids.iter().map(|n| id(n)).collect()
    }

    #[test]
    fn dirty_view_is_rebuilt_from_diff() {
        let mut e = edge();
        e.replace_remote(set(&["1", "2", "3"]), true);
        e.removals = Some(set(&["2"]));
        e.additions = Some(set(&["4"]));
        e.is_dirty = true;
        assert_eq!(e.local_state(), vec![id("1"), id("3"), id("4")]);
        e.flush();
        assert!(!e.is_dirty());
        assert_eq!(e.local_state, vec![id("1"), id("3"), id("4")]);
    }

    #[test]
    fn local_replace_records_diff_against_remote() {
        let mut e = edge();
        e.replace_remote(set(&["1", "2", "3"]), true);
        let change = e.replace_local(&set(&["3", "1", "4"]));
        assert!(change.changed);
        assert_eq!(change.added, vec![id("4")]);
        assert_eq!(change.removed, vec![id("2")]);
        assert_eq!(e.additions(), vec![id("4")]);
        assert_eq!(e.removals(), vec![id("2")]);
        assert_eq!(e.local_state(), vec![id("3"), id("1"), id("4")]);
    }

    #[test]
    fn add_local_reinstates_a_removal() {
        let mut e = edge();
        e.replace_remote(set(&["1", "2"]), true);
        assert!(e.remove_local(&id("1"), None));
        assert_eq!(e.removals(), vec![id("1")]);
        assert!(e.add_local(&id("1"), Some(0)));
        assert!(e.removals.is_none());
        assert_eq!(e.local_state(), vec![id("1"), id("2")]);
        assert!(!e.add_local(&id("2"), None));
    }

    #[test]
    fn preserved_diff_survives_remote_update() {
        let mut e = edge();
        e.replace_remote(set(&["1", "2"]), false);
        e.add_local(&id("3"), None);
        e.remove_local(&id("1"), None);
        let change = e.replace_remote(set(&["1", "2", "5"]), false);
        assert_eq!(e.local_state(), vec![id("2"), id("5"), id("3")]);
        assert_eq!(change.local_added, vec![id("5")]);
        assert!(change.local_removed.is_empty());
        assert_eq!(change.remote_added, vec![id("5")]);
    }

    #[test]
    fn preserved_diff_follows_the_new_remote_order() {
        let mut e = edge();
        e.replace_remote(set(&["1", "2", "3"]), false);
        let change = e.replace_remote(set(&["3", "2", "1"]), false);
        assert!(change.local_changed);
        assert!(change.local_added.is_empty() && change.local_removed.is_empty());
        assert_eq!(e.local_state(), vec![id("3"), id("2"), id("1")]);

        e.add_local(&id("9"), Some(0));
        e.replace_remote(set(&["2", "4"]), false);
        assert_eq!(e.local_state(), vec![id("2"), id("4"), id("9")]);
    }

    #[test]
    fn repeated_remote_sequence_keeps_local_order() {
        let mut e = edge();
        e.replace_remote(set(&["1", "2"]), false);
        e.replace_local(&set(&["2", "1"]));
        let change = e.replace_remote(set(&["1", "2"]), false);
        assert!(!change.local_changed);
        assert_eq!(e.local_state(), vec![id("2"), id("1")]);
    }

    #[test]
    fn remote_member_folds_pending_addition() {
        let mut e = edge();
        e.add_local(&id("1"), None);
        e.add_remote_member(&id("1"));
        assert!(e.additions.is_none());
        assert_eq!(e.remote_state(), &[id("1")]);
        assert_eq!(e.local_state(), vec![id("1")]);
    }

    #[test]
    fn remote_member_changes_keep_local_membership() {
        let mut e = edge();
        e.replace_remote(set(&["1"]), true);
        e.add_remote_member(&id("2"));
        assert_eq!(e.remote_state(), &[id("1"), id("2")]);
        assert_eq!(e.removals(), vec![id("2")]);
        assert_eq!(e.local_state(), vec![id("1")]);

        e.remove_remote_member(&id("1"));
        assert_eq!(e.additions(), vec![id("1")]);
        assert_eq!(e.local_state(), vec![id("1")]);

        assert!(e.add_local(&id("2"), None));
        assert!(e.removals.is_none());
        assert_eq!(e.local_state(), vec![id("1"), id("2")]);
    }

    #[test]
    fn reset_marks_the_cache_dirty() {
        let mut e = edge();
        e.replace_remote(set(&["1", "2"]), true);
        assert!(e.is_dirty());
        assert_eq!(e.local_state(), vec![id("1"), id("2")]);
        e.flush();
        assert!(!e.is_dirty());
    }
}
