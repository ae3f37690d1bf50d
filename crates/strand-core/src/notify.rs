// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Coalesced change notifications.
//!
//! Operations record the `(identifier, field)` pairs whose observable local
//! state changed. The set is keyed, not appended, so repeated changes inside
//! one scope produce a single entry, and it iterates in canonical order
//! regardless of the order in which operations were applied. The graph hands
//! the set to its [`ChangeObserver`] when the outermost scope commits.
use std::collections::BTreeSet;

use crate::ident::{FieldKey, Identifier};

/// Pairs whose local state changed during a scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: BTreeSet<(Identifier, FieldKey)>,
}

impl ChangeSet {
    pub(crate) fn insert(&mut self, identifier: Identifier, field: FieldKey) {
        self.entries.insert((identifier, field));
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `(identifier, field)` changed.
    pub fn contains(&self, identifier: &Identifier, field: &str) -> bool {
        self.entries.contains(&(identifier.clone(), FieldKey::from(field)))
    }

    /// Changed pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &(Identifier, FieldKey)> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a (Identifier, FieldKey);
    type IntoIter = std::collections::btree_set::Iter<'a, (Identifier, FieldKey)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Presentation-layer hook.
///
/// Called once per changed `(identifier, field)` after the outermost scope
/// commits. Observers read state back through the graph; they never receive
/// edge internals.
pub trait ChangeObserver {
    /// `field` on `identifier` has new observable local state.
    fn relationship_changed(&mut self, identifier: &Identifier, field: &FieldKey);
}
