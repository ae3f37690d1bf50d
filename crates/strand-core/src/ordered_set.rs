// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Insertion-ordered, duplicate-free set.
use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Sequence with set membership: order array plus membership index.
///
/// Removal is `O(n)` in the length of the sequence; relationship collections
/// are small enough that this beats maintaining a positional index.
#[derive(Clone, Debug)]
pub struct OrderedSet<T: Eq + Hash + Clone> {
    order: Vec<T>,
    members: FxHashSet<T>,
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: FxHashSet::default(),
        }
    }
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Membership test.
    pub fn contains(&self, value: &T) -> bool {
        self.members.contains(value)
    }

    /// Appends `value`; returns `false` if it was already present.
    pub fn push(&mut self, value: T) -> bool {
        if !self.members.insert(value.clone()) {
            return false;
        }
        self.order.push(value);
        true
    }

    /// Removes `value`; returns `false` if it was absent.
    pub fn remove(&mut self, value: &T) -> bool {
        if !self.members.remove(value) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|v| v == value) {
            self.order.remove(pos);
        }
        true
    }

    /// Members in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.order.iter()
    }

    /// Members in order, as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.order
    }

    /// Copies the members into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.order.clone()
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    /// Keeps the first occurrence of each value.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.push(value);
        }
        set
    }
}

impl<'a, T: Eq + Hash + Clone> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Eq + Hash + Clone> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl<T: Eq + Hash + Clone> Eq for OrderedSet<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_iter_keeps_first_occurrence() {
        let set: OrderedSet<u8> = [3, 1, 3, 2, 1].into_iter().collect();
        assert_eq!(set.as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut set: OrderedSet<u8> = [1, 2, 3, 4].into_iter().collect();
        assert!(set.remove(&2));
        assert!(!set.remove(&2));
        assert_eq!(set.as_slice(), &[1, 3, 4]);
        assert!(set.push(2));
        assert_eq!(set.as_slice(), &[1, 3, 4, 2]);
    }
}
