// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording change observer.
use std::sync::{Arc, Mutex};

use strand_core::{ChangeObserver, FieldKey, Identifier};

/// [`ChangeObserver`] that records every notification it receives.
///
/// Clones share the same log, so a test keeps one clone and hands the other
/// to the graph.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    log: Arc<Mutex<Vec<(Identifier, FieldKey)>>>,
}

impl RecordingObserver {
    /// Creates an observer with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification received so far, in delivery order.
    pub fn events(&self) -> Vec<(Identifier, FieldKey)> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of notifications for `(identifier, field)`.
    pub fn count(&self, identifier: &Identifier, field: &str) -> usize {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(id, f)| id == identifier && &**f == field)
            .count()
    }

    /// Total number of notifications.
    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True when nothing was notified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl ChangeObserver for RecordingObserver {
    fn relationship_changed(&mut self, identifier: &Identifier, field: &FieldKey) {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((identifier.clone(), field.clone()));
    }
}
