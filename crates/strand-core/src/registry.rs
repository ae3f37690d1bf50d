// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One graph per store.
//!
//! The registry is owned by whatever owns the stores; there is no
//! process-wide instance. A store's graph is created on first lookup, stays
//! the same object for the store's lifetime and is dropped on teardown.
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::GraphConfig;
use crate::graph::Graph;
use crate::schema::SchemaSource;

/// Handle identifying a store instance.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct StoreId(u64);

impl StoreId {
    /// Constructs a `StoreId` from a raw `u64` value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Association from store to graph.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    config: GraphConfig,
    graphs: FxHashMap<StoreId, Graph>,
}

impl GraphRegistry {
    /// Registry whose graphs use the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose graphs are created with `config`.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            graphs: FxHashMap::default(),
        }
    }

    /// The graph of `store`, created over `schema` on first use.
    ///
    /// `schema` is ignored when the graph already exists.
    pub fn graph_for(
        &mut self,
        store: StoreId,
        schema: impl FnOnce() -> Arc<dyn SchemaSource + Send + Sync>,
    ) -> &mut Graph {
        let config = &self.config;
        self.graphs.entry(store).or_insert_with(|| {
            debug!(store = store.value(), "graph created");
            Graph::with_config(schema(), config.clone())
        })
    }

    /// The graph of `store`, if one exists.
    pub fn get(&self, store: StoreId) -> Option<&Graph> {
        self.graphs.get(&store)
    }

    /// Mutable access to the graph of `store`, if one exists.
    pub fn get_mut(&mut self, store: StoreId) -> Option<&mut Graph> {
        self.graphs.get_mut(&store)
    }

    /// True when `store` has a graph.
    pub fn contains(&self, store: StoreId) -> bool {
        self.graphs.contains_key(&store)
    }

    /// Destroys the graph of `store`. Returns `true` if one existed.
    pub fn teardown(&mut self, store: StoreId) -> bool {
        let existed = self.graphs.remove(&store).is_some();
        if existed {
            debug!(store = store.value(), "graph torn down");
        }
        existed
    }

    /// Number of live graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// True when no store has a graph.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}
