// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph: the sole owner of edge state and the entry point for operations.
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::GraphConfig;
use crate::definition::{DefinitionCache, RelationshipDefinition, SchemaError};
use crate::edge::Edge;
use crate::ident::{FieldKey, Identifier, TypeName};
use crate::notify::{ChangeObserver, ChangeSet};
use crate::operation::Operation;
use crate::payload::RelationshipPayload;
use crate::schema::SchemaSource;
use crate::tx::TxId;
use crate::{ops, unload};

/// Errors returned by graph operations.
///
/// Every error is raised before any state is mutated; a failed operation
/// leaves the graph exactly as it was.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The supplied scope identifier did not exist or was already committed.
    #[error("scope not active: {0}")]
    UnknownTx(TxId),
    /// `commit` was called while no scope was open.
    #[error("no scope is open")]
    NoActiveScope,
    /// Scopes must be committed innermost-first.
    #[error("scope {found} committed while {expected} is still open")]
    OutOfOrderCommit {
        /// Innermost live scope.
        expected: TxId,
        /// Scope passed to `commit`.
        found: TxId,
    },
    /// A collection payload listed the same identifier twice under the
    /// strict duplicate policy.
    #[error("`{ty}.{field}` received duplicate entry {identifier}")]
    DuplicateRelationshipEntry {
        /// Owning type.
        ty: TypeName,
        /// Relationship field.
        field: FieldKey,
        /// First repeated identifier.
        identifier: Identifier,
    },
    /// The operation does not fit the relationship's cardinality.
    #[error("`{op}` cannot be applied to `{ty}.{field}`")]
    CardinalityMismatch {
        /// Operation name.
        op: &'static str,
        /// Owning type.
        ty: TypeName,
        /// Relationship field.
        field: FieldKey,
    },
    /// The operation was submitted through the wrong entry point.
    #[error("`{op}` is not handled by `{via}`")]
    UnhandledOperation {
        /// Operation name.
        op: &'static str,
        /// Entry point that rejected it (`push` or `update`).
        via: &'static str,
    },
    /// Schema resolution failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Internal bookkeeping is inconsistent.
    #[error("internal corruption: {0}")]
    InternalCorruption(&'static str),
}

/// Relationship graph for one store.
///
/// Edges are stored flat, keyed by `(identifier, field)`; the reciprocal edge
/// of any edge is found by a second lookup through the same map. All
/// mutation happens inside a scope opened with [`Graph::begin`]; change
/// notifications are coalesced per `(identifier, field)` and delivered when
/// the outermost scope commits.
pub struct Graph {
    pub(crate) config: GraphConfig,
    schema: Arc<dyn SchemaSource + Send + Sync>,
    definitions: DefinitionCache,
    pub(crate) identifiers: BTreeMap<Identifier, BTreeMap<FieldKey, Edge>>,
    pub(crate) deleted: BTreeSet<Identifier>,
    tx_counter: u64,
    live_txs: Vec<TxId>,
    pending: ChangeSet,
    observer: Option<Box<dyn ChangeObserver + Send>>,
}

impl core::fmt::Debug for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graph")
            .field("config", &self.config)
            .field("identifiers", &self.identifiers.len())
            .field("deleted", &self.deleted.len())
            .field("live_txs", &self.live_txs)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Constructs an empty graph over `schema` with the default configuration.
    pub fn new(schema: Arc<dyn SchemaSource + Send + Sync>) -> Self {
        Self::with_config(schema, GraphConfig::default())
    }

    /// Constructs an empty graph with an explicit configuration.
    pub fn with_config(schema: Arc<dyn SchemaSource + Send + Sync>, config: GraphConfig) -> Self {
        Self {
            config,
            schema,
            definitions: DefinitionCache::default(),
            identifiers: BTreeMap::new(),
            deleted: BTreeSet::new(),
            tx_counter: 0,
            live_txs: Vec::new(),
            pending: ChangeSet::default(),
            observer: None,
        }
    }

    /// Installs the observer notified on every outermost commit.
    pub fn set_observer(&mut self, observer: Box<dyn ChangeObserver + Send>) {
        self.observer = Some(observer);
    }

    /// Active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Opens a scope and returns its identifier.
    ///
    /// Scopes nest; notifications are held until the outermost one commits.
    #[instrument(level = "debug", skip(self))]
    pub fn begin(&mut self) -> TxId {
        self.tx_counter = self.tx_counter.wrapping_add(1);
        if self.tx_counter == 0 {
            self.tx_counter = 1;
        }
        let tx = TxId::from_raw(self.tx_counter);
        self.live_txs.push(tx);
        tx
    }

    /// Closes the innermost scope.
    ///
    /// When `tx` was the outermost scope, the coalesced change set is handed
    /// to the observer and returned. Inner commits return an empty set.
    ///
    /// # Errors
    /// - [`GraphError::NoActiveScope`] if no scope is open.
    /// - [`GraphError::UnknownTx`] if `tx` is not live.
    /// - [`GraphError::OutOfOrderCommit`] if `tx` is live but not innermost.
    #[instrument(level = "debug", skip(self))]
    pub fn commit(&mut self, tx: TxId) -> Result<ChangeSet, GraphError> {
        let Some(&innermost) = self.live_txs.last() else {
            return Err(GraphError::NoActiveScope);
        };
        if innermost != tx {
            if self.live_txs.contains(&tx) {
                return Err(GraphError::OutOfOrderCommit {
                    expected: innermost,
                    found: tx,
                });
            }
            return Err(GraphError::UnknownTx(tx));
        }
        self.live_txs.pop();
        if !self.live_txs.is_empty() {
            return Ok(ChangeSet::default());
        }
        let changes = std::mem::take(&mut self.pending);
        debug!(changed = changes.len(), "flushing notifications");
        if let Some(observer) = self.observer.as_mut() {
            for (identifier, field) in &changes {
                observer.relationship_changed(identifier, field);
            }
        }
        Ok(changes)
    }

    /// Runs `f` inside a fresh scope and commits it, even when `f` fails.
    ///
    /// # Errors
    /// Returns the error of `f`, or the commit error if `f` succeeded.
    pub fn transact<R>(
        &mut self,
        f: impl FnOnce(&mut Self, TxId) -> Result<R, GraphError>,
    ) -> Result<R, GraphError> {
        let tx = self.begin();
        let result = f(self, tx);
        let committed = self.commit(tx);
        let value = result?;
        committed?;
        Ok(value)
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.live_txs.len()
    }

    fn ensure_live(&self, tx: TxId) -> Result<(), GraphError> {
        if tx.value() == 0 || !self.live_txs.contains(&tx) {
            return Err(GraphError::UnknownTx(tx));
        }
        Ok(())
    }

    /// Applies a remote operation (`updateRelationship`, `deleteRecord`).
    ///
    /// # Errors
    /// [`GraphError::UnknownTx`] for a dead scope,
    /// [`GraphError::UnhandledOperation`] for local operations, and any
    /// validation error of the operation itself.
    #[instrument(level = "trace", skip(self, op), fields(op = op.name(), record = %op.record()))]
    pub fn push(&mut self, tx: TxId, op: Operation) -> Result<(), GraphError> {
        self.ensure_live(tx)?;
        if !op.is_remote() {
            return Err(GraphError::UnhandledOperation {
                op: op.name(),
                via: "push",
            });
        }
        ops::apply(self, op)
    }

    /// Applies a local operation (`replaceRelatedRecord[s]`,
    /// `addToRelatedRecords`, `removeFromRelatedRecords`).
    ///
    /// # Errors
    /// [`GraphError::UnknownTx`] for a dead scope,
    /// [`GraphError::UnhandledOperation`] for remote operations, and any
    /// validation error of the operation itself.
    #[instrument(level = "trace", skip(self, op), fields(op = op.name(), record = %op.record()))]
    pub fn update(&mut self, tx: TxId, op: Operation) -> Result<(), GraphError> {
        self.ensure_live(tx)?;
        if op.is_remote() {
            return Err(GraphError::UnhandledOperation {
                op: op.name(),
                via: "update",
            });
        }
        ops::apply(self, op)
    }

    /// Removes every edge of `identifier` and severs all references to it.
    ///
    /// Unloading an identifier the graph does not know is a no-op.
    ///
    /// # Errors
    /// [`GraphError::UnknownTx`] for a dead scope.
    #[instrument(level = "debug", skip(self), fields(identifier = %identifier))]
    pub fn unload(&mut self, tx: TxId, identifier: &Identifier) -> Result<(), GraphError> {
        self.ensure_live(tx)?;
        unload::unload(self, identifier);
        Ok(())
    }

    /// Returns the edge for `(identifier, field)`, constructing it (and
    /// resolving its inverse definition) on first access.
    ///
    /// # Errors
    /// [`GraphError::Schema`] when `field` is not a declared relationship of
    /// the identifier's type or its inverse is malformed.
    pub fn get(&mut self, identifier: &Identifier, field: &str) -> Result<&Edge, GraphError> {
        let def = self.definition(identifier.ty(), field)?;
        if !def.is_polymorphic {
            self.inverse_definition(&def, &def.related_type)?;
        }
        let edge = self.edge_mut(identifier, &def);
        edge.flush();
        Ok(edge)
    }

    /// Local state of `(identifier, field)` as a payload.
    ///
    /// # Errors
    /// Same as [`Graph::get`].
    pub fn get_data(
        &mut self,
        identifier: &Identifier,
        field: &str,
    ) -> Result<RelationshipPayload, GraphError> {
        self.get(identifier, field).map(Edge::get_data)
    }

    /// True when an edge exists for `(identifier, field)`; never constructs one.
    pub fn has(&self, identifier: &Identifier, field: &str) -> bool {
        self.identifiers
            .get(identifier)
            .is_some_and(|edges| edges.contains_key(field))
    }

    /// Existing edge for `(identifier, field)`, if any; never constructs one.
    pub fn peek(&self, identifier: &Identifier, field: &str) -> Option<&Edge> {
        self.identifiers
            .get(identifier)
            .and_then(|edges| edges.get(field))
    }

    /// True when `identifier` was deleted and not yet unloaded.
    pub fn is_deleted(&self, identifier: &Identifier) -> bool {
        self.deleted.contains(identifier)
    }

    /// Every edge owned by `identifier`, implicit ones included, by field.
    pub fn edges_for<'a>(&'a self, identifier: &Identifier) -> impl Iterator<Item = &'a Edge> {
        self.identifiers
            .get(identifier)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    /// Identifiers owning at least one edge, in canonical order.
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.identifiers.keys()
    }

    /// Resolves the declared definition of `ty.field`.
    ///
    /// Synthesized implicit fields are not addressable from outside the graph.
    pub(crate) fn definition(
        &mut self,
        ty: &str,
        field: &str,
    ) -> Result<Arc<RelationshipDefinition>, GraphError> {
        let def = self.definitions.resolve(self.schema.as_ref(), ty, field)?;
        if def.is_implicit() {
            return Err(SchemaError::UnknownRelationship {
                ty: ty.into(),
                field: field.into(),
            }
            .into());
        }
        Ok(def)
    }

    pub(crate) fn inverse_definition(
        &mut self,
        def: &RelationshipDefinition,
        related_type: &str,
    ) -> Result<Arc<RelationshipDefinition>, GraphError> {
        Ok(self
            .definitions
            .inverse_of(self.schema.as_ref(), def, related_type)?)
    }

    /// Edge for `(identifier, def.field)`, created empty when missing.
    pub(crate) fn edge_mut(
        &mut self,
        identifier: &Identifier,
        def: &Arc<RelationshipDefinition>,
    ) -> &mut Edge {
        self.identifiers
            .entry(identifier.clone())
            .or_default()
            .entry(def.field.clone())
            .or_insert_with(|| Edge::new(Arc::clone(def), identifier.clone()))
    }

    /// Existing edge for `(identifier, field)`.
    pub(crate) fn existing_edge_mut(
        &mut self,
        identifier: &Identifier,
        field: &str,
    ) -> Option<&mut Edge> {
        self.identifiers
            .get_mut(identifier)
            .and_then(|edges| edges.get_mut(field))
    }

    /// Schedules a change notification; implicit edges are never observed.
    pub(crate) fn notify(&mut self, identifier: &Identifier, def: &RelationshipDefinition) {
        if def.is_implicit() {
            return;
        }
        self.pending.insert(identifier.clone(), def.field.clone());
    }
}
