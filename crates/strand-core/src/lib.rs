// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! strand-core: client-side relationship graph.
//!
//! The graph stores every `belongsTo`/`hasMany` edge between resources,
//! keeping a remote (server-confirmed) and a local (observed) view of each.
//! Remote operations arrive through [`Graph::push`], local ones through
//! [`Graph::update`]; both keep reciprocal edges symmetric and both run
//! inside a scope opened with [`Graph::begin`], whose change notifications
//! are coalesced and delivered on the outermost commit.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod config;
mod definition;
mod edge;
mod graph;
mod ident;
mod notify;
mod operation;
mod ops;
mod ordered_set;
mod payload;
mod registry;
mod schema;
mod snapshot;
mod tx;
mod unload;

/// Graph configuration and its storage port.
pub use config::{
    load_graph_config, save_graph_config, ConfigError, ConfigStore, DuplicatePolicy, GraphConfig,
    GRAPH_CONFIG_KEY,
};
/// Resolved relationship definitions.
pub use definition::{implicit_key, DefinitionCache, EdgeKind, RelationshipDefinition, SchemaError};
/// Edge storage and read views.
pub use edge::{CollectionEdge, Edge, EdgeState, ImplicitEdge, SingleEdge};
/// The graph and its error type.
pub use graph::{Graph, GraphError};
/// Identifier and naming primitives.
pub use ident::{FieldKey, Hash, Identifier, TypeName};
/// Change notification plumbing.
pub use notify::{ChangeObserver, ChangeSet};
/// Operations accepted by the graph.
pub use operation::Operation;
/// Insertion-ordered, duplicate-free set.
pub use ordered_set::OrderedSet;
/// Relationship payloads.
pub use payload::{Links, RelationshipData, RelationshipPayload};
/// Store-to-graph association.
pub use registry::{GraphRegistry, StoreId};
/// Declared schema and the lookup port the graph consumes.
pub use schema::{Cardinality, InverseSpec, RelationshipSchema, Schema, SchemaSource};
/// Scope identifiers.
pub use tx::TxId;
