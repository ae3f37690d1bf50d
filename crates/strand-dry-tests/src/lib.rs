// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Strand crates.
//!
//! # Modules
//!
//! - [`config`](mod@config) - In-memory config store fake
//! - [`graphs`] - Graph builders over the fixture schemas
//! - [`ids`] - Identifier helpers for the fixture types
//! - [`observer`] - Recording change observer
//! - [`schemas`] - Fixture schemas (app/config/group/user/pet/post/tag)
#![forbid(unsafe_code)]

pub mod config;
pub mod graphs;
pub mod ids;
pub mod observer;
pub mod schemas;

pub use config::InMemoryConfigStore;
pub use graphs::{graph, graph_with, strict_graph, GraphTestBuilder};
pub use ids::{app, config, configs, group, pet, post, tag, user};
pub use observer::RecordingObserver;
pub use schemas::{app_schema, preserving_schema};
