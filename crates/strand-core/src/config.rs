// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-graph configuration and the storage port it is loaded from.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How collection payloads containing the same identifier twice are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence of each identifier and log the rest.
    #[default]
    Dedupe,
    /// Reject the operation with `DuplicateRelationshipEntry`.
    Strict,
}

/// Graph configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Duplicate-entry policy for `updateRelationship` and
    /// `replaceRelatedRecords` payloads.
    pub duplicates: DuplicatePolicy,
}

impl GraphConfig {
    /// Configuration rejecting duplicate entries.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Strict,
        }
    }

    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// [`ConfigError::Serde`] when the document is malformed.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Storage port for raw config blobs, keyed by logical name.
pub trait ConfigStore {
    /// Loads a raw blob. Returns [`ConfigError::NotFound`] when missing.
    ///
    /// # Errors
    /// Implementation-defined storage failures.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persists a raw blob.
    ///
    /// # Errors
    /// Implementation-defined storage failures.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key under which graph configuration is stored.
pub const GRAPH_CONFIG_KEY: &str = "strand.graph";

/// Loads the graph configuration from `store`, falling back to the default
/// when the key is missing or empty.
///
/// # Errors
/// Storage failures other than `NotFound`, and malformed documents.
pub fn load_graph_config(store: &impl ConfigStore) -> Result<GraphConfig, ConfigError> {
    match store.load_raw(GRAPH_CONFIG_KEY) {
        Ok(bytes) if bytes.is_empty() => Ok(GraphConfig::default()),
        Ok(bytes) => GraphConfig::from_json(&bytes),
        Err(ConfigError::NotFound) => Ok(GraphConfig::default()),
        Err(e) => Err(e),
    }
}

/// Serializes and persists `config` into `store`.
///
/// # Errors
/// Storage failures.
pub fn save_graph_config(store: &impl ConfigStore, config: &GraphConfig) -> Result<(), ConfigError> {
    let data = serde_json::to_vec_pretty(config)?;
    store.save_raw(GRAPH_CONFIG_KEY, &data)
}
