// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Relationship payloads exchanged with the normalizer and presentation layers.
use serde::Serialize;

use crate::ident::Identifier;

/// Linkage of a relationship: one identifier-or-null, or an ordered list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// `belongsTo` linkage; `None` is a valid terminal value.
    Single(Option<Identifier>),
    /// `hasMany` linkage, ordered and duplicate-free.
    Collection(Vec<Identifier>),
}

impl RelationshipData {
    /// The single value, if this is single linkage.
    pub fn as_single(&self) -> Option<Option<&Identifier>> {
        match self {
            Self::Single(value) => Some(value.as_ref()),
            Self::Collection(_) => None,
        }
    }

    /// The collection values, if this is collection linkage.
    pub fn as_collection(&self) -> Option<&[Identifier]> {
        match self {
            Self::Single(_) => None,
            Self::Collection(values) => Some(values),
        }
    }

    /// Every identifier referenced by this linkage.
    pub fn identifiers(&self) -> Vec<Identifier> {
        match self {
            Self::Single(value) => value.iter().cloned().collect(),
            Self::Collection(values) => values.clone(),
        }
    }
}

/// Relationship links as supplied by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Links {
    /// URL of the related resource(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
    /// URL of the relationship itself.
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Flattened relationship state: `{data, links, meta}`.
///
/// `data` is `None` when nothing is known about the linkage yet, which is
/// distinct from an empty collection or a null `belongsTo`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RelationshipPayload {
    /// Linkage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    /// Links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Opaque server metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl RelationshipPayload {
    /// Payload carrying single linkage.
    pub fn single(value: Option<Identifier>) -> Self {
        Self {
            data: Some(RelationshipData::Single(value)),
            ..Self::default()
        }
    }

    /// Payload carrying collection linkage.
    pub fn collection(values: impl IntoIterator<Item = Identifier>) -> Self {
        Self {
            data: Some(RelationshipData::Collection(values.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Adds links to the payload.
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }

    /// Adds meta to the payload.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Collection linkage, or an empty slice.
    pub fn collection_data(&self) -> &[Identifier] {
        self.data
            .as_ref()
            .and_then(RelationshipData::as_collection)
            .unwrap_or_default()
    }

    /// Single linkage, or `None`.
    pub fn single_data(&self) -> Option<&Identifier> {
        self.data
            .as_ref()
            .and_then(RelationshipData::as_single)
            .flatten()
    }
}
