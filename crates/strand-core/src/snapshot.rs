// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Canonical digest of graph state.
//!
//! Determinism contract
//! - Identifiers are visited in ascending order (`BTreeMap`), and each
//!   identifier's edges in ascending field order.
//! - Empty edges are skipped, so a graph that lazily constructed an edge and
//!   one that never did hash the same.
//! - Collection views are hashed in order; implicit members are sorted first,
//!   since their order carries no meaning.
//! - Strings are encoded as an 8-byte little-endian length followed by their
//!   UTF-8 bytes; sequences as an 8-byte little-endian count followed by
//!   their elements.
//!
//! Links, meta and load-state flags are not part of the digest.
use blake3::Hasher;

use crate::edge::Edge;
use crate::graph::Graph;
use crate::ident::{Hash, Identifier};

impl Graph {
    /// BLAKE3 digest of every non-empty edge, in canonical order.
    ///
    /// Two graphs with the same relationships in both views produce the same
    /// digest regardless of the order in which operations built them.
    pub fn snapshot_digest(&self) -> Hash {
        let mut hasher = Hasher::new();
        for (identifier, edges) in &self.identifiers {
            let live: Vec<_> = edges.iter().filter(|(_, e)| !e.is_empty()).collect();
            if live.is_empty() {
                continue;
            }
            encode_identifier(&mut hasher, identifier);
            hasher.update(&(live.len() as u64).to_le_bytes());
            for (field, edge) in live {
                encode_str(&mut hasher, field);
                encode_edge(&mut hasher, edge);
            }
        }
        hasher.finalize().into()
    }
}

fn encode_str(hasher: &mut Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn encode_identifier(hasher: &mut Hasher, identifier: &Identifier) {
    encode_str(hasher, identifier.ty());
    encode_str(hasher, identifier.lid());
}

fn encode_list(hasher: &mut Hasher, values: &[Identifier]) {
    hasher.update(&(values.len() as u64).to_le_bytes());
    for value in values {
        encode_identifier(hasher, value);
    }
}

fn encode_edge(hasher: &mut Hasher, edge: &Edge) {
    let tag: u8 = match edge {
        Edge::Single(_) => 0,
        Edge::Collection(_) => 1,
        Edge::Implicit(_) => 2,
    };
    let mut remote = edge.remote_identifiers();
    let mut local = edge.local_identifiers();
    if matches!(edge, Edge::Implicit(_)) {
        remote.sort();
        local.sort();
    }
    hasher.update(&[tag]);
    encode_list(hasher, &remote);
    encode_list(hasher, &local);
}
