// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Scope (transaction) identifier types.

/// Identifier of an open processing scope.
///
/// The graph issues monotonically increasing identifiers via
/// [`crate::Graph::begin`]. Every mutation names the scope it belongs to and
/// change notifications are held until the outermost scope commits.
///
/// # Invariants
/// - Zero (`TxId(0)`) is reserved as invalid. [`crate::Graph::begin`] never
///   returns zero; on wrap-around the counter resumes at `1`.
/// - A `TxId` is live from `begin` until its `commit`. Any use afterwards
///   returns [`crate::GraphError::UnknownTx`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct TxId(u64);

impl TxId {
    /// Constructs a `TxId` from a raw `u64` value.
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

impl core::fmt::Display for TxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
