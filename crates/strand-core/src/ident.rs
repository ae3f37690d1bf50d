// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier and naming primitives.
use std::fmt;
use std::sync::Arc;

/// Canonical 256-bit digest produced by graph snapshots.
pub type Hash = [u8; 32];

/// Name of a resource type (e.g. `"app"`).
pub type TypeName = Arc<str>;

/// Name of a relationship field on a resource type (e.g. `"configs"`).
pub type FieldKey = Arc<str>;

#[derive(Debug)]
struct IdentifierInner {
    ty: TypeName,
    id: Option<Arc<str>>,
    lid: Arc<str>,
}

/// Stable, opaque key for one resource.
///
/// Identifiers are minted by the identity layer; the graph only clones and
/// compares them. Two identifiers are equal when their type and `lid` match,
/// which keeps a record's identity stable across the moment its server id is
/// assigned.
///
/// Clones share storage, so handing identifiers around the graph is a
/// reference-count bump.
#[derive(Clone)]
pub struct Identifier(Arc<IdentifierInner>);

impl Identifier {
    /// Identifier for a persisted resource. The `lid` is derived as
    /// `@lid:{ty}-{id}`.
    pub fn new(ty: impl Into<TypeName>, id: impl Into<Arc<str>>) -> Self {
        let ty = ty.into();
        let id = id.into();
        let lid: Arc<str> = format!("@lid:{ty}-{id}").into();
        Self(Arc::new(IdentifierInner {
            ty,
            id: Some(id),
            lid,
        }))
    }

    /// Identifier for a resource that has no server id yet.
    pub fn local(ty: impl Into<TypeName>, lid: impl Into<Arc<str>>) -> Self {
        Self(Arc::new(IdentifierInner {
            ty: ty.into(),
            id: None,
            lid: lid.into(),
        }))
    }

    /// Resource type.
    pub fn ty(&self) -> &TypeName {
        &self.0.ty
    }

    /// Server id, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.0.id.as_deref()
    }

    /// Local id; unique per resource for the lifetime of the store.
    pub fn lid(&self) -> &str {
        &self.0.lid
    }

    /// True when the resource only exists on the client.
    pub fn is_new(&self) -> bool {
        self.0.id.is_none()
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || (self.0.ty == other.0.ty && self.0.lid == other.0.lid)
    }
}

impl Eq for Identifier {}

impl std::hash::Hash for Identifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.ty.hash(state);
        self.0.lid.hash(state);
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .ty
            .cmp(&other.0.ty)
            .then_with(|| self.0.lid.cmp(&other.0.lid))
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.id {
            Some(id) => write!(f, "{}:{}", self.0.ty, id),
            None => write!(f, "{}:{}", self.0.ty, self.0.lid),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl serde::Serialize for Identifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Identifier", 3)?;
        s.serialize_field("type", &*self.0.ty)?;
        s.serialize_field("id", &self.0.id.as_deref())?;
        s.serialize_field("lid", &*self.0.lid)?;
        s.end()
    }
}
