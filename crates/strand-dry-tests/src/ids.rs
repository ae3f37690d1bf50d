// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier helpers for the fixture types.
use strand_core::Identifier;

/// `app:{id}`.
pub fn app(id: &str) -> Identifier {
    Identifier::new("app", id)
}

/// `config:{id}`.
pub fn config(id: &str) -> Identifier {
    Identifier::new("config", id)
}

/// `config` identifiers for each id, in order.
pub fn configs(ids: &[&str]) -> Vec<Identifier> {
    ids.iter().map(|id| config(id)).collect()
}

/// `group:{id}`.
pub fn group(id: &str) -> Identifier {
    Identifier::new("group", id)
}

/// `user:{id}`.
pub fn user(id: &str) -> Identifier {
    Identifier::new("user", id)
}

/// `pet:{id}`.
pub fn pet(id: &str) -> Identifier {
    Identifier::new("pet", id)
}

/// `post:{id}`.
pub fn post(id: &str) -> Identifier {
    Identifier::new("post", id)
}

/// `tag:{id}`.
pub fn tag(id: &str) -> Identifier {
    Identifier::new("tag", id)
}
