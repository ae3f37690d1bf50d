// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixture schemas.
//!
//! | type   | field         | kind    | related | inverse        |
//! |--------|---------------|---------|---------|----------------|
//! | app    | `configs`     | many    | config  | `app`          |
//! | app    | `groups`      | many    | group   | `app`          |
//! | app    | `owner`       | one     | user    | implicit       |
//! | app    | `tags`        | many    | tag     | none (implicit)|
//! | config | `app`         | one     | app     | `configs`      |
//! | group  | `app`         | one     | app     | `groups`       |
//! | user   | `pets`        | many    | pet     | `owner`        |
//! | user   | `posts`       | many    | post    | `author`       |
//! | user   | `friends`     | many    | user    | `friends`      |
//! | user   | `best_friend` | one     | user    | `best_friend`  |
//! | pet    | `owner`       | one     | user    | `pets`         |
//! | post   | `author`      | one     | user    | `posts`        |
//! | post   | `subject`     | one     | any     | none, polymorphic, async |
use strand_core::{RelationshipSchema, Schema};

fn declare(configs: RelationshipSchema) -> Schema {
    Schema::new()
        .with("app", configs)
        .with("app", RelationshipSchema::has_many("groups", "group"))
        .with("app", RelationshipSchema::belongs_to("owner", "user"))
        .with("app", RelationshipSchema::has_many("tags", "tag").no_inverse())
        .with("config", RelationshipSchema::belongs_to("app", "app"))
        .with("group", RelationshipSchema::belongs_to("app", "app"))
        .with("user", RelationshipSchema::has_many("pets", "pet"))
        .with("user", RelationshipSchema::has_many("posts", "post"))
        .with(
            "user",
            RelationshipSchema::has_many("friends", "user").inverse("friends"),
        )
        .with(
            "user",
            RelationshipSchema::belongs_to("best_friend", "user").inverse("best_friend"),
        )
        .with("pet", RelationshipSchema::belongs_to("owner", "user"))
        .with("post", RelationshipSchema::belongs_to("author", "user"))
        .with(
            "post",
            RelationshipSchema::belongs_to("subject", "app")
                .no_inverse()
                .polymorphic()
                .is_async(),
        )
        .with_type("tag")
}

/// The fixture schema; every relationship resets on remote updates.
pub fn app_schema() -> Schema {
    declare(RelationshipSchema::has_many("configs", "config"))
}

/// The fixture schema with `app.configs` (and therefore `config.app`)
/// preserving local divergence across remote updates.
pub fn preserving_schema() -> Schema {
    declare(RelationshipSchema::has_many("configs", "config").preserve_local_on_remote_update())
}
