// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use strand_core::{Edge, Graph, Operation, RelationshipPayload};
use strand_dry_tests::{app, config, configs, preserving_schema, GraphTestBuilder};

fn diverged(preserve: bool) -> Graph {
    let mut builder = GraphTestBuilder::new().has_many(&app("1"), "configs", &configs(&["1", "2"]));
    if preserve {
        builder = builder.schema(preserving_schema());
    }
    let mut g = builder.build().unwrap();
    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::add_to_related_records(&app("1"), "configs", &config("3"), None),
        )?;
        g.update(
            tx,
            Operation::remove_from_related_records(&app("1"), "configs", &config("1"), None),
        )
    })
    .unwrap();
    g
}

fn push_configs(g: &mut Graph, ids: &[&str]) {
    g.transact(|g, tx| {
        g.push(
            tx,
            Operation::update_relationship(
                &app("1"),
                "configs",
                RelationshipPayload::collection(configs(ids)),
            ),
        )
    })
    .unwrap();
}

#[test]
fn repeated_remote_state_keeps_local_divergence() {
    let mut g = diverged(true);
    push_configs(&mut g, &["1", "2"]);

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["2", "3"]).as_slice());
    assert_eq!(g.get_data(&config("1"), "app").unwrap().single_data(), None);
    let remote = g.get(&config("1"), "app").unwrap().get_remote_data();
    assert_eq!(remote.single_data(), Some(&app("1")));
    assert_eq!(g.get_data(&config("3"), "app").unwrap().single_data(), Some(&app("1")));
}

#[test]
fn local_additions_follow_new_remote_members() {
    let mut g = diverged(true);
    push_configs(&mut g, &["1", "2", "5"]);

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["2", "5", "3"]).as_slice());
    assert_eq!(g.get_data(&config("5"), "app").unwrap().single_data(), Some(&app("1")));
}

#[test]
fn local_diff_is_reapplied_on_a_reordered_remote_state() {
    let mut g = diverged(true);
    push_configs(&mut g, &["2", "4", "1"]);

    let edge = g.get(&app("1"), "configs").unwrap();
    assert_eq!(edge.remote_identifiers(), configs(&["2", "4", "1"]));
    assert_eq!(edge.local_identifiers(), configs(&["2", "4", "3"]));
    assert_eq!(g.get_data(&config("1"), "app").unwrap().single_data(), None);
    assert_eq!(g.get_data(&config("4"), "app").unwrap().single_data(), Some(&app("1")));
}

#[test]
fn server_removal_of_a_locally_removed_member_drops_the_removal() {
    let mut g = diverged(true);
    push_configs(&mut g, &["2"]);

    let Edge::Collection(edge) = g.get(&app("1"), "configs").unwrap() else {
        panic!("configs should be a collection edge");
    };
    assert!(edge.removals().is_empty());
    assert_eq!(edge.additions(), configs(&["3"]));
    assert_eq!(edge.local_state(), configs(&["2", "3"]));
    let one = g.get(&config("1"), "app").unwrap();
    assert_eq!(one.get_remote_data().single_data(), None);
    assert_eq!(one.get_data().single_data(), None);
}

#[test]
fn undiverged_preserving_edge_takes_the_server_order() {
    let (mut g, observer) = GraphTestBuilder::new()
        .schema(preserving_schema())
        .has_many(&app("1"), "configs", &configs(&["1", "2", "3"]))
        .build_observed()
        .unwrap();
    observer.clear();
    push_configs(&mut g, &["3", "2", "1"]);

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data, RelationshipPayload::collection(configs(&["3", "2", "1"])));
    assert_eq!(observer.count(&app("1"), "configs"), 1);
}

#[test]
fn resetting_relationship_discards_local_divergence() {
    let mut g = diverged(false);
    push_configs(&mut g, &["1", "2"]);

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["1", "2"]).as_slice());
    assert_eq!(g.get_data(&config("1"), "app").unwrap().single_data(), Some(&app("1")));
    assert_eq!(g.get_data(&config("3"), "app").unwrap().single_data(), None);
}

#[test]
fn preserving_belongs_to_keeps_its_local_value() {
    let mut g = GraphTestBuilder::new()
        .schema(preserving_schema())
        .belongs_to(&config("1"), "app", Some(&app("1")))
        .build()
        .unwrap();
    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::replace_related_record(&config("1"), "app", Some(&app("2"))),
        )
    })
    .unwrap();

    let push = |g: &mut Graph, target: &str| {
        g.transact(|g, tx| {
            g.push(
                tx,
                Operation::update_relationship(
                    &config("1"),
                    "app",
                    RelationshipPayload::single(Some(app(target))),
                ),
            )
        })
        .unwrap();
    };

    push(&mut g, "1");
    assert_eq!(g.get_data(&config("1"), "app").unwrap().single_data(), Some(&app("2")));

    push(&mut g, "3");
    let edge = g.get(&config("1"), "app").unwrap();
    assert_eq!(edge.get_remote_data().single_data(), Some(&app("3")));
    assert_eq!(edge.get_data().single_data(), Some(&app("2")));

    let three = g.get(&app("3"), "configs").unwrap();
    assert_eq!(three.remote_identifiers(), configs(&["1"]));
    assert!(three.local_identifiers().is_empty());
    let two = g.get(&app("2"), "configs").unwrap();
    assert_eq!(two.local_identifiers(), configs(&["1"]));
    assert!(two.remote_identifiers().is_empty());
}
