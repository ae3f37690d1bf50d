// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use strand_core::{implicit_key, Graph, Hash, Identifier, Operation, RelationshipPayload};
use strand_dry_tests::{app, config, configs, pet, user, GraphTestBuilder, RecordingObserver};

fn users(ids: &[&str]) -> Vec<Identifier> {
    ids.iter().map(|id| user(id)).collect()
}

/// Users 1-3 are mutual friends; pets and an app point at them.
fn mesh() -> Graph {
    GraphTestBuilder::new()
        .has_many(&user("1"), "friends", &users(&["2", "3"]))
        .has_many(&user("2"), "friends", &users(&["1", "3"]))
        .has_many(&user("3"), "friends", &users(&["1", "2"]))
        .belongs_to(&user("1"), "best_friend", Some(&user("2")))
        .belongs_to(&pet("1"), "owner", Some(&user("1")))
        .belongs_to(&pet("2"), "owner", Some(&user("2")))
        .belongs_to(&app("1"), "owner", Some(&user("1")))
        .has_many(&app("1"), "configs", &configs(&["1", "2"]))
        .build()
        .unwrap()
}

fn permutations(items: &[Identifier]) -> Vec<Vec<Identifier>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

fn assert_absent(g: &Graph, gone: &[Identifier]) {
    for id in gone {
        assert_eq!(g.edges_for(id).count(), 0, "{id} still owns edges");
    }
    for owner in g.identifiers() {
        for edge in g.edges_for(owner) {
            for id in gone {
                assert!(
                    !edge.local_identifiers().contains(id) && !edge.remote_identifiers().contains(id),
                    "{owner} still references {id}"
                );
            }
        }
    }
}

fn unload_together(order: &[Identifier]) -> Hash {
    let mut g = mesh();
    for _ in 0..2 {
        g.transact(|g, tx| order.iter().try_for_each(|id| g.unload(tx, id)))
            .unwrap();
    }
    assert_absent(&g, order);
    g.snapshot_digest()
}

fn unload_across_scopes(order: &[Identifier]) -> Hash {
    let mut g = mesh();
    for _ in 0..2 {
        for id in order {
            g.transact(|g, tx| g.unload(tx, id)).unwrap();
        }
    }
    assert_absent(&g, order);
    g.snapshot_digest()
}

#[test]
fn unload_order_does_not_matter() {
    let targets = vec![user("1"), user("2"), user("3"), pet("1")];
    let orders = permutations(&targets);
    assert_eq!(orders.len(), 24);

    let baseline = unload_together(&orders[0]);
    for order in &orders {
        assert_eq!(unload_together(order), baseline, "together: {order:?}");
        assert_eq!(unload_across_scopes(order), baseline, "across scopes: {order:?}");
    }
}

#[test]
fn unloading_one_side_clears_the_other() {
    let mut g = mesh();
    let observer = RecordingObserver::new();
    g.set_observer(Box::new(observer.clone()));
    g.transact(|g, tx| g.unload(tx, &user("1"))).unwrap();

    assert!(g.get_data(&pet("1"), "owner").unwrap().single_data().is_none());
    assert!(g.get_data(&app("1"), "owner").unwrap().single_data().is_none());
    assert!(g.get_data(&user("2"), "best_friend").unwrap().single_data().is_none());
    let friends = g.get_data(&user("2"), "friends").unwrap();
    assert_eq!(friends.collection_data(), users(&["3"]).as_slice());

    assert_eq!(observer.count(&pet("1"), "owner"), 1);
    assert_eq!(observer.count(&user("2"), "friends"), 1);
    assert_eq!(observer.count(&user("1"), "friends"), 0);
}

#[test]
fn unload_of_unknown_identifier_is_a_no_op() {
    let mut g = mesh();
    let before = g.snapshot_digest();
    g.transact(|g, tx| g.unload(tx, &user("99"))).unwrap();
    assert_eq!(g.snapshot_digest(), before);
}

#[test]
fn reading_after_unload_yields_a_fresh_edge() {
    let mut g = mesh();
    g.transact(|g, tx| g.unload(tx, &user("3"))).unwrap();

    let edge = g.get(&user("3"), "friends").unwrap();
    assert!(edge.is_empty());
    assert!(!edge.state().has_received_data);
    assert!(g.get_data(&user("3"), "friends").unwrap().collection_data().is_empty());
}

#[test]
fn unload_retains_emptied_implicit_edges() {
    let mut g = mesh();
    let key = implicit_key("app", "owner");
    g.transact(|g, tx| g.unload(tx, &app("1"))).unwrap();

    assert!(g.has(&user("1"), &key));
    assert!(g.peek(&user("1"), &key).unwrap().is_empty());
    assert!(g.get_data(&config("1"), "app").unwrap().single_data().is_none());
}

#[test]
fn records_may_relink_after_unload() {
    let mut g = mesh();
    g.transact(|g, tx| {
        g.unload(tx, &pet("1"))?;
        g.push(
            tx,
            Operation::update_relationship(
                &pet("1"),
                "owner",
                RelationshipPayload::single(Some(user("3"))),
            ),
        )
    })
    .unwrap();

    let pets = g.get_data(&user("3"), "pets").unwrap();
    assert_eq!(pets.collection_data(), [pet("1")].as_slice());
    assert!(g.get_data(&user("1"), "pets").unwrap().collection_data().is_empty());
}
