// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use strand_core::Operation;
use strand_dry_tests::{app, config, configs, group, GraphTestBuilder};

#[test]
fn replace_keeps_the_given_order_and_notifies_once() {
    let (mut g, observer) = GraphTestBuilder::new()
        .has_many(&app("1"), "configs", &configs(&["1", "2", "3"]))
        .build_observed()
        .unwrap();

    let tx = g.begin();
    g.update(
        tx,
        Operation::replace_related_records(&app("1"), "configs", &configs(&["3", "1", "2"])),
    )
    .unwrap();
    let changes = g.commit(tx).unwrap();

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["3", "1", "2"]).as_slice());
    // Membership did not change, so no inverse edge was touched.
    assert_eq!(changes.len(), 1);
    assert_eq!(observer.count(&app("1"), "configs"), 1);
    assert_eq!(observer.len(), 1);
}

#[test]
fn unrelated_reorder_leaves_collection_untouched() {
    let groups = [group("1"), group("2")];
    let (mut g, observer) = GraphTestBuilder::new()
        .has_many(&app("1"), "configs", &configs(&["1", "2", "3"]))
        .has_many(&app("1"), "groups", &groups)
        .build_observed()
        .unwrap();

    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::replace_related_records(&app("1"), "configs", &configs(&["3", "1", "2"])),
        )
    })
    .unwrap();
    observer.clear();

    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::replace_related_records(&app("1"), "groups", &[group("2"), group("1")]),
        )
    })
    .unwrap();

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["3", "1", "2"]).as_slice());
    assert_eq!(observer.count(&app("1"), "configs"), 0);
    assert_eq!(observer.count(&app("1"), "groups"), 1);
}

#[test]
fn add_at_index_inserts_without_disturbing_the_rest() {
    let (mut g, observer) = GraphTestBuilder::new()
        .has_many(&app("1"), "configs", &configs(&["1", "2", "3"]))
        .build_observed()
        .unwrap();

    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::add_to_related_records(&app("1"), "configs", &config("4"), Some(1)),
        )
    })
    .unwrap();

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["1", "4", "2", "3"]).as_slice());
    assert_eq!(g.get_data(&config("4"), "app").unwrap().single_data(), Some(&app("1")));
    assert_eq!(observer.count(&app("1"), "configs"), 1);
    assert_eq!(observer.count(&config("4"), "app"), 1);
}

#[test]
fn adding_an_existing_member_is_a_no_op() {
    let (mut g, observer) = GraphTestBuilder::new()
        .has_many(&app("1"), "configs", &configs(&["1", "2"]))
        .build_observed()
        .unwrap();

    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::add_to_related_records(&app("1"), "configs", &config("2"), Some(0)),
        )
    })
    .unwrap();

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["1", "2"]).as_slice());
    assert!(observer.is_empty());
}

#[test]
fn remove_takes_exactly_one_member() {
    let mut g = GraphTestBuilder::new()
        .has_many(&app("1"), "configs", &configs(&["1", "2", "3"]))
        .build()
        .unwrap();

    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::remove_from_related_records(&app("1"), "configs", &config("2"), Some(1)),
        )
    })
    .unwrap();

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["1", "3"]).as_slice());
    assert_eq!(g.get_data(&config("2"), "app").unwrap().single_data(), None);
    let remote = g.get(&config("2"), "app").unwrap().get_remote_data();
    assert_eq!(remote.single_data(), Some(&app("1")));
}

#[test]
fn stale_index_hint_falls_back_to_search() {
    let mut g = GraphTestBuilder::new()
        .has_many(&app("1"), "configs", &configs(&["1", "2", "3"]))
        .build()
        .unwrap();

    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::remove_from_related_records(&app("1"), "configs", &config("3"), Some(0)),
        )
    })
    .unwrap();

    let data = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(data.collection_data(), configs(&["1", "2"]).as_slice());
}

#[test]
fn moving_a_belongs_to_updates_both_collections() {
    let mut g = GraphTestBuilder::new()
        .has_many(&app("1"), "configs", &configs(&["1", "2"]))
        .has_many(&app("2"), "configs", &configs(&["3"]))
        .build()
        .unwrap();

    g.transact(|g, tx| {
        g.update(
            tx,
            Operation::replace_related_record(&config("1"), "app", Some(&app("2"))),
        )
    })
    .unwrap();

    let one = g.get_data(&app("1"), "configs").unwrap();
    assert_eq!(one.collection_data(), configs(&["2"]).as_slice());
    let two = g.get_data(&app("2"), "configs").unwrap();
    assert_eq!(two.collection_data(), configs(&["3", "1"]).as_slice());
}
