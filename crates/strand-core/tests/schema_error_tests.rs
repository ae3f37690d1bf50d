// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use strand_core::{
    implicit_key, Edge, GraphConfig, GraphError, Operation, RelationshipPayload,
    RelationshipSchema, Schema, SchemaError,
};
use strand_dry_tests::{app, config, configs, graph, graph_with, post, user};

#[test]
fn unknown_field_is_a_schema_error() {
    let mut g = graph();
    let err = g.get_data(&app("1"), "nope").unwrap_err();
    match err {
        GraphError::Schema(SchemaError::UnknownRelationship { ty, field }) => {
            assert_eq!(&*ty, "app");
            assert_eq!(&*field, "nope");
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(g.identifiers().next().is_none());
}

#[test]
fn implicit_fields_are_not_addressable() {
    let mut g = graph();
    g.transact(|g, tx| {
        g.push(
            tx,
            Operation::update_relationship(&app("1"), "owner", RelationshipPayload::single(Some(user("1")))),
        )
    })
    .unwrap();
    let key = implicit_key("app", "owner");
    assert!(g.has(&user("1"), &key));
    assert!(matches!(
        g.get(&user("1"), &key),
        Err(GraphError::Schema(SchemaError::UnknownRelationship { .. }))
    ));
}

#[test]
fn operations_must_match_the_edge_shape() {
    let mut g = graph();
    let cases = [
        (
            Operation::replace_related_record(&app("1"), "configs", Some(&config("1"))),
            "replaceRelatedRecord",
        ),
        (
            Operation::add_to_related_records(&config("1"), "app", &app("1"), None),
            "addToRelatedRecords",
        ),
        (
            Operation::remove_from_related_records(&config("1"), "app", &app("1"), None),
            "removeFromRelatedRecords",
        ),
        (
            Operation::replace_related_records(&config("1"), "app", &[app("1")]),
            "replaceRelatedRecords",
        ),
    ];
    for (op, name) in cases {
        let err = g.transact(|g, tx| g.update(tx, op)).unwrap_err();
        assert!(
            matches!(err, GraphError::CardinalityMismatch { op, .. } if op == name),
            "{name}: {err:?}"
        );
    }

    let err = g
        .transact(|g, tx| {
            g.push(
                tx,
                Operation::update_relationship(
                    &app("1"),
                    "configs",
                    RelationshipPayload::single(Some(config("1"))),
                ),
            )
        })
        .unwrap_err();
    assert!(matches!(err, GraphError::CardinalityMismatch { .. }));

    let err = g
        .transact(|g, tx| {
            g.push(
                tx,
                Operation::update_relationship(
                    &config("1"),
                    "app",
                    RelationshipPayload::collection([app("1")]),
                ),
            )
        })
        .unwrap_err();
    assert!(matches!(err, GraphError::CardinalityMismatch { .. }));
    assert!(g.identifiers().next().is_none());
}

#[test]
fn null_clears_a_collection() {
    let mut g = graph();
    g.transact(|g, tx| {
        g.push(
            tx,
            Operation::update_relationship(
                &app("1"),
                "configs",
                RelationshipPayload::collection(configs(&["1"])),
            ),
        )?;
        g.push(
            tx,
            Operation::update_relationship(&app("1"), "configs", RelationshipPayload::single(None)),
        )
    })
    .unwrap();
    assert!(g.get_data(&app("1"), "configs").unwrap().collection_data().is_empty());
    assert!(g.get_data(&config("1"), "app").unwrap().single_data().is_none());
}

#[test]
fn wrong_related_type_is_rejected_before_mutation() {
    let mut g = graph();
    let err = g
        .transact(|g, tx| {
            g.update(
                tx,
                Operation::replace_related_records(&app("1"), "configs", &[config("1"), user("1")]),
            )
        })
        .unwrap_err();
    match err {
        GraphError::Schema(SchemaError::TypeMismatch { expected, found, .. }) => {
            assert_eq!(&*expected, "config");
            assert_eq!(&*found, "user");
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(!g.has(&app("1"), "configs"));
    assert!(!g.has(&config("1"), "app"));
}

#[test]
fn polymorphic_relationships_accept_any_type() {
    let mut g = graph();
    g.transact(|g, tx| {
        g.push(
            tx,
            Operation::update_relationship(
                &post("1"),
                "subject",
                RelationshipPayload::single(Some(user("1"))),
            ),
        )?;
        g.push(
            tx,
            Operation::update_relationship(
                &post("2"),
                "subject",
                RelationshipPayload::single(Some(app("1"))),
            ),
        )
    })
    .unwrap();

    let key = implicit_key("post", "subject");
    let Some(Edge::Implicit(edge)) = g.peek(&user("1"), &key) else {
        panic!("implicit inverse missing");
    };
    assert_eq!(edge.local_members(), [post("1")].as_slice());
    assert_eq!(edge.remote_members(), [post("1")].as_slice());
    assert!(g.has(&app("1"), &key));
    assert_eq!(g.get_data(&post("1"), "subject").unwrap().single_data(), Some(&user("1")));
}

#[test]
fn ambiguous_inverse_is_reported() {
    let schema = Schema::new()
        .with("a", RelationshipSchema::has_many("bs", "b"))
        .with("b", RelationshipSchema::belongs_to("x", "a"))
        .with("b", RelationshipSchema::belongs_to("y", "a"));
    let mut g = graph_with(schema, GraphConfig::default());
    let a = strand_core::Identifier::new("a", "1");
    match g.get(&a, "bs") {
        Err(GraphError::Schema(SchemaError::AmbiguousInverse { candidates, .. })) => {
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn declared_inverse_must_exist() {
    let schema = Schema::new()
        .with("a", RelationshipSchema::has_many("bs", "b").inverse("owner"))
        .with_type("b");
    let mut g = graph_with(schema, GraphConfig::default());
    let a = strand_core::Identifier::new("a", "1");
    assert!(matches!(
        g.get(&a, "bs"),
        Err(GraphError::Schema(SchemaError::MissingInverse { .. }))
    ));
}
