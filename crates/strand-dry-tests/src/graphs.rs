// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph builders over the fixture schemas.
use std::sync::Arc;

use strand_core::{
    Graph, GraphConfig, GraphError, Identifier, Operation, RelationshipPayload, Schema,
};

use crate::observer::RecordingObserver;
use crate::schemas::app_schema;

/// Graph over [`app_schema`] with the default configuration.
pub fn graph() -> Graph {
    graph_with(app_schema(), GraphConfig::default())
}

/// Graph over [`app_schema`] rejecting duplicate entries.
pub fn strict_graph() -> Graph {
    graph_with(app_schema(), GraphConfig::strict())
}

/// Graph over `schema` with `config`.
pub fn graph_with(schema: Schema, config: GraphConfig) -> Graph {
    Graph::with_config(Arc::new(schema), config)
}

/// Builder for graphs seeded with canonical state.
///
/// ```
/// use strand_dry_tests::{app, configs, GraphTestBuilder};
///
/// let (mut graph, observer) = GraphTestBuilder::new()
///     .has_many(&app("1"), "configs", &configs(&["1", "2"]))
///     .build_observed()
///     .unwrap();
/// assert_eq!(graph.get_data(&app("1"), "configs").unwrap().collection_data().len(), 2);
/// assert!(observer.is_empty());
/// ```
#[derive(Debug)]
pub struct GraphTestBuilder {
    schema: Schema,
    config: GraphConfig,
    pushes: Vec<Operation>,
}

impl Default for GraphTestBuilder {
    fn default() -> Self {
        Self {
            schema: app_schema(),
            config: GraphConfig::default(),
            pushes: Vec::new(),
        }
    }
}

impl GraphTestBuilder {
    /// Builder over [`app_schema`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the schema.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Replaces the configuration.
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds canonical `hasMany` linkage.
    pub fn has_many(mut self, record: &Identifier, field: &str, values: &[Identifier]) -> Self {
        self.pushes.push(Operation::update_relationship(
            record,
            field,
            RelationshipPayload::collection(values.iter().cloned()),
        ));
        self
    }

    /// Seeds canonical `belongsTo` linkage.
    pub fn belongs_to(mut self, record: &Identifier, field: &str, value: Option<&Identifier>) -> Self {
        self.pushes.push(Operation::update_relationship(
            record,
            field,
            RelationshipPayload::single(value.cloned()),
        ));
        self
    }

    /// Builds the graph and applies the seeded state in one scope.
    ///
    /// # Errors
    /// Any error raised while applying the seeded state.
    pub fn build(self) -> Result<Graph, GraphError> {
        let mut graph = graph_with(self.schema, self.config);
        let pushes = self.pushes;
        graph.transact(|g, tx| pushes.into_iter().try_for_each(|op| g.push(tx, op)))?;
        Ok(graph)
    }

    /// Like [`GraphTestBuilder::build`], then installs a fresh
    /// [`RecordingObserver`] so seeding notifications are not recorded.
    ///
    /// # Errors
    /// Any error raised while applying the seeded state.
    pub fn build_observed(self) -> Result<(Graph, RecordingObserver), GraphError> {
        let mut graph = self.build()?;
        let observer = RecordingObserver::new();
        graph.set_observer(Box::new(observer.clone()));
        Ok((graph, observer))
    }
}
