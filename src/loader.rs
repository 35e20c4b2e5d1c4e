use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use super::entities::{GraphKind, OntologyGraph};
use super::value_objects::GraphIri;

/// Summary row for listing graphs without loading the full aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphSummary {
    /// Identifier of the graph.
    pub iri: GraphIri,
    /// Whether the graph is project-scoped or a shared foundation.
    pub kind: GraphKind,
    /// Optional label for display purposes.
    pub label: Option<String>,
    /// Number of class declarations.
    pub class_count: usize,
    /// Number of property declarations.
    pub property_count: usize,
}

impl From<&OntologyGraph> for GraphSummary {
    fn from(graph: &OntologyGraph) -> Self {
        Self {
            iri: graph.id().clone(),
            kind: graph.kind(),
            label: graph.label().map(|label| label.to_string()),
            class_count: graph.classes().len(),
            property_count: graph.properties().len(),
        }
    }
}

/// Errors raised by graph loading infrastructure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoaderError {
    /// The requested graph is unknown to the store.
    #[error("graph `{graph}` not found")]
    GraphNotFound { graph: GraphIri },
    /// Attempted to register a graph that already exists.
    #[error("graph `{graph}` already exists")]
    DuplicateGraph { graph: GraphIri },
    /// The store could not be reached or failed mid-query.
    #[error("graph store unavailable: {message}")]
    Store { message: String },
}

/// Port describing read access to stored ontology graphs.
///
/// Implementors must return the whole graph in a single round trip so the
/// traversal cost stays bounded by the number of distinct graphs rather than
/// the number of classes.
#[async_trait]
pub trait GraphLoader {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Loads every class and property of the supplied graph.
    async fn load_graph(&self, iri: &GraphIri) -> Result<OntologyGraph, Self::Error>;

    /// Lists all known graphs without loading their contents.
    async fn list_graphs(&self) -> Result<Vec<GraphSummary>, Self::Error>;
}

/// In-memory loader backing the default backend and the test suites.
#[derive(Default)]
pub struct InMemoryGraphLoader {
    graphs: Mutex<BTreeMap<GraphIri, OntologyGraph>>,
}

impl InMemoryGraphLoader {
    fn guard(&self) -> std::sync::MutexGuard<'_, BTreeMap<GraphIri, OntologyGraph>> {
        self.graphs.lock().expect("in-memory graph store poisoned")
    }

    /// Registers a graph snapshot, rejecting duplicate identifiers.
    pub fn insert_graph(&self, graph: OntologyGraph) -> Result<(), LoaderError> {
        let mut guard = self.guard();
        let id = graph.id().clone();
        if guard.contains_key(&id) {
            return Err(LoaderError::DuplicateGraph { graph: id });
        }
        guard.insert(id, graph);
        Ok(())
    }
}

#[async_trait]
impl GraphLoader for InMemoryGraphLoader {
    type Error = LoaderError;

    async fn load_graph(&self, iri: &GraphIri) -> Result<OntologyGraph, Self::Error> {
        let guard = self.guard();
        guard
            .get(iri)
            .cloned()
            .ok_or_else(|| LoaderError::GraphNotFound { graph: iri.clone() })
    }

    async fn list_graphs(&self) -> Result<Vec<GraphSummary>, Self::Error> {
        let guard = self.guard();
        Ok(guard.values().map(GraphSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{GraphLoader, InMemoryGraphLoader, LoaderError};
    use crate::entities::{ClassRecord, GraphKind, OntologyGraph};
    use crate::value_objects::GraphIri;

    fn giri(text: &str) -> GraphIri {
        GraphIri::new(text).expect("valid iri")
    }

    fn sample_graph(iri: &str, kind: GraphKind) -> OntologyGraph {
        let mut graph = OntologyGraph::new(giri(iri), kind).with_label("Sample");
        graph.add_class(ClassRecord::new("Thing")).expect("class");
        graph
    }

    #[tokio::test]
    async fn load_returns_registered_graph() {
        let loader = InMemoryGraphLoader::default();
        loader
            .insert_graph(sample_graph("https://example.org/g", GraphKind::Local))
            .expect("registered");

        let graph = loader
            .load_graph(&giri("https://example.org/g"))
            .await
            .expect("loaded");
        assert!(graph.class("Thing").is_some());
    }

    #[tokio::test]
    async fn unknown_graph_is_a_typed_error() {
        let loader = InMemoryGraphLoader::default();
        let err = loader
            .load_graph(&giri("https://example.org/missing"))
            .await
            .expect_err("missing");
        assert!(matches!(err, LoaderError::GraphNotFound { .. }));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let loader = InMemoryGraphLoader::default();
        loader
            .insert_graph(sample_graph("https://example.org/g", GraphKind::Local))
            .expect("registered");
        let err = loader
            .insert_graph(sample_graph("https://example.org/g", GraphKind::Local))
            .expect_err("duplicate");
        assert!(matches!(err, LoaderError::DuplicateGraph { .. }));
    }

    #[tokio::test]
    async fn list_exposes_kind_and_counts() {
        let loader = InMemoryGraphLoader::default();
        loader
            .insert_graph(sample_graph("https://example.org/local", GraphKind::Local))
            .expect("local");
        loader
            .insert_graph(sample_graph("https://example.org/shared", GraphKind::Reference))
            .expect("shared");

        let summaries = loader.list_graphs().await.expect("list");
        assert_eq!(summaries.len(), 2);
        let shared = summaries
            .iter()
            .find(|summary| summary.iri == giri("https://example.org/shared"))
            .expect("shared summary");
        assert_eq!(shared.kind, GraphKind::Reference);
        assert_eq!(shared.class_count, 1);
        assert_eq!(shared.label.as_deref(), Some("Sample"));
    }
}
