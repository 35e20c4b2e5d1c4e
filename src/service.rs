use std::sync::Arc;

use serde::Serialize;

use super::closure::{self, AncestorClosure, ClosureNote, GraphCache};
use super::config::{LoaderBackend, ResolverSettings};
use super::entities::GraphKind;
use super::loader::{GraphLoader, InMemoryGraphLoader, LoaderError};
use super::merge::{self, ConflictRecord, MergeCandidate, ResolvedProperty};
use super::value_objects::{ClassRef, GraphIri};

/// Type alias simplifying loader trait object usage inside the resolver.
pub type LoaderHandle = dyn GraphLoader<Error = LoaderError> + Send + Sync + 'static;

/// Errors raised by the inheritance resolution operations.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// The graph store could not satisfy a load for the requested graph.
    #[error(transparent)]
    Loader(#[from] LoaderError),
    /// The requested class is absent from an otherwise loadable graph.
    #[error("class `{class}` missing in graph `{graph}`")]
    ClassNotFound { graph: GraphIri, class: String },
}

/// Result of one effective-property resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EffectiveProperties {
    /// One entry per distinct property name reachable from the class.
    pub properties: Vec<ResolvedProperty>,
    /// Every contested name and how it was resolved.
    pub conflicts: Vec<ConflictRecord>,
    /// Traversal diagnostics: unresolved parents and diamond joins.
    pub notes: Vec<ClosureNote>,
}

/// Origin of a class offered as a parent candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentOrigin {
    /// Declared in the caller's own graph.
    Local,
    /// Declared in a globally readable reference graph.
    Reference,
}

/// Class eligible to be chosen as a parent within a graph editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParentCandidate {
    /// The candidate class.
    pub class: ClassRef,
    /// Optional display label.
    pub label: Option<String>,
    /// Whether the class comes from the caller's graph or a foundation.
    pub origin: ParentOrigin,
}

/// High level resolver wiring the graph loader port to the closure and
/// merge steps.
///
/// Every operation is stateless and read-only: records are fetched fresh per
/// call and nothing is cached across calls, so concurrent resolutions need
/// no coordination.
#[derive(Clone)]
pub struct InheritanceResolver {
    loader: Arc<LoaderHandle>,
    settings: ResolverSettings,
}

impl InheritanceResolver {
    /// Creates a new [`InheritanceResolver`] from a loader trait object.
    pub fn new(loader: Arc<LoaderHandle>, settings: ResolverSettings) -> Self {
        Self { loader, settings }
    }

    /// Builds a resolver instance from configuration settings.
    ///
    /// Returns the constructed loader alongside the resolver so the host can
    /// register graph snapshots.
    pub fn from_config(settings: &ResolverSettings) -> (Self, Arc<InMemoryGraphLoader>) {
        let loader = match settings.backend {
            LoaderBackend::InMemory => Arc::new(InMemoryGraphLoader::default()),
        };
        (Self::new(loader.clone(), settings.clone()), loader)
    }

    /// Returns a clone of the loader handle.
    pub fn loader(&self) -> Arc<LoaderHandle> {
        Arc::clone(&self.loader)
    }

    /// Returns the active settings.
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Computes the complete set of properties the class exposes, including
    /// everything inherited across graphs, with conflict attribution.
    ///
    /// Broken or cyclic ancestry never fails the call; only the target's own
    /// graph being unavailable does.
    pub async fn effective_properties(
        &self,
        graph: &GraphIri,
        class: &str,
    ) -> Result<EffectiveProperties, ResolverError> {
        let target = ClassRef::new(graph.clone(), class);
        let mut cache = GraphCache::new(self.loader.as_ref());

        let target_exists = cache
            .graph(graph)
            .await?
            .map(|loaded| loaded.class(class).is_some());
        match target_exists {
            None => {
                return Err(LoaderError::GraphNotFound {
                    graph: graph.clone(),
                }
                .into())
            }
            Some(false) => {
                return Err(ResolverError::ClassNotFound {
                    graph: graph.clone(),
                    class: class.to_owned(),
                })
            }
            Some(true) => {}
        }

        let closure = if self.settings.inference.class_hierarchy {
            closure::close_ancestors(&mut cache, target.clone()).await?
        } else {
            AncestorClosure::target_only(target.clone())
        };

        let mut candidates = Vec::new();
        for (ordinal, entry) in closure.entries.iter().enumerate() {
            let Some(loaded) = cache.graph(&entry.class.graph).await? else {
                continue;
            };
            for property in loaded.properties_of(&entry.class.name) {
                candidates.push(MergeCandidate {
                    owner: entry.class.clone(),
                    distance: entry.distance,
                    ordinal,
                    property: property.clone(),
                });
            }
        }

        let (properties, conflicts) = merge::merge_properties(&target, candidates);

        for note in &closure.notes {
            if let ClosureNote::UnresolvedParent { child, parent } = note {
                tracing::warn!(child = %child, parent = %parent, "unresolved_parent_reference");
            }
        }
        tracing::debug!(
            graph = %graph,
            class = %class,
            ancestors = closure.entries.len(),
            properties = properties.len(),
            conflicts = conflicts.len(),
            "effective_properties_resolved"
        );

        Ok(EffectiveProperties {
            properties,
            conflicts,
            notes: closure.notes,
        })
    }

    /// Lists classes eligible to be chosen as a parent in the supplied
    /// graph: its own classes plus every class of every reference graph.
    ///
    /// Reference graphs are never filtered by project membership; a
    /// reference graph that fails to load degrades the listing instead of
    /// failing it.
    pub async fn available_parents(
        &self,
        graph: &GraphIri,
    ) -> Result<Vec<ParentCandidate>, ResolverError> {
        let current = self.loader.load_graph(graph).await?;
        let mut candidates: Vec<ParentCandidate> = current
            .classes()
            .values()
            .map(|class| ParentCandidate {
                class: ClassRef::new(graph.clone(), class.name()),
                label: class.label().map(ToOwned::to_owned),
                origin: ParentOrigin::Local,
            })
            .collect();

        for summary in self.loader.list_graphs().await? {
            if summary.kind != GraphKind::Reference || summary.iri == *graph {
                continue;
            }
            match self.loader.load_graph(&summary.iri).await {
                Ok(reference) => {
                    candidates.extend(reference.classes().values().map(|class| ParentCandidate {
                        class: ClassRef::new(summary.iri.clone(), class.name()),
                        label: class.label().map(ToOwned::to_owned),
                        origin: ParentOrigin::Reference,
                    }));
                }
                Err(error) => {
                    tracing::warn!(
                        graph = %summary.iri,
                        err.msg = %error,
                        err.detail = ?error,
                        "reference_graph_load_failed"
                    );
                }
            }
        }

        Ok(candidates)
    }
}
