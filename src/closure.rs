use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use super::entities::OntologyGraph;
use super::loader::LoaderError;
use super::service::LoaderHandle;
use super::value_objects::{ClassRef, GraphIri};

/// One class reached by the ancestor traversal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AncestorEntry {
    /// The reached class.
    pub class: ClassRef,
    /// Number of `subClassOf` hops from the target; the target itself is 0.
    pub distance: u32,
    /// Parent chain from the target to this ancestor, target first.
    pub path: Vec<ClassRef>,
}

/// Non-fatal observations recorded while building a closure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ClosureNote {
    /// A parent reference pointed at a graph or class that does not exist.
    UnresolvedParent { child: ClassRef, parent: ClassRef },
    /// An already visited class was reached again through another branch.
    ///
    /// Covers both diamond shapes and cycles; the repeated class is never
    /// re-traversed.
    DiamondJoin { through: ClassRef, reached: ClassRef },
}

/// Ordered ancestor closure of one class, target included at distance 0.
///
/// Entry order is breadth-first discovery order: parents are enqueued in
/// declaration order, so the index of an entry doubles as the tie-break
/// ordinal for same-distance inheritance conflicts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AncestorClosure {
    /// Reached classes in discovery order.
    pub entries: Vec<AncestorEntry>,
    /// Diagnostics gathered along the way.
    pub notes: Vec<ClosureNote>,
}

impl AncestorClosure {
    /// Closure containing only the target, used when hierarchy walking is
    /// disabled by configuration.
    #[must_use]
    pub(crate) fn target_only(target: ClassRef) -> Self {
        Self {
            entries: vec![AncestorEntry {
                class: target.clone(),
                distance: 0,
                path: vec![target],
            }],
            notes: Vec::new(),
        }
    }
}

/// Per-call cache guaranteeing one `load_graph` round trip per graph.
///
/// A missing graph is cached as `None` so stale parent references cannot
/// trigger repeated lookups of the same unknown graph.
pub(crate) struct GraphCache<'a> {
    loader: &'a LoaderHandle,
    loaded: BTreeMap<GraphIri, Option<OntologyGraph>>,
}

impl<'a> GraphCache<'a> {
    pub(crate) fn new(loader: &'a LoaderHandle) -> Self {
        Self {
            loader,
            loaded: BTreeMap::new(),
        }
    }

    /// Returns the graph, or `None` when the store reports it unknown.
    ///
    /// Infrastructure failures other than "not found" propagate unchanged.
    pub(crate) async fn graph(
        &mut self,
        iri: &GraphIri,
    ) -> Result<Option<&OntologyGraph>, LoaderError> {
        if !self.loaded.contains_key(iri) {
            let loaded = match self.loader.load_graph(iri).await {
                Ok(graph) => Some(graph),
                Err(LoaderError::GraphNotFound { .. }) => None,
                Err(err) => return Err(err),
            };
            self.loaded.insert(iri.clone(), loaded);
        }
        Ok(self.loaded.get(iri).and_then(Option::as_ref))
    }
}

/// Builds the breadth-first ancestor closure of `target`.
///
/// The caller must have verified that the target class exists; parent
/// references that cannot be resolved are recorded as notes and skipped so a
/// stale edge never fails the traversal.
pub(crate) async fn close_ancestors(
    cache: &mut GraphCache<'_>,
    target: ClassRef,
) -> Result<AncestorClosure, LoaderError> {
    let mut entries = Vec::new();
    let mut notes = Vec::new();
    let mut visited = BTreeSet::from([target.clone()]);
    let mut queue = VecDeque::from([AncestorEntry {
        class: target.clone(),
        distance: 0,
        path: vec![target],
    }]);

    while let Some(entry) = queue.pop_front() {
        let parents: Vec<ClassRef> = match cache.graph(&entry.class.graph).await? {
            Some(graph) => graph
                .class(&entry.class.name)
                .map(|class| class.parents().to_vec())
                .unwrap_or_default(),
            None => Vec::new(),
        };

        for parent in parents {
            let resolvable = match cache.graph(&parent.graph).await? {
                Some(graph) => graph.class(&parent.name).is_some(),
                None => false,
            };
            if !resolvable {
                notes.push(ClosureNote::UnresolvedParent {
                    child: entry.class.clone(),
                    parent,
                });
                continue;
            }
            if !visited.insert(parent.clone()) {
                notes.push(ClosureNote::DiamondJoin {
                    through: entry.class.clone(),
                    reached: parent,
                });
                continue;
            }
            let mut path = entry.path.clone();
            path.push(parent.clone());
            queue.push_back(AncestorEntry {
                class: parent,
                distance: entry.distance + 1,
                path,
            });
        }

        entries.push(entry);
    }

    Ok(AncestorClosure { entries, notes })
}
