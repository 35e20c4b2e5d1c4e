//! Cross-graph ontology class inheritance resolution.
//!
//! Given a class in some ontology graph, the crate computes the complete set
//! of properties that class exposes, including everything inherited through
//! multiple levels, multiple parents and graphs other than the class's own.
//! Results are deterministic and auditable: every contested property name is
//! reported with its candidates, its winner and the rule that picked it.
//!
//! The crate keeps only pure domain constructs plus the [`loader::GraphLoader`]
//! port describing the required infrastructure behavior; the triple store, the
//! HTTP layer and authentication live behind that boundary.

pub mod closure;
pub mod config;
pub mod entities;
pub mod loader;
pub mod merge;
pub mod service;
pub mod value_objects;

pub use closure::{AncestorClosure, AncestorEntry, ClosureNote};
pub use config::{InferenceSettings, LoaderBackend, ResolverSettings};
pub use entities::{
    ClassRecord, GraphError, GraphKind, OntologyGraph, PropertyKind, PropertyRecord,
};
pub use loader::{GraphLoader, GraphSummary, InMemoryGraphLoader, LoaderError};
pub use merge::{ConflictReason, ConflictRecord, ResolvedProperty};
pub use service::{
    EffectiveProperties, InheritanceResolver, LoaderHandle, ParentCandidate, ParentOrigin,
    ResolverError,
};
pub use value_objects::{ClassRef, GraphIri, IriError};
