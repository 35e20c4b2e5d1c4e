use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::NamedNode;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Value object ensuring that supplied text represents a valid graph IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphIri {
    value: String,
}

impl GraphIri {
    /// Validates and constructs a new [`GraphIri`] value object.
    ///
    /// The constructor rejects malformed identifiers in order to guarantee
    /// that every graph uses canonical identifiers.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for GraphIri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for GraphIri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for GraphIri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for GraphIri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// Errors produced when validating a [`GraphIri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}

/// Cross-graph reference to a class: the owning graph plus the class name.
///
/// Parent declarations, provenance attribution and conflict candidates all
/// use this pair, which is what allows a class to inherit from a class that
/// lives in a different graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassRef {
    /// Graph owning the referenced class.
    pub graph: GraphIri,
    /// Name of the class within its graph.
    pub name: String,
}

impl ClassRef {
    /// Creates a reference to a class owned by the supplied graph.
    #[must_use]
    pub fn new(graph: GraphIri, name: impl Into<String>) -> Self {
        Self {
            graph,
            name: name.into(),
        }
    }
}

impl Display for ClassRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.graph, self.name)
    }
}
