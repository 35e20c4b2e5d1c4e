use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value_objects::{ClassRef, GraphIri};

/// Distinguishes project-scoped graphs from globally readable foundations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    /// Graph scoped to one project; read/write restricted to its members.
    Local,
    /// Globally readable graph other graphs may inherit from.
    Reference,
}

/// Ontology class definition capturing parent references and metadata.
///
/// Parents are stored as an ordered list rather than a set: declaration
/// order is the tie-break key for same-distance inheritance conflicts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRecord {
    name: String,
    label: Option<String>,
    parents: Vec<ClassRef>,
}

impl ClassRecord {
    /// Creates a new [`ClassRecord`] with the supplied name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            parents: Vec::new(),
        }
    }

    /// Sets a human friendly label for the class.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends a parent reference, preserving declaration order.
    ///
    /// Duplicate entries are ignored so a parent cannot occupy two tie-break
    /// positions.
    pub fn add_parent(&mut self, parent: ClassRef) -> bool {
        if self.parents.contains(&parent) {
            return false;
        }
        self.parents.push(parent);
        true
    }

    /// Returns the name of the class.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the parent references in declaration order.
    #[must_use]
    pub fn parents(&self) -> &[ClassRef] {
        &self.parents
    }
}

/// Classifies the type of values a property can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Object properties link to other individuals or classes.
    Object,
    /// Datatype properties capture literal values.
    Datatype,
}

/// Property declaration owned by exactly one class in one graph.
///
/// A property becomes visible on other classes only through inheritance,
/// never through mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRecord {
    owner: String,
    name: String,
    kind: PropertyKind,
    label: Option<String>,
    range: Option<String>,
}

impl PropertyRecord {
    /// Creates a new property declared on the supplied owning class.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            kind,
            label: None,
            range: None,
        }
    }

    /// Sets a human readable label for the property.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Declares the range IRI or datatype the property produces values from.
    #[must_use]
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Returns the name of the owning class.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the property kind.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the optional range metadata.
    #[must_use]
    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }
}

/// Aggregates the classes and properties of one ontology graph.
///
/// The resolver only ever reads a consistent snapshot of this aggregate; the
/// insertion methods enforce referential integrity so the traversal never has
/// to second-guess its input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OntologyGraph {
    id: GraphIri,
    kind: GraphKind,
    label: Option<String>,
    classes: BTreeMap<String, ClassRecord>,
    properties: Vec<PropertyRecord>,
}

impl OntologyGraph {
    /// Creates a new ontology graph aggregate with the supplied identifier.
    #[must_use]
    pub fn new(id: GraphIri, kind: GraphKind) -> Self {
        Self {
            id,
            kind,
            label: None,
            classes: BTreeMap::new(),
            properties: Vec::new(),
        }
    }

    /// Sets a human readable label for the graph.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds a class to the graph, enforcing unique names.
    pub fn add_class(&mut self, class: ClassRecord) -> Result<(), GraphError> {
        let name = class.name().to_owned();
        if self.classes.contains_key(&name) {
            return Err(GraphError::DuplicateClass(name));
        }
        self.classes.insert(name, class);
        Ok(())
    }

    /// Adds a property declaration, validating its owning class.
    ///
    /// A given class may declare each property name at most once.
    pub fn add_property(&mut self, property: PropertyRecord) -> Result<(), GraphError> {
        if !self.classes.contains_key(property.owner()) {
            return Err(GraphError::MissingClass {
                graph: self.id.clone(),
                class: property.owner().to_owned(),
            });
        }
        let duplicate = self
            .properties
            .iter()
            .any(|existing| existing.owner() == property.owner() && existing.name() == property.name());
        if duplicate {
            return Err(GraphError::DuplicateProperty {
                class: property.owner().to_owned(),
                property: property.name().to_owned(),
            });
        }
        self.properties.push(property);
        Ok(())
    }

    /// Returns the graph identifier.
    #[must_use]
    pub fn id(&self) -> &GraphIri {
        &self.id
    }

    /// Returns the graph kind.
    #[must_use]
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Retrieves a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    /// Returns all classes ordered by name.
    #[must_use]
    pub fn classes(&self) -> &BTreeMap<String, ClassRecord> {
        &self.classes
    }

    /// Returns all property declarations in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyRecord] {
        &self.properties
    }

    /// Returns the properties directly declared on the supplied class.
    pub fn properties_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a PropertyRecord> {
        self.properties
            .iter()
            .filter(move |property| property.owner() == class)
    }
}

/// Errors raised when manipulating an ontology graph aggregate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Attempted to add a class with an existing name.
    #[error("class `{0}` already exists")]
    DuplicateClass(String),
    /// Attempted to declare the same property name twice on one class.
    #[error("property `{property}` already declared on class `{class}`")]
    DuplicateProperty { class: String, property: String },
    /// Referenced owning class was not part of the graph.
    #[error("class `{class}` does not exist in graph `{graph}`")]
    MissingClass { graph: GraphIri, class: String },
}
