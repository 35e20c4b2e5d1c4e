use serde::Deserialize;

/// Storage backend used to satisfy graph loads.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderBackend {
    /// Graphs registered in process memory.
    #[default]
    InMemory,
}

/// Toggles for the inference features of the resolver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Walk `subClassOf` edges when resolving effective properties.
    ///
    /// When disabled, resolution returns only direct declarations.
    pub class_hierarchy: bool,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            class_hierarchy: true,
        }
    }
}

/// Resolver configuration supplied by the host application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Which loader backend to construct.
    pub backend: LoaderBackend,
    /// Inference feature toggles.
    pub inference: InferenceSettings,
}
