//! The plugin catalog: one registry per stage kind

use super::{Registry, StageKind};
use crate::etl::{Extractor, Loader, Transformer};
use crate::settings::Settings;

use eyre::Result;
use std::sync::OnceLock;

/// Builds an extractor from the run's settings
pub type ExtractorFactory<R> =
    Box<dyn Fn(&Settings) -> Result<Box<dyn Extractor<Item = R>>> + Send + Sync>;

/// Builds a transformer from the run's settings
pub type TransformerFactory<R> =
    Box<dyn Fn(&Settings) -> Result<Box<dyn Transformer<Input = R, Output = R>>> + Send + Sync>;

/// Builds a loader from the run's settings
pub type LoaderFactory<R> =
    Box<dyn Fn(&Settings) -> Result<Box<dyn Loader<Item = R>>> + Send + Sync>;

/// Every plugin known to the process, grouped by stage kind
///
/// `R` is the record type flowing between the stages.
pub struct Catalog<R = String> {
    pub extractors: Registry<ExtractorFactory<R>>,
    pub transformers: Registry<TransformerFactory<R>>,
    pub loaders: Registry<LoaderFactory<R>>,
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Self {
            extractors: Registry::new(),
            transformers: Registry::new(),
            loaders: Registry::new(),
        }
    }
}

impl<R: 'static> Catalog<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor under the default `etl.extractor` namespace
    pub fn extractor<E, F>(&mut self, name: &str, build: F) -> &mut Self
    where
        E: Extractor<Item = R> + 'static,
        F: Fn(&Settings) -> Result<E> + Send + Sync + 'static,
    {
        self.extractor_in(StageKind::Extractor.default_namespace(), name, build)
    }

    pub fn extractor_in<E, F>(&mut self, namespace: &str, name: &str, build: F) -> &mut Self
    where
        E: Extractor<Item = R> + 'static,
        F: Fn(&Settings) -> Result<E> + Send + Sync + 'static,
    {
        self.extractors.register(
            namespace,
            name,
            Box::new(move |settings: &Settings| {
                build(settings).map(|e| Box::new(e) as Box<dyn Extractor<Item = R>>)
            }),
        );
        self
    }

    /// Register a transformer under the default `etl.transformer` namespace
    pub fn transformer<T, F>(&mut self, name: &str, build: F) -> &mut Self
    where
        T: Transformer<Input = R, Output = R> + 'static,
        F: Fn(&Settings) -> Result<T> + Send + Sync + 'static,
    {
        self.transformer_in(StageKind::Transformer.default_namespace(), name, build)
    }

    pub fn transformer_in<T, F>(&mut self, namespace: &str, name: &str, build: F) -> &mut Self
    where
        T: Transformer<Input = R, Output = R> + 'static,
        F: Fn(&Settings) -> Result<T> + Send + Sync + 'static,
    {
        self.transformers.register(
            namespace,
            name,
            Box::new(move |settings: &Settings| {
                build(settings)
                    .map(|t| Box::new(t) as Box<dyn Transformer<Input = R, Output = R>>)
            }),
        );
        self
    }

    /// Register a loader under the default `etl.loader` namespace
    pub fn loader<L, F>(&mut self, name: &str, build: F) -> &mut Self
    where
        L: Loader<Item = R> + 'static,
        F: Fn(&Settings) -> Result<L> + Send + Sync + 'static,
    {
        self.loader_in(StageKind::Loader.default_namespace(), name, build)
    }

    pub fn loader_in<L, F>(&mut self, namespace: &str, name: &str, build: F) -> &mut Self
    where
        L: Loader<Item = R> + 'static,
        F: Fn(&Settings) -> Result<L> + Send + Sync + 'static,
    {
        self.loaders.register(
            namespace,
            name,
            Box::new(move |settings: &Settings| {
                build(settings).map(|l| Box::new(l) as Box<dyn Loader<Item = R>>)
            }),
        );
        self
    }

    /// `(kind, namespace, name)` for every registered plugin
    pub fn entries(&self) -> Vec<(StageKind, &str, &str)> {
        let mut entries = Vec::new();
        for ext in self.extractors.extensions_all() {
            entries.push((StageKind::Extractor, ext.namespace(), ext.name()));
        }
        for ext in self.transformers.extensions_all() {
            entries.push((StageKind::Transformer, ext.namespace(), ext.name()));
        }
        for ext in self.loaders.extensions_all() {
            entries.push((StageKind::Loader, ext.namespace(), ext.name()));
        }
        entries
    }
}

impl Catalog<String> {
    /// Catalog holding the plugins shipped with this crate
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        crate::storage::register(&mut catalog);
        crate::transform::register(&mut catalog);
        catalog
    }
}

/// The process-wide catalog of builtin plugins, built on first use
pub fn global() -> &'static Catalog<String> {
    static CATALOG: OnceLock<Catalog<String>> = OnceLock::new();
    CATALOG.get_or_init(Catalog::builtin)
}
