//! Named extensions grouped by namespace

use crate::error::EtlError;

use std::fmt;

/// A registered plugin: its namespace, its name and how to build it
pub struct Extension<F> {
    namespace: String,
    name: String,
    factory: F,
}

impl<F> Extension<F> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The plugin constructor, not yet invoked
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F> fmt::Debug for Extension<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered table of extensions
///
/// Lookups walk the table in registration order on every call; the first
/// extension matching both namespace and name wins.
pub struct Registry<F> {
    extensions: Vec<Extension<F>>,
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }
}

impl<F> Registry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self {
        self.extensions.push(Extension {
            namespace: namespace.into(),
            name: name.into(),
            factory,
        });
        self
    }

    /// All extensions registered under `namespace`, in registration order
    pub fn extensions<'a>(&'a self, namespace: &str) -> impl Iterator<Item = &'a Extension<F>> {
        self.extensions
            .iter()
            .filter(move |ext| ext.namespace == namespace)
    }

    /// Every extension regardless of namespace, in registration order
    pub fn extensions_all(&self) -> impl Iterator<Item = &Extension<F>> {
        self.extensions.iter()
    }

    pub fn names(&self, namespace: &str) -> Vec<&str> {
        self.extensions(namespace).map(Extension::name).collect()
    }

    /// Distinct namespaces in first-registration order
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = Vec::new();
        for ext in &self.extensions {
            if !namespaces.contains(&ext.namespace.as_str()) {
                namespaces.push(&ext.namespace);
            }
        }
        namespaces
    }

    /// Find the extension called `name` in `namespace`
    ///
    /// # Errors
    /// [`EtlError::PluginNotFound`] carrying both values when nothing matches.
    pub fn get_extension(&self, namespace: &str, name: &str) -> Result<&Extension<F>, EtlError> {
        match self.extensions(namespace).find(|ext| ext.name == name) {
            Some(ext) => {
                log::info!("Load plugin: {} in namespace \"{}\"", ext.name, namespace);
                Ok(ext)
            }
            None => Err(EtlError::plugin_not_found(namespace, name)),
        }
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}
