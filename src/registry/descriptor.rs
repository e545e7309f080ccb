//! Stage kinds and the descriptors resolved against the registry

use crate::error::EtlError;
use crate::settings::{self, Settings};

use std::fmt;

/// The three pluggable stages of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Extractor,
    Transformer,
    Loader,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [Self::Extractor, Self::Transformer, Self::Loader];

    /// Namespace plugins of this kind are registered under by default
    pub fn default_namespace(self) -> &'static str {
        match self {
            Self::Extractor => "etl.extractor",
            Self::Transformer => "etl.transformer",
            Self::Loader => "etl.loader",
        }
    }

    /// Setting holding the plugin name to use for this stage
    pub fn name_key(self) -> &'static str {
        match self {
            Self::Extractor => settings::EXTRACTOR_NAME,
            Self::Transformer => settings::TRANSFORMER_NAME,
            Self::Loader => settings::LOADER_NAME,
        }
    }

    /// Setting that overrides the namespace searched for this stage
    pub fn namespace_key(self) -> &'static str {
        match self {
            Self::Extractor => settings::EXTRACTOR_NAMESPACE,
            Self::Transformer => settings::TRANSFORMER_NAMESPACE,
            Self::Loader => settings::LOADER_NAMESPACE,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extractor => write!(f, "extractor"),
            Self::Transformer => write!(f, "transformer"),
            Self::Loader => write!(f, "loader"),
        }
    }
}

/// Which plugin to use for one stage, and where to look for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    pub kind: StageKind,
    pub namespace: String,
    pub name: String,
}

impl StageDescriptor {
    pub fn new(kind: StageKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Read the configured plugin name and namespace for `kind`
    ///
    /// The name is required; the namespace falls back to the kind's default.
    pub fn from_settings(kind: StageKind, settings: &Settings) -> Result<Self, EtlError> {
        let name = settings.require(kind.name_key())?.trim();
        let namespace = match settings.get(kind.namespace_key()).map(str::trim) {
            Some(ns) if !ns.is_empty() => ns,
            _ => kind.default_namespace(),
        };
        Ok(Self::new(kind, namespace, name))
    }
}

impl fmt::Display for StageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\" from {}", self.kind, self.name, self.namespace)
    }
}
