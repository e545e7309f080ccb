//! Plugin-driven pipeline runner
//!
//! A [`Runner`] resolves the configured extractor, transformer and loader
//! from a [`Catalog`], then drives a single [`Pipeline`] execution.
//!
//! ```text
//! Initialized --run()--> Running --> Completed
//!      |                    |
//!      +------> Failed <----+
//! ```
//!
//! Resolution happens in [`Runner::new`], so a missing plugin fails before any
//! source or destination is opened. [`Runner::run`] consumes the runner; a new
//! one has to be built for every execution.

use crate::etl::{Pipeline, Transformer};
use crate::registry::{
    Catalog, Extension, ExtractorFactory, LoaderFactory, StageDescriptor, StageKind,
};
use crate::settings::{self, Settings};

use eyre::{Result, WrapErr};
use std::fmt;

/// Lifecycle state of a pipeline execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialized => write!(f, "initialized"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a completed run. A failed run returns the error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Records delivered to the loader
    pub records: usize,
}

/// Runs one extractor → transformer → loader pass chosen by configuration
pub struct Runner<'a, R = String> {
    settings: &'a Settings,
    extractor: &'a Extension<ExtractorFactory<R>>,
    loader: &'a Extension<LoaderFactory<R>>,
    transformer: Box<dyn Transformer<Input = R, Output = R>>,
    descriptors: [StageDescriptor; 3],
    limit: Option<usize>,
    state: RunState,
}

impl<'a, R: 'static> Runner<'a, R> {
    /// Resolve every stage against `catalog` and build the transformer
    ///
    /// # Errors
    /// [`EtlError::PluginNotFound`](crate::EtlError::PluginNotFound) when a
    /// configured name is not registered, [`EtlError::MissingSetting`](crate::EtlError::MissingSetting)
    /// when a stage name is not configured, or the transformer's own
    /// construction error.
    pub fn new(settings: &'a Settings, catalog: &'a Catalog<R>) -> Result<Self> {
        Self::resolve(settings, catalog).inspect_err(|e| {
            log::error!(
                "Pipeline {} -> {}: {:#}",
                RunState::Initialized,
                RunState::Failed,
                e
            )
        })
    }

    fn resolve(settings: &'a Settings, catalog: &'a Catalog<R>) -> Result<Self> {
        let extractor_desc = StageDescriptor::from_settings(StageKind::Extractor, settings)?;
        let loader_desc = StageDescriptor::from_settings(StageKind::Loader, settings)?;
        let transformer_desc = StageDescriptor::from_settings(StageKind::Transformer, settings)?;

        let extractor = catalog
            .extractors
            .get_extension(&extractor_desc.namespace, &extractor_desc.name)?;
        let loader = catalog
            .loaders
            .get_extension(&loader_desc.namespace, &loader_desc.name)?;
        let transformer_ext = catalog
            .transformers
            .get_extension(&transformer_desc.namespace, &transformer_desc.name)?;

        let transformer = (transformer_ext.factory())(settings)
            .wrap_err_with(|| format!("Failed to build {}", transformer_desc))?;
        let limit = settings.get_usize(settings::MAX_RECORDS)?;

        Ok(Self {
            settings,
            extractor,
            loader,
            transformer,
            descriptors: [extractor_desc, transformer_desc, loader_desc],
            limit,
            state: RunState::Initialized,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Resolved extractor, transformer and loader, in that order
    pub fn descriptors(&self) -> &[StageDescriptor; 3] {
        &self.descriptors
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Execute the pipeline once
    ///
    /// # Errors
    /// The first error raised while building or driving a stage. The runner
    /// has moved to [`RunState::Failed`] and logged the error, and every
    /// extractor and loader that was opened has been closed by the time this
    /// returns.
    pub fn run(mut self) -> Result<RunReport> {
        self.transition(RunState::Running);
        let [extractor_desc, transformer_desc, loader_desc] = &self.descriptors;
        log::info!(
            "Running pipeline: {} -> {} -> {}",
            extractor_desc.name,
            transformer_desc.name,
            loader_desc.name
        );

        match self.execute() {
            Ok(records) => {
                self.transition(RunState::Completed);
                log::info!("Data processed, {} records loaded", records);
                Ok(RunReport { records })
            }
            Err(err) => {
                self.transition(RunState::Failed);
                log::error!("Pipeline failed: {:#}", err);
                Err(err)
            }
        }
    }

    fn execute(&self) -> Result<usize> {
        let [extractor_desc, _, loader_desc] = &self.descriptors;
        let extractor = (self.extractor.factory())(self.settings)
            .wrap_err_with(|| format!("Failed to build {}", extractor_desc))?;
        let loader = (self.loader.factory())(self.settings)
            .wrap_err_with(|| format!("Failed to build {}", loader_desc))?;

        Pipeline::new(extractor, &self.transformer, loader)
            .with_limit(self.limit)
            .run()
    }

    fn transition(&mut self, next: RunState) {
        log::debug!("Pipeline {} -> {}", self.state, next);
        self.state = next;
    }
}
