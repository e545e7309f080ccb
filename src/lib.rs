//! ETL Runner
//!
//! A plugin-driven extract, transform, load pipeline. Extractors,
//! transformers and loaders are registered by name in a [`Catalog`]; a
//! [`Runner`] picks one of each from [`Settings`] and streams records through
//! them with guaranteed release of every opened resource.

pub mod error;
pub mod etl;
pub mod registry;
pub mod runner;
pub mod settings;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use error::EtlError;
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, Resource, Transformer};
pub use registry::{Catalog, StageDescriptor, StageKind};
pub use runner::{RunReport, RunState, Runner};
pub use settings::Settings;
pub use storage::{ConsoleLoader, FileExtractor, FileLoader, NdjsonReader, NdjsonWriter};
