//! Plugin discovery
//!
//! Stage implementations are registered by name under a namespace, one
//! [`Registry`] per stage kind, collected in a [`Catalog`]. The runner turns
//! configured names into [`StageDescriptor`]s and resolves them here.

mod catalog;
mod descriptor;
mod extension;

pub use catalog::{Catalog, ExtractorFactory, LoaderFactory, TransformerFactory, global};
pub use descriptor::{StageDescriptor, StageKind};
pub use extension::{Extension, Registry};
