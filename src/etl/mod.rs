//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the stage contracts, the scoped open/close guard
//! around stage resources, and the streaming [`Pipeline`] that composes an
//! extractor, a transformer and a loader.

mod extract;
mod load;
mod pipeline;
mod scope;
mod transform;

pub use extract::{Extractor, Records};
pub use load::Loader;
pub use pipeline::Pipeline;
pub use scope::{Resource, Scope};
pub use transform::{IdentityTransformer, Transformer};
