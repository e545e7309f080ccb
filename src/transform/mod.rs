//! Transformer plugins
//!
//! - `identity`: pass records through unchanged
//! - `strip`: trim surrounding whitespace
//! - `regex`: pattern replacement
//! - `drop_fields`: remove fields from JSON object records

mod field_dropper;
mod regex_replace;
mod strip;

pub use field_dropper::{DROP_FIELDS, FieldDropper};
pub use regex_replace::{REGEX_PATTERN, REGEX_REPLACEMENT, RegexReplacer};
pub use strip::StripTransformer;

use crate::etl::IdentityTransformer;
use crate::registry::Catalog;

/// Register the transformers defined here
pub fn register(catalog: &mut Catalog) {
    catalog
        .transformer("identity", |_| Ok(IdentityTransformer::<String>::new()))
        .transformer("strip", |_| Ok(StripTransformer::new()))
        .transformer("regex", RegexReplacer::from_settings)
        .transformer("drop_fields", FieldDropper::from_settings);
}
