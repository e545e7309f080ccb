//! File and stream backed stages
//!
//! This module holds the reference extractor and loader plugins:
//! - `file`: line-oriented text files in a configurable encoding
//! - `ndjson`: newline delimited JSON files
//! - `stdout`: console output

mod console;
mod encoding;
mod file;
mod ndjson;
mod text;

pub use console::ConsoleLoader;
pub use encoding::TextEncoding;
pub use file::{FILE_EXTRACTOR_PATH, FILE_LOADER_PATH, FileExtractor, FileLoader};
pub use ndjson::{NDJSON_EXTRACTOR_PATH, NDJSON_LOADER_PATH, NdjsonReader, NdjsonWriter};

use crate::registry::Catalog;

/// Register the extractors and loaders defined here
pub fn register(catalog: &mut Catalog) {
    catalog
        .extractor("file", FileExtractor::from_settings)
        .extractor("ndjson", NdjsonReader::from_settings)
        .loader("file", FileLoader::from_settings)
        .loader("ndjson", NdjsonWriter::from_settings)
        .loader("stdout", ConsoleLoader::from_settings);
}
