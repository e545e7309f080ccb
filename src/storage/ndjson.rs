//! NDJSON (Newline Delimited JSON) extractor and loader

use super::TextEncoding;
use super::text::{TextSink, TextSource};
use crate::etl::{Extractor, Loader, Records, Resource};
use crate::settings::Settings;

use eyre::{Context, Result};
use serde_json::Value;
use std::path::Path;

pub const NDJSON_EXTRACTOR_PATH: &str = "NDJSON_EXTRACTOR_PATH";
pub const NDJSON_LOADER_PATH: &str = "NDJSON_LOADER_PATH";

/// Re-serialize one JSON document in compact form
fn normalize(line: &str) -> Result<String> {
    let value: Value = serde_json::from_str(line)
        .with_context(|| format!("Failed to parse JSON line: {}", line))?;
    Ok(serde_json::to_string(&value)?)
}

/// Read NDJSON from a file, one compact JSON document per record
///
/// Blank lines are skipped; any other line that is not valid JSON fails the
/// stream at that record.
pub struct NdjsonReader {
    source: TextSource,
}

impl NdjsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_encoding(path, TextEncoding::Utf8)
    }

    pub fn with_encoding(path: impl AsRef<Path>, encoding: TextEncoding) -> Self {
        Self {
            source: TextSource::new(path, encoding),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::with_encoding(
            settings.path(NDJSON_EXTRACTOR_PATH)?,
            settings.encoding()?,
        ))
    }
}

impl Resource for NdjsonReader {
    fn open(&mut self) -> Result<()> {
        log::info!("Extract NDJSON from {}", self.source.path().display());
        self.source.open()
    }

    fn close(&mut self) -> Result<()> {
        self.source.close();
        Ok(())
    }
}

impl Extractor for NdjsonReader {
    type Item = String;

    fn extract(&mut self) -> Result<Records<'_, Self::Item>> {
        let lines = self.source.lines()?;
        Ok(Box::new(lines.filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(normalize(line.trim_end())),
            Err(e) => Some(Err(e)),
        })))
    }
}

/// Write NDJSON to a file
///
/// Every record must be a single JSON document; it is written compacted onto
/// its own line.
pub struct NdjsonWriter {
    sink: TextSink,
}

impl NdjsonWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_encoding(path, TextEncoding::Utf8)
    }

    pub fn with_encoding(path: impl AsRef<Path>, encoding: TextEncoding) -> Self {
        Self {
            sink: TextSink::new(path, encoding),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::with_encoding(
            settings.path(NDJSON_LOADER_PATH)?,
            settings.encoding()?,
        ))
    }
}

impl Resource for NdjsonWriter {
    fn open(&mut self) -> Result<()> {
        log::info!("Write NDJSON to {}", self.sink.path().display());
        self.sink.open()
    }

    fn close(&mut self) -> Result<()> {
        self.sink.close()
    }
}

impl Loader for NdjsonWriter {
    type Item = String;

    fn load(&mut self, item: Self::Item) -> Result<()> {
        let line = normalize(&item)?;
        self.sink.write_line(&line)
    }
}
