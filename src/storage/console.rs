//! Console loader

use super::TextEncoding;
use crate::etl::{Loader, Resource};
use crate::settings::Settings;

use eyre::{Context, Result};
use std::io::{Stdout, Write};

/// Write each record as a line to standard output, or any other writer
pub struct ConsoleLoader<W = Stdout> {
    out: W,
    encoding: TextEncoding,
    closed: bool,
}

impl ConsoleLoader<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), TextEncoding::Utf8)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(std::io::stdout(), settings.encoding()?))
    }
}

impl<W: Write> ConsoleLoader<W> {
    pub fn new(out: W, encoding: TextEncoding) -> Self {
        Self {
            out,
            encoding,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Resource for ConsoleLoader<W> {
    /// Flush once; later calls leave the writer alone
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.out.flush().context("Failed to flush console output")
    }
}

impl<W: Write> Loader for ConsoleLoader<W> {
    type Item = String;

    fn load(&mut self, item: Self::Item) -> Result<()> {
        if self.closed {
            eyre::bail!("Console output is closed");
        }
        let line = item.strip_suffix('\n').unwrap_or(&item);
        let mut bytes = self.encoding.encode(line)?;
        bytes.push(b'\n');
        self.out
            .write_all(&bytes)
            .and_then(|_| self.out.flush())
            .context("Failed to write console output")
    }
}
