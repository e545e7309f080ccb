//! Line-oriented text source and sink shared by the file-backed stages

use super::TextEncoding;
use crate::etl::Records;

use eyre::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Reads a text file one line at a time
pub(crate) struct TextSource {
    path: PathBuf,
    encoding: TextEncoding,
    reader: Option<BufReader<File>>,
}

impl TextSource {
    pub fn new(path: impl AsRef<Path>, encoding: TextEncoding) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            encoding,
            reader: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&mut self) -> Result<()> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open source file: {}", self.path.display()))?;
        self.reader = Some(BufReader::new(file));
        Ok(())
    }

    pub fn close(&mut self) {
        self.reader = None;
    }

    /// Lazily yield each line, terminator included. A `\r\n` terminator is
    /// read as `\n`.
    pub fn lines(&mut self) -> Result<Records<'_, String>> {
        let path = &self.path;
        let encoding = self.encoding;
        let Some(reader) = self.reader.as_mut() else {
            eyre::bail!("Source file is not open: {}", path.display());
        };

        let mut line_number = 0usize;
        Ok(Box::new(std::iter::from_fn(move || {
            let mut buf = Vec::new();
            line_number += 1;
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => None,
                Ok(_) => Some(
                    encoding
                        .decode(normalize_newline(buf))
                        .with_context(|| {
                            format!("Failed to decode line {} of {}", line_number, path.display())
                        }),
                ),
                Err(e) => Some(Err(e).with_context(|| {
                    format!("Failed to read line {} of {}", line_number, path.display())
                })),
            }
        })))
    }
}

fn normalize_newline(mut line: Vec<u8>) -> Vec<u8> {
    if line.ends_with(b"\r\n") {
        line.truncate(line.len() - 2);
        line.push(b'\n');
    }
    line
}

/// Writes text lines to a file, flushing after every line
pub(crate) struct TextSink {
    path: PathBuf,
    encoding: TextEncoding,
    writer: Option<BufWriter<File>>,
}

impl TextSink {
    pub fn new(path: impl AsRef<Path>, encoding: TextEncoding) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            encoding,
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&mut self) -> Result<()> {
        let file = File::create(&self.path).with_context(|| {
            format!("Failed to create destination file: {}", self.path.display())
        })?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Write `line`, adding a newline unless it already ends with one
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            eyre::bail!("Destination file is not open: {}", self.path.display());
        };

        let mut bytes = self.encoding.encode(line)?;
        if !line.ends_with('\n') {
            bytes.push(b'\n');
        }
        writer
            .write_all(&bytes)
            .and_then(|_| writer.flush())
            .with_context(|| format!("Failed to write to {}", self.path.display()))
    }

    /// Flush and release the file; a no-op when already closed
    pub fn close(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer
                .flush()
                .with_context(|| format!("Failed to flush {}", self.path.display())),
            None => Ok(()),
        }
    }
}
