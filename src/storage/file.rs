//! Plain text file extractor and loader

use super::text::{TextSink, TextSource};
use super::TextEncoding;
use crate::etl::{Extractor, Loader, Records, Resource};
use crate::settings::Settings;

use eyre::Result;
use std::path::Path;

/// Setting naming the file the `file` extractor reads
pub const FILE_EXTRACTOR_PATH: &str = "FILE_EXTRACTOR_PATH";
/// Setting naming the file the `file` loader writes
pub const FILE_LOADER_PATH: &str = "FILE_LOADER_PATH";

/// Extract each line of a text file as a record, line terminator included
pub struct FileExtractor {
    source: TextSource,
}

impl FileExtractor {
    pub fn new(path: impl AsRef<Path>, encoding: TextEncoding) -> Self {
        Self {
            source: TextSource::new(path, encoding),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            settings.path(FILE_EXTRACTOR_PATH)?,
            settings.encoding()?,
        ))
    }
}

impl Resource for FileExtractor {
    fn open(&mut self) -> Result<()> {
        log::info!("Extract data from {}", self.source.path().display());
        self.source.open()
    }

    fn close(&mut self) -> Result<()> {
        self.source.close();
        Ok(())
    }
}

impl Extractor for FileExtractor {
    type Item = String;

    fn extract(&mut self) -> Result<Records<'_, Self::Item>> {
        self.source.lines()
    }
}

/// Write each record as one line of a text file
///
/// The file is truncated on open and flushed after every record.
pub struct FileLoader {
    sink: TextSink,
}

impl FileLoader {
    pub fn new(path: impl AsRef<Path>, encoding: TextEncoding) -> Self {
        Self {
            sink: TextSink::new(path, encoding),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.path(FILE_LOADER_PATH)?, settings.encoding()?))
    }
}

impl Resource for FileLoader {
    fn open(&mut self) -> Result<()> {
        log::info!("Write data to {}", self.sink.path().display());
        self.sink.open()
    }

    fn close(&mut self) -> Result<()> {
        self.sink.close()
    }
}

impl Loader for FileLoader {
    type Item = String;

    fn load(&mut self, item: Self::Item) -> Result<()> {
        self.sink.write_line(&item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn read_all(extractor: &mut FileExtractor) -> Vec<String> {
        extractor
            .extract()
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_extract_lines() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "  hello  \nworld\t").unwrap();

        let mut extractor = FileExtractor::new(temp.path(), TextEncoding::Utf8);
        extractor.open().unwrap();
        assert_eq!(read_all(&mut extractor), vec!["  hello  \n", "world\t"]);
        extractor.close().unwrap();
        extractor.close().unwrap();
    }

    #[test]
    fn test_extract_crlf_lines() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"a\r\nb\r\n\r\nlone\rc").unwrap();

        let mut extractor = FileExtractor::new(temp.path(), TextEncoding::Utf8);
        extractor.open().unwrap();
        assert_eq!(read_all(&mut extractor), vec!["a\n", "b\n", "\n", "lone\rc"]);
    }

    #[test]
    fn test_extract_is_lazy() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "first").unwrap();
        temp.as_file().sync_all().unwrap();

        let mut extractor = FileExtractor::new(temp.path(), TextEncoding::Utf8);
        extractor.open().unwrap();
        let mut records = extractor.extract().unwrap();
        assert_eq!(records.next().unwrap().unwrap(), "first\n");

        // appended after the stream started, still picked up by the next pull
        writeln!(temp, "second").unwrap();
        assert_eq!(records.next().unwrap().unwrap(), "second\n");
        assert!(records.next().is_none());
    }

    #[test]
    fn test_extract_without_open() {
        let temp = NamedTempFile::new().unwrap();
        let mut extractor = FileExtractor::new(temp.path(), TextEncoding::Utf8);
        assert!(extractor.extract().is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut extractor = FileExtractor::new(dir.path().join("missing.txt"), TextEncoding::Utf8);
        let err = extractor.open().unwrap_err();
        assert!(err.to_string().contains("Failed to open source file"));
        extractor.close().unwrap();
    }

    #[test]
    fn test_invalid_utf8_line() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"ok\n\xff\xfe\n").unwrap();

        let mut extractor = FileExtractor::new(temp.path(), TextEncoding::Utf8);
        extractor.open().unwrap();
        let results: Vec<Result<String>> = extractor.extract().unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_load_adds_newlines_and_flushes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let mut loader = FileLoader::new(&path, TextEncoding::Utf8);

        loader.open().unwrap();
        loader.load("hello".to_string()).unwrap();
        loader.load("world\n".to_string()).unwrap();
        // flushed per write, visible before close
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\nworld\n");

        loader.close().unwrap();
        loader.close().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\nworld\n");
    }

    #[test]
    fn test_load_after_close_fails() {
        let dir = TempDir::new().unwrap();
        let mut loader = FileLoader::new(dir.path().join("out.txt"), TextEncoding::Utf8);
        loader.open().unwrap();
        loader.close().unwrap();
        assert!(loader.load("late".to_string()).is_err());
    }

    #[test]
    fn test_latin1_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");

        let mut loader = FileLoader::new(&path, TextEncoding::Latin1);
        loader.open().unwrap();
        loader.load("café".to_string()).unwrap();
        loader.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"caf\xe9\n");

        let mut extractor = FileExtractor::new(&path, TextEncoding::Latin1);
        extractor.open().unwrap();
        assert_eq!(read_all(&mut extractor), vec!["café\n"]);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::from_pairs([("FILE_EXTRACTOR_PATH", "in.txt")]);
        assert!(FileExtractor::from_settings(&settings).is_ok());

        let err = FileLoader::from_settings(&settings).err().unwrap();
        assert_eq!(
            err.downcast_ref::<EtlError>(),
            Some(&EtlError::MissingSetting(FILE_LOADER_PATH.to_string()))
        );

        let settings = Settings::from_pairs([("FILE_LOADER_PATH", "out.txt"), ("ENCODING", "klingon")]);
        assert!(FileLoader::from_settings(&settings).is_err());
    }
}
