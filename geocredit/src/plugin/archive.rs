use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::GeocreditError;

/// In-memory zip archive.
pub(crate) struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: Vec<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: vec![],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    pub fn add_file(&mut self, name: &str, content: &[u8]) -> Result<(), GeocreditError> {
        self.writer.start_file(name, self.options)?;
        self.writer
            .write_all(content)
            .map_err(|err| GeocreditError::Archive(err.to_string()))?;
        self.entries.push(name.to_owned());

        log::trace!("Added {name} to archive ({} bytes)", content.len());
        Ok(())
    }

    /// Finishes the archive and returns its names of the entries and its binary content.
    pub fn finish(self) -> Result<(Vec<String>, Bytes), GeocreditError> {
        let cursor = self.writer.finish()?;
        Ok((self.entries, cursor.into_inner().into()))
    }
}
