use super::{parse, ParseConfig, Source};
use crate::metainfo::{DecodedObject, MetainfoError};
use bytes::Bytes;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A torrent file on disk.
///
/// The same handle serves both the decoding stream and the full read used
/// for hashing; `read_all` rewinds it rather than opening the path again.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: Option<BufReader<File>>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Decodes and checks the file at `path` with default limits.
    pub fn parse(path: impl Into<PathBuf>) -> Result<DecodedObject, MetainfoError> {
        Self::parse_with_config(path, &ParseConfig::default())
    }

    pub fn parse_with_config(
        path: impl Into<PathBuf>,
        config: &ParseConfig,
    ) -> Result<DecodedObject, MetainfoError> {
        parse(&mut Self::new(path), config)
    }
}

impl Source for FileSource {
    type Stream = BufReader<File>;

    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&mut self) -> Result<(), MetainfoError> {
        let file = File::open(&self.path)?;
        tracing::trace!("opened {}", self.path.display());
        self.file = Some(BufReader::new(file));
        Ok(())
    }

    fn stream(&mut self) -> Result<&mut Self::Stream, MetainfoError> {
        self.file.as_mut().ok_or(MetainfoError::NotInitialized)
    }

    fn read_all(&mut self) -> Result<Bytes, MetainfoError> {
        let reader = self.file.as_mut().ok_or(MetainfoError::NotInitialized)?;
        // Seeking a BufReader discards its buffer, so the read starts clean.
        reader.seek(SeekFrom::Start(0))?;
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;
        Ok(Bytes::from(contents))
    }

    fn close(&mut self) -> Result<(), MetainfoError> {
        // std closes the descriptor on drop; there is no close error to report.
        if self.file.take().is_some() {
            tracing::trace!("closed {}", self.path.display());
        }
        Ok(())
    }
}
