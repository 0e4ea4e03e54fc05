use super::Source;
use crate::metainfo::MetainfoError;
use bytes::Bytes;
use std::io::Cursor;

/// A named buffer that is already in memory, such as a download body.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: Bytes,
    cursor: Option<Cursor<Bytes>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            cursor: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.cursor.is_some()
    }
}

impl Source for MemorySource {
    type Stream = Cursor<Bytes>;

    fn origin(&self) -> String {
        self.name.clone()
    }

    fn open(&mut self) -> Result<(), MetainfoError> {
        self.cursor = Some(Cursor::new(self.data.clone()));
        Ok(())
    }

    fn stream(&mut self) -> Result<&mut Self::Stream, MetainfoError> {
        self.cursor.as_mut().ok_or(MetainfoError::NotInitialized)
    }

    fn read_all(&mut self) -> Result<Bytes, MetainfoError> {
        let cursor = self.cursor.as_ref().ok_or(MetainfoError::NotInitialized)?;
        Ok(cursor.get_ref().clone())
    }

    fn close(&mut self) -> Result<(), MetainfoError> {
        self.cursor = None;
        Ok(())
    }
}
