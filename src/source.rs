//! Byte sources and the checked decode pipeline.
//!
//! A [`Source`] hands the decoder a buffered stream positioned at offset 0
//! and, afterwards, the complete raw content of the same underlying handle.
//! [`parse`] drives a source through open → decode → read → self-check →
//! info hash, and always closes it again.
//!
//! # Components
//!
//! - [`Source`] - The interface the decoder needs from a byte source
//! - [`FileSource`] - A file on disk
//! - [`MemorySource`] - A named in-memory buffer
//! - [`ParseConfig`] - Decoder limits and self-check strictness
//!
//! # Examples
//!
//! ```no_run
//! use btih::source::FileSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let object = FileSource::parse("example.torrent")?;
//! println!("{}: {}", object.origin(), object.calculate_hash()?);
//! # Ok(())
//! # }
//! ```
//!
//! ```
//! use btih::source::{parse, MemorySource, ParseConfig};
//! use btih::metainfo::KeyOrder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = MemorySource::new("inline", &b"d4:infod4:name4:testee"[..]);
//! let config = ParseConfig::default().with_key_order(KeyOrder::Strict);
//! let object = parse(&mut source, &config)?;
//! assert!(object.info_hash().is_some());
//! # Ok(())
//! # }
//! ```

mod file;
mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

use crate::bencode::{Decoder, DecoderConfig};
use crate::constants::INFO_KEY;
use crate::metainfo::{DecodedObject, KeyOrder, MetainfoError};
use bytes::Bytes;
use std::io::BufRead;

/// The byte source the decode pipeline reads from.
///
/// A source is opened once, read as a stream, read again in full for
/// hashing, and closed. Both reads must see the same underlying data.
pub trait Source {
    type Stream: BufRead;

    /// Identifier used in diagnostics and stored on the decoded object.
    fn origin(&self) -> String;

    /// Acquires the underlying resource and positions the stream at offset 0.
    fn open(&mut self) -> Result<(), MetainfoError>;

    /// The stream opened by [`Source::open`].
    ///
    /// Returns [`MetainfoError::NotInitialized`] before `open`.
    fn stream(&mut self) -> Result<&mut Self::Stream, MetainfoError>;

    /// The complete content of the opened resource, read from offset 0.
    ///
    /// Returns [`MetainfoError::NotInitialized`] before `open`.
    fn read_all(&mut self) -> Result<Bytes, MetainfoError>;

    /// Releases the resource. Closing an unopened or closed source succeeds.
    fn close(&mut self) -> Result<(), MetainfoError>;
}

/// Options for [`parse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    pub decoder: DecoderConfig,
    pub key_order: KeyOrder,
}

impl ParseConfig {
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_key_order(mut self, key_order: KeyOrder) -> Self {
        self.key_order = key_order;
        self
    }
}

/// Decodes a source into a checked [`DecodedObject`] with its info hash set.
///
/// The source is closed on every path out of this function. If closing fails
/// after an earlier error, both are returned as
/// [`MetainfoError::Combined`]; if closing fails after success, the close
/// error is returned and no object is produced.
///
/// # Errors
///
/// Any error from the source, the decoder, the self-check or the hash
/// derivation. No partially checked object is ever returned.
pub fn parse<S: Source>(
    source: &mut S,
    config: &ParseConfig,
) -> Result<DecodedObject, MetainfoError> {
    let origin = source.origin();
    source.open()?;

    let mut guard = OpenSource {
        source,
        origin: origin.clone(),
        closed: false,
    };
    let result = decode_opened(&mut *guard.source, origin, config);
    let release = guard.close();

    MetainfoError::combine(result, release)
}

/// Closes an opened source when dropped, including while unwinding.
struct OpenSource<'a, S: Source> {
    source: &'a mut S,
    origin: String,
    closed: bool,
}

impl<S: Source> OpenSource<'_, S> {
    fn close(mut self) -> Result<(), MetainfoError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), MetainfoError> {
        self.closed = true;
        let result = self.source.close();
        if let Err(ref e) = result {
            tracing::warn!("{}: failed to close source: {}", self.origin, e);
        }
        result
    }
}

impl<S: Source> Drop for OpenSource<'_, S> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.release();
        }
    }
}

fn decode_opened<S: Source>(
    source: &mut S,
    origin: String,
    config: &ParseConfig,
) -> Result<DecodedObject, MetainfoError> {
    let (value, consumed, info_span) = {
        let mut decoder = Decoder::with_config(source.stream()?, config.decoder);
        let value = decoder.decode_value()?;
        (
            value,
            decoder.position(),
            decoder.section_span(INFO_KEY.as_bytes()),
        )
    };

    let data = source.read_all()?;
    let total = data.len() as u64;
    if total < consumed {
        return Err(MetainfoError::SelfCheckFailed(format!(
            "source shrank to {} bytes after {} were decoded",
            total, consumed
        )));
    }
    if total > consumed {
        tracing::debug!("{}: ignoring {} trailing bytes", origin, total - consumed);
    }

    let object = DecodedObject::new(origin, data, value, info_span);
    object.self_check(config.key_order)?;
    let hash = object.calculate_hash()?;
    tracing::debug!(
        "{}: decoded {} bytes, info hash {}",
        object.origin(),
        total,
        hash
    );

    Ok(object)
}
