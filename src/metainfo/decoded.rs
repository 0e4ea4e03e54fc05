use super::error::MetainfoError;
use super::info_hash::InfoHash;
use crate::bencode::{Decoder, DecoderConfig, Dict, Value, ValueKind};
use crate::constants::INFO_KEY;
use bytes::Bytes;
use std::ops::Range;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// How strictly the self-check treats dictionary key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Accept keys in whatever order the source used.
    #[default]
    Lenient,
    /// Require strictly ascending keys in every dictionary of the document.
    Strict,
}

/// A fully decoded bencode source together with where it came from.
///
/// The object keeps the complete raw bytes it was decoded from and the byte
/// span of the root `info` value inside them, so the info hash is computed
/// over the original encoding rather than over a re-serialisation.
///
/// Everything except the info hash is fixed at construction. The hash is
/// derived at most once and cached; [`DecodedObject::calculate_hash`] may be
/// called from several threads and they all observe the same value.
///
/// # Examples
///
/// ```
/// use btih::bencode::DecoderConfig;
/// use btih::metainfo::{DecodedObject, KeyOrder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = b"d4:infod6:lengthi100e4:name4:testee".to_vec();
/// let object = DecodedObject::from_bytes("memory", data, &DecoderConfig::default())?;
///
/// object.self_check(KeyOrder::Strict)?;
/// let hash = object.calculate_hash()?;
/// assert_eq!(object.info_hash(), Some(hash));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DecodedObject {
    origin: String,
    source: Bytes,
    value: Value,
    decoded_at: SystemTime,
    info_span: Option<Range<usize>>,
    info_hash: OnceLock<InfoHash>,
}

impl DecodedObject {
    /// Wraps an already decoded value.
    ///
    /// `info_span` is the byte range of the root `info` value within `source`
    /// as reported by [`Decoder::section_span`].
    pub(crate) fn new(
        origin: String,
        source: Bytes,
        value: Value,
        info_span: Option<Range<u64>>,
    ) -> Self {
        let info_span = info_span.and_then(|span| {
            let start = usize::try_from(span.start).ok()?;
            let end = usize::try_from(span.end).ok()?;
            Some(start..end)
        });

        Self {
            origin,
            source,
            value,
            decoded_at: SystemTime::now(),
            info_span,
            info_hash: OnceLock::new(),
        }
    }

    /// Decodes an in-memory buffer.
    ///
    /// Bytes after the root value are ignored. No self-check is performed;
    /// see [`crate::source::parse`] for the checked pipeline.
    pub fn from_bytes(
        origin: impl Into<String>,
        data: impl Into<Bytes>,
        config: &DecoderConfig,
    ) -> Result<Self, MetainfoError> {
        let origin = origin.into();
        let data = data.into();

        let (value, consumed, info_span) = {
            let mut decoder = Decoder::with_config(&data[..], *config);
            let value = decoder.decode_value()?;
            (
                value,
                decoder.position(),
                decoder.section_span(INFO_KEY.as_bytes()),
            )
        };
        if consumed < data.len() as u64 {
            tracing::debug!(
                "{}: ignoring {} trailing bytes",
                origin,
                data.len() as u64 - consumed
            );
        }

        Ok(Self::new(origin, data, value, info_span))
    }

    /// Identifier of the source, such as a file path. Used for diagnostics only.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The complete raw bytes the value was decoded from.
    pub fn source(&self) -> &Bytes {
        &self.source
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// When decoding finished.
    pub fn decoded_at(&self) -> SystemTime {
        self.decoded_at
    }

    /// When decoding finished, in seconds since the Unix epoch.
    pub fn decode_timestamp(&self) -> u64 {
        self.decoded_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    /// Byte range of the root `info` value within [`DecodedObject::source`].
    pub fn info_span(&self) -> Option<Range<usize>> {
        self.info_span.clone()
    }

    /// The `info` dictionary, if the root has one.
    pub fn info(&self) -> Option<&Dict> {
        self.value.get(INFO_KEY.as_bytes())?.as_dict()
    }

    /// The original encoding of the `info` value.
    pub fn raw_info(&self) -> Option<&[u8]> {
        self.source.get(self.info_span.clone()?)
    }

    /// The info hash, if [`DecodedObject::calculate_hash`] has succeeded.
    pub fn info_hash(&self) -> Option<InfoHash> {
        self.info_hash.get().copied()
    }

    /// Verifies that the value is shaped like torrent metainfo: a dictionary
    /// root holding an `info` dictionary.
    ///
    /// With [`KeyOrder::Strict`] every dictionary in the document must also
    /// have strictly ascending keys.
    ///
    /// # Errors
    ///
    /// - [`MetainfoError::SectionDoesNotExist`] if the root is not a
    ///   dictionary or has no `info` key
    /// - [`MetainfoError::TypeAssertion`] if `info` is not a dictionary
    /// - [`MetainfoError::SelfCheckFailed`] if strict ordering is violated
    pub fn self_check(&self, order: KeyOrder) -> Result<(), MetainfoError> {
        let root = self
            .value
            .as_dict()
            .ok_or(MetainfoError::SectionDoesNotExist(INFO_KEY))?;

        let info = root
            .get(INFO_KEY.as_bytes())
            .ok_or(MetainfoError::SectionDoesNotExist(INFO_KEY))?;

        if info.kind() != ValueKind::Dict {
            return Err(MetainfoError::TypeAssertion {
                section: INFO_KEY,
                expected: ValueKind::Dict,
                found: info.kind(),
            });
        }

        if order == KeyOrder::Strict {
            if let Some(key) = first_unsorted_key(&self.value) {
                return Err(MetainfoError::SelfCheckFailed(format!(
                    "dictionary key {:?} is out of order",
                    String::from_utf8_lossy(key)
                )));
            }
        }

        Ok(())
    }

    /// Lenient self-check as a boolean.
    pub fn is_valid(&self) -> bool {
        self.self_check(KeyOrder::Lenient).is_ok()
    }

    /// Derives the BTIH: the SHA-1 of the original bytes of the `info` value.
    ///
    /// Runs the lenient self-check first and returns its error unchanged. The
    /// result is cached, so later calls return the same hash without
    /// rehashing.
    pub fn calculate_hash(&self) -> Result<InfoHash, MetainfoError> {
        if let Some(hash) = self.info_hash.get() {
            return Ok(*hash);
        }

        self.self_check(KeyOrder::Lenient)?;

        let span = self
            .info_span
            .clone()
            .ok_or(MetainfoError::SectionDoesNotExist(INFO_KEY))?;
        let raw = self.source.get(span.clone()).ok_or_else(|| {
            MetainfoError::SelfCheckFailed(format!(
                "info span {}..{} is outside the {} source bytes",
                span.start,
                span.end,
                self.source.len()
            ))
        })?;

        let hash = InfoHash::from_info_bytes(raw);
        tracing::debug!("{}: info hash {} over {} bytes", self.origin, hash, raw.len());

        Ok(*self.info_hash.get_or_init(|| hash))
    }
}

fn first_unsorted_key(value: &Value) -> Option<&Bytes> {
    match value {
        Value::Integer(_) | Value::Bytes(_) => None,
        Value::List(list) => list.iter().find_map(first_unsorted_key),
        Value::Dict(dict) => dict
            .first_unsorted_key()
            .or_else(|| dict.iter().find_map(|(_, v)| first_unsorted_key(v))),
    }
}
