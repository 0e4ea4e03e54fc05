//! btih - Bencode decoding and BitTorrent info hashes
//!
//! This library decodes bencoded data such as `.torrent` files into a typed
//! value tree and derives the v1 info hash (BTIH) from the exact bytes of the
//! `info` dictionary.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode decoding
//! - [`metainfo`] - Metainfo self-check and info hash derivation
//! - [`source`] - File and in-memory byte sources, and the checked decode pipeline
//! - [`constants`] - Decoder limits and defaults
//!
//! # Example
//!
//! ```
//! use btih::{parse, MemorySource, ParseConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = MemorySource::new("inline", &b"d4:infod6:lengthi100e4:name4:testee"[..]);
//! let object = parse(&mut source, &ParseConfig::default())?;
//! assert_eq!(
//!     object.calculate_hash()?.to_hex(),
//!     "5894119219a94140d5274470f2da8bf7a2b06e39"
//! );
//! # Ok(())
//! # }
//! ```

pub mod bencode;
pub mod constants;
pub mod metainfo;
pub mod source;

pub use bencode::{
    decode, decode_prefix, BencodeError, Decoder, DecoderConfig, Dict, Value, ValueKind,
};
pub use metainfo::{DecodedObject, InfoHash, KeyOrder, MetainfoError};
pub use source::{parse, FileSource, MemorySource, ParseConfig, Source};
