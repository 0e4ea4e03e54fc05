//! Torrent metainfo structure checks and info hash derivation ([BEP-3]).
//!
//! A torrent file is a bencoded dictionary whose `info` entry describes the
//! shared content. The SHA-1 of the `info` value, taken over its bytes exactly
//! as they appear in the file, is the info hash (BTIH) that identifies the
//! torrent on trackers, in the DHT and in magnet links.
//!
//! # Examples
//!
//! ```
//! use btih::bencode::DecoderConfig;
//! use btih::metainfo::{DecodedObject, InfoHash};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = b"d8:announce15:http://test.com4:infod6:lengthi100e4:name4:testee".to_vec();
//! let object = DecodedObject::from_bytes("example.torrent", data, &DecoderConfig::default())?;
//!
//! let hash = object.calculate_hash()?;
//! assert_eq!(hash, InfoHash::from_info_bytes(b"d6:lengthi100e4:name4:teste"));
//! assert_eq!(hash.to_hex().len(), 40);
//! # Ok(())
//! # }
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decoded;
mod error;
mod info_hash;

pub use decoded::{DecodedObject, KeyOrder};
pub use error::MetainfoError;
pub use info_hash::InfoHash;
