//! Bencode decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ```
//! use btih::bencode::{decode, Value};
//!
//! let value = decode(b"i42e").unwrap();
//! assert_eq!(value.as_integer(), Some(42));
//!
//! let value = decode(b"4:spam").unwrap();
//! assert_eq!(value.as_str(), Some("spam"));
//!
//! let value = decode(b"l4:spami42ee").unwrap();
//! assert_eq!(value.as_list().map(|l| l.len()), Some(2));
//!
//! let value = decode(b"d3:foo3:bare").unwrap();
//! assert_eq!(value.get(b"foo"), Some(&Value::string("bar")));
//! ```
//!
//! Reading from a stream and keeping whatever follows the value:
//!
//! ```
//! use btih::bencode::{Decoder, DecoderConfig};
//!
//! let input: &[u8] = b"l1:ai1eetrailing";
//! let mut decoder = Decoder::with_config(input, DecoderConfig::default().with_max_depth(4));
//! let value = decoder.decode_value().unwrap();
//! assert_eq!(value.as_list().map(|l| l.len()), Some(2));
//! assert_eq!(decoder.position(), 8);
//! ```
//!
//! # Dictionary key order
//!
//! Canonical bencode requires dictionary keys in strictly ascending byte
//! order. The decoder accepts unsorted and duplicate keys and keeps them in
//! source order; [`Value::is_canonical`] reports whether a tree conforms.
//!
//! # Error Handling
//!
//! - [`BencodeError::UnexpectedEof`] - Input ended unexpectedly
//! - [`BencodeError::SyntaxError`] - Unexpected byte at a known position
//! - [`BencodeError::Conversion`] - Malformed integer (e.g., leading zeros, `-0`)
//! - [`BencodeError::IntegerTooLarge`] - Integer exceeds the digit limit or `i64`
//! - [`BencodeError::LengthTooLarge`] - Byte string length exceeds the limit
//! - [`BencodeError::NestingTooDeep`] - Recursion limit exceeded
//! - [`BencodeError::TrailingData`] - Extra data after the value (only [`decode`])
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod error;
mod value;

pub use decode::{decode, decode_prefix, Decoder, DecoderConfig};
pub use error::BencodeError;
pub use value::{Dict, Value, ValueKind};

#[cfg(test)]
mod tests;
