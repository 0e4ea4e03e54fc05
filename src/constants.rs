//! Decoder limits and defaults.
//!
//! These bound how much work a single decode may do. They are the defaults
//! behind [`DecoderConfig`](crate::bencode::DecoderConfig) and can be
//! overridden per decode.

// ============================================================================
// Decoder limits
// ============================================================================

/// Maximum byte string length (64 MiB). Large enough for the `pieces` field
/// of a multi-terabyte torrent.
pub const MAX_STRING_LENGTH: u64 = 67_108_864;

/// Maximum decimal digits in an integer, excluding the sign.
/// `i64::MAX` has 19 digits.
pub const MAX_INTEGER_DIGITS: usize = 19;

/// Maximum list/dictionary nesting depth.
pub const MAX_DEPTH: usize = 64;

// ============================================================================
// Metainfo
// ============================================================================

/// Root dictionary key whose value is hashed to produce the info hash.
pub const INFO_KEY: &str = "info";

/// Length of a v1 (SHA-1) info hash in bytes.
pub const INFO_HASH_LEN: usize = 20;
