use super::error::MetainfoError;
use crate::constants::INFO_HASH_LEN;
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// A v1 BitTorrent info hash (BTIH): the SHA-1 of the bencoded `info`
/// dictionary exactly as it appears in the torrent file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InfoHash([u8; INFO_HASH_LEN]);

impl InfoHash {
    /// Hashes the raw bytes of an `info` dictionary.
    pub fn from_info_bytes(info: &[u8]) -> Self {
        let digest = Sha1::digest(info);
        let mut arr = [0u8; INFO_HASH_LEN];
        arr.copy_from_slice(&digest);
        Self(arr)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetainfoError> {
        let arr: [u8; INFO_HASH_LEN] = bytes
            .try_into()
            .map_err(|_| MetainfoError::InvalidInfoHash)?;
        Ok(Self(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, MetainfoError> {
        let bytes = hex_decode(s).ok_or(MetainfoError::InvalidInfoHash)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; INFO_HASH_LEN] {
        &self.0
    }

    /// Lower-case hex form, as used in magnet links.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl From<[u8; INFO_HASH_LEN]> for InfoHash {
    fn from(bytes: [u8; INFO_HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for InfoHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for InfoHash {
    type Err = MetainfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
        s
    })
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
