use thiserror::Error;

use crate::bencode::{BencodeError, ValueKind};

/// Errors that can occur when turning a source into a [`DecodedObject`].
///
/// [`DecodedObject`]: super::DecodedObject
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The source does not contain valid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// A required dictionary key is absent, or the root is not a dictionary.
    #[error("section does not exist: {0}")]
    SectionDoesNotExist(&'static str),

    /// A section exists but holds the wrong kind of value.
    #[error("type assertion error: {section} is a {found}, expected a {expected}")]
    TypeAssertion {
        section: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },

    /// The decoded structure does not have the required shape.
    #[error("self-check error: {0}")]
    SelfCheckFailed(String),

    /// The source was used before it was opened.
    #[error("source is not initialized")]
    NotInitialized,

    /// The info hash has an invalid length or is not valid hex.
    #[error("invalid info hash")]
    InvalidInfoHash,

    /// An I/O error occurred while reading or releasing the source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Releasing the source failed while another error was already being
    /// returned. Both causes are kept.
    #[error("{primary}: {release}")]
    Combined {
        primary: Box<MetainfoError>,
        release: Box<MetainfoError>,
    },
}

impl MetainfoError {
    /// Merges an error raised while releasing a resource into the result of
    /// the work done with it.
    ///
    /// A release error never replaces an earlier failure.
    pub fn combine<T>(
        result: Result<T, MetainfoError>,
        release: Result<(), MetainfoError>,
    ) -> Result<T, MetainfoError> {
        match (result, release) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(release)) => Err(release),
            (Err(primary), Ok(())) => Err(primary),
            (Err(primary), Err(release)) => Err(MetainfoError::Combined {
                primary: Box::new(primary),
                release: Box::new(release),
            }),
        }
    }
}
