use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("syntax error at {position}: unexpected byte {byte:#04x}")]
    SyntaxError { position: u64, byte: u8 },

    /// The declared byte string length, saturated at `u64::MAX` when the
    /// header itself overflows.
    #[error("length header is too big: {0}")]
    LengthTooLarge(u64),

    #[error("integer is too big: {0}")]
    IntegerTooLarge(String),

    #[error("byte string to integer conversion error: {0}")]
    Conversion(String),

    #[error("trailing data after value")]
    TrailingData,

    #[error("nesting too deep")]
    NestingTooDeep,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
