use super::error::BencodeError;
use super::value::{Dict, Value};
use crate::constants::{MAX_DEPTH, MAX_INTEGER_DIGITS, MAX_STRING_LENGTH};
use bytes::Bytes;
use std::io::{BufRead, ErrorKind, Read};
use std::ops::Range;

/// Limits applied while decoding.
///
/// Every limit is checked before the corresponding allocation or recursion,
/// so a hostile length header or nesting chain fails fast instead of
/// exhausting memory or stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest byte string length accepted, in bytes.
    pub max_string_length: u64,
    /// Largest number of decimal digits accepted in an integer (sign excluded).
    pub max_integer_digits: usize,
    /// Deepest list/dictionary nesting accepted. The root value is depth 0.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_string_length: MAX_STRING_LENGTH,
            max_integer_digits: MAX_INTEGER_DIGITS,
            max_depth: MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    pub fn with_max_string_length(mut self, max: u64) -> Self {
        self.max_string_length = max;
        self
    }

    pub fn with_max_integer_digits(mut self, max: usize) -> Self {
        self.max_integer_digits = max;
        self
    }

    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }
}

/// Streaming recursive-descent bencode decoder.
///
/// Reads exactly one value from the wrapped reader and stops at its last
/// byte; anything after it is left unread. The absolute offset of every
/// byte consumed is tracked so that, when the root value is a dictionary,
/// the span of each top-level entry's value can be looked up afterwards
/// with [`Decoder::section_span`].
///
/// A decoder that returned an error must not be reused: the reader is left
/// somewhere inside the failed value.
///
/// # Examples
///
/// ```
/// use btih::bencode::Decoder;
///
/// let data = b"d4:infod4:name4:testee";
/// let mut decoder = Decoder::new(&data[..]);
/// let value = decoder.decode_value().unwrap();
///
/// assert!(value.get(b"info").is_some());
/// assert_eq!(decoder.section_span(b"info"), Some(7..21));
/// ```
pub struct Decoder<R> {
    reader: R,
    pos: u64,
    config: DecoderConfig,
    sections: Vec<(Bytes, Range<u64>)>,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            reader,
            pos: 0,
            config,
            sections: Vec::new(),
        }
    }

    /// Number of bytes consumed from the reader so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Returns the byte range of the value stored under `key` in the root
    /// dictionary of the last decoded value.
    ///
    /// Offsets are relative to where the reader was when the decoder was
    /// created. If the key occurs more than once, the first occurrence wins,
    /// matching [`Dict::get`].
    pub fn section_span(&self, key: &[u8]) -> Option<Range<u64>> {
        self.sections
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, span)| span.clone())
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decodes one value starting at the current position.
    pub fn decode_value(&mut self) -> Result<Value, BencodeError> {
        self.sections.clear();
        let start = self.pos;
        let value = self.read_value(0)?;
        tracing::trace!(
            "decoded {} spanning bytes {}..{}",
            value.kind(),
            start,
            self.pos
        );
        Ok(value)
    }

    fn peek(&mut self) -> Result<u8, BencodeError> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return buf.first().copied().ok_or(BencodeError::UnexpectedEof),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn next_byte(&mut self) -> Result<u8, BencodeError> {
        let b = self.peek()?;
        self.reader.consume(1);
        self.pos += 1;
        Ok(b)
    }

    fn read_value(&mut self, depth: usize) -> Result<Value, BencodeError> {
        if depth > self.config.max_depth {
            return Err(BencodeError::NestingTooDeep);
        }

        match self.peek()? {
            b'i' => self.read_integer(),
            b'l' => self.read_list(depth),
            b'd' => self.read_dict(depth),
            b'0'..=b'9' => self.read_bytes().map(Value::Bytes),
            byte => Err(BencodeError::SyntaxError {
                position: self.pos,
                byte,
            }),
        }
    }

    fn read_integer(&mut self) -> Result<Value, BencodeError> {
        self.next_byte()?;

        let mut raw = Vec::new();
        let mut digits = 0usize;
        loop {
            match self.next_byte()? {
                b'e' => break,
                b'-' if raw.is_empty() => raw.push(b'-'),
                b @ b'0'..=b'9' => {
                    let leading_zero = raw == b"0";
                    raw.push(b);
                    if leading_zero || raw == b"-0" {
                        return Err(BencodeError::Conversion(lossy(&raw)));
                    }
                    digits += 1;
                    if digits > self.config.max_integer_digits {
                        return Err(BencodeError::IntegerTooLarge(lossy(&raw)));
                    }
                }
                b => {
                    raw.push(b);
                    return Err(BencodeError::Conversion(lossy(&raw)));
                }
            }
        }

        parse_integer(&raw).map(Value::Integer)
    }

    fn read_bytes(&mut self) -> Result<Bytes, BencodeError> {
        let len = self.read_length_header()?;
        if len > self.config.max_string_length {
            return Err(BencodeError::LengthTooLarge(len));
        }

        // Grows with the bytes actually present, not with the declared length.
        let mut buf = Vec::new();
        let read = (&mut self.reader).take(len).read_to_end(&mut buf)? as u64;
        self.pos += read;
        if read < len {
            return Err(BencodeError::UnexpectedEof);
        }

        Ok(Bytes::from(buf))
    }

    /// Reads `<length>:` and returns the declared length.
    ///
    /// A header that does not fit in a `u64` fails as soon as it overflows,
    /// reporting `u64::MAX`.
    fn read_length_header(&mut self) -> Result<u64, BencodeError> {
        let mut len: u64 = 0;
        let mut digits = 0usize;
        let mut leading_zero = false;

        loop {
            let position = self.pos;
            let byte = self.next_byte()?;
            match byte {
                b':' if digits > 0 => break,
                b'0'..=b'9' => {
                    if leading_zero {
                        return Err(BencodeError::SyntaxError { position, byte });
                    }
                    leading_zero = digits == 0 && byte == b'0';
                    digits += 1;
                    len = len
                        .checked_mul(10)
                        .and_then(|l| l.checked_add(u64::from(byte - b'0')))
                        .ok_or(BencodeError::LengthTooLarge(u64::MAX))?;
                }
                _ => return Err(BencodeError::SyntaxError { position, byte }),
            }
        }

        Ok(len)
    }

    fn read_list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.next_byte()?;
        let mut list = Vec::new();

        while self.peek()? != b'e' {
            list.push(self.read_value(depth + 1)?);
        }

        self.next_byte()?;
        Ok(Value::List(list))
    }

    fn read_dict(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.next_byte()?;
        let mut dict = Dict::new();

        loop {
            let byte = self.peek()?;
            if byte == b'e' {
                break;
            }
            if !byte.is_ascii_digit() {
                return Err(BencodeError::SyntaxError {
                    position: self.pos,
                    byte,
                });
            }

            let key = self.read_bytes()?;
            let start = self.pos;
            let value = self.read_value(depth + 1)?;
            if depth == 0 {
                self.sections.push((key.clone(), start..self.pos));
            }
            dict.push(key, value);
        }

        self.next_byte()?;
        Ok(Value::Dict(dict))
    }
}

/// Decodes a complete buffer holding exactly one value.
///
/// # Errors
///
/// Returns [`BencodeError::TrailingData`] if bytes remain after the value.
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let (value, consumed) = decode_prefix(data)?;

    if consumed != data.len() {
        return Err(BencodeError::TrailingData);
    }

    Ok(value)
}

/// Decodes the value at the start of `data` and returns it together with the
/// number of bytes it occupied. Bytes after the value are ignored.
pub fn decode_prefix(data: &[u8]) -> Result<(Value, usize), BencodeError> {
    let mut decoder = Decoder::new(data);
    let value = decoder.decode_value()?;
    // The position never exceeds data.len(), which already fits in usize.
    Ok((value, decoder.position() as usize))
}

fn parse_integer(raw: &[u8]) -> Result<i64, BencodeError> {
    let text = lossy(raw);
    let (negative, digits) = match raw.strip_prefix(b"-") {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if digits.is_empty() {
        return Err(BencodeError::Conversion(text));
    }

    if digits[0] == b'0' && (digits.len() > 1 || negative) {
        return Err(BencodeError::Conversion(text));
    }

    text.parse()
        .map_err(|_| BencodeError::IntegerTooLarge(text))
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
