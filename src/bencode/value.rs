use bytes::Bytes;
use std::fmt;

/// A bencode value.
///
/// Bencode has four data types: integers, byte strings, lists, and dictionaries.
/// This enum represents any decoded value. It is a closed set: every consumer
/// matches all four cases, so there is no "unsupported type" at runtime.
///
/// # Examples
///
/// ```
/// use btih::bencode::Value;
///
/// let int = Value::Integer(42);
/// let string = Value::string("hello");
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let int2: Value = 42i64.into();
/// assert_eq!(int, int2);
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.as_list().map(|l| l.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary with byte string keys, in the order they were decoded.
    Dict(Dict),
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Bytes,
    List,
    Dict,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Bytes => "byte string",
            ValueKind::List => "list",
            ValueKind::Dict => "dictionary",
        };
        f.write_str(name)
    }
}

/// A bencode dictionary.
///
/// Entries keep the order in which they appeared in the source. The decoder
/// never re-sorts or deduplicates, so a non-canonical document survives
/// decoding unchanged and can be reported by [`Dict::is_sorted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict {
    entries: Vec<(Bytes, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry without checking order or uniqueness.
    pub fn push(&mut self, key: Bytes, value: Value) {
        self.entries.push((key, value));
    }

    /// Looks up the first entry with the given key.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Returns true if keys are in strictly ascending byte order.
    ///
    /// Strictly ascending implies no duplicates, which is what canonical
    /// bencode requires.
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].0 < w[1].0)
    }

    /// Returns the first key that breaks strict ascending order, if any.
    pub fn first_unsorted_key(&self) -> Option<&Bytes> {
        self.entries
            .windows(2)
            .find(|w| w[0].0 >= w[1].0)
            .map(|w| &w[1].0)
    }
}

impl FromIterator<(Bytes, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Bytes, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dict {
    type Item = (Bytes, Value);
    type IntoIter = std::vec::IntoIter<(Bytes, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    ///
    /// # Examples
    ///
    /// ```
    /// use btih::bencode::Value;
    ///
    /// let value = Value::string("hello");
    /// assert_eq!(value.as_str(), Some("hello"));
    /// ```
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::List(_) => ValueKind::List,
            Value::Dict(_) => ValueKind::Dict,
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a byte string, if it is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    ///
    /// Returns `None` if the value is not a byte string or if the bytes are not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use btih::bencode::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// let dict = value.as_dict().unwrap();
    /// assert!(dict.contains_key(b"foo"));
    /// ```
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `None` if the value is not a dictionary or if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use btih::bencode::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    /// Returns true if every dictionary in this tree has strictly ascending keys.
    pub fn is_canonical(&self) -> bool {
        match self {
            Value::Integer(_) | Value::Bytes(_) => true,
            Value::List(l) => l.iter().all(Value::is_canonical),
            Value::Dict(d) => d.is_sorted() && d.iter().all(|(_, v)| v.is_canonical()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}
