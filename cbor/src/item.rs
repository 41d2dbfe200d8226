/*!
The item tree produced by decoding.

Compound items ([`Array`], [`Map`], [`Semantic`]) own their children outright.
While a parse is in flight a compound item is created as an empty shell that
knows only its declared size (or tag); children are attached in order until
the shell is complete.
*/

use super::header::MajorType;
use alloc::{borrow::ToOwned, boxed::Box, string::String, vec::Vec};
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Uint(u64),
    Nint(i64),
    Bool(bool),
    Null,
    Bstr(Vec<u8>),
    Tstr(String),
    Array(Array),
    Map(Map),
    Semantic(Semantic),
}

impl Item {
    pub fn major_type(&self) -> MajorType {
        match self {
            Item::Uint(_) => MajorType::Uint,
            Item::Nint(_) => MajorType::Nint,
            Item::Bool(_) | Item::Null => MajorType::Simple,
            Item::Bstr(_) => MajorType::Bstr,
            Item::Tstr(_) => MajorType::Tstr,
            Item::Array(_) => MajorType::Array,
            Item::Map(_) => MajorType::Map,
            Item::Semantic(_) => MajorType::Semantic,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.major_type().is_compound()
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Item::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the signed value of a `Uint` that fits in `i64`, or of a `Nint`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Item::Uint(v) => i64::try_from(*v).ok(),
            Item::Nint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Item::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Item::Null)
    }

    pub fn as_bstr(&self) -> Option<&[u8]> {
        match self {
            Item::Bstr(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_tstr(&self) -> Option<&str> {
        match self {
            Item::Tstr(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Item::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Item::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_semantic(&self) -> Option<&Semantic> {
        match self {
            Item::Semantic(s) => Some(s),
            _ => None,
        }
    }

    /// True once every declared child of this item (and of its children) is present.
    pub fn is_complete(&self) -> bool {
        match self {
            Item::Array(a) => a.is_complete() && a.iter().all(Item::is_complete),
            Item::Map(m) => {
                m.is_complete() && m.iter().all(|(k, v)| k.is_complete() && v.is_complete())
            }
            Item::Semantic(s) => s.child().is_some_and(Item::is_complete),
            _ => true,
        }
    }
}

/// A CBOR array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Array {
    size: usize,
    entries: Vec<Item>,
}

impl Array {
    /// An empty array shell expecting `size` entries.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            entries: Vec::new(),
        }
    }

    /// The declared number of entries, which may exceed those attached so far.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.size
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Item> {
        self.entries.iter()
    }

    /// Attaches the next entry.
    ///
    /// An entry beyond the declared size grows the declaration with it, so
    /// arrays built by hand stay complete.
    pub fn push(&mut self, item: impl Into<Item>) {
        if self.entries.len() == self.size {
            self.size += 1;
        }
        self.entries.push(item.into());
    }

    pub fn into_vec(self) -> Vec<Item> {
        self.entries
    }
}

impl core::ops::Index<usize> for Array {
    type Output = Item;

    fn index(&self, index: usize) -> &Item {
        &self.entries[index]
    }
}

impl<T: Into<Item>> FromIterator<T> for Array {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let entries: Vec<Item> = iter.into_iter().map(Into::into).collect();
        Self {
            size: entries.len(),
            entries,
        }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Item;
    type IntoIter = core::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A CBOR map, stored as alternating keys and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map {
    size: usize,
    entries: Vec<Item>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map shell expecting `size` key/value pairs.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            entries: Vec::new(),
        }
    }

    /// The declared number of pairs.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.size.saturating_mul(2)
    }

    /// The `index`th key/value pair.
    pub fn get(&self, index: usize) -> Option<(&Item, &Item)> {
        let key = index.checked_mul(2)?;
        Some((self.entries.get(key)?, self.entries.get(key.checked_add(1)?)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Item, &Item)> {
        self.entries.chunks_exact(2).map(|kv| (&kv[0], &kv[1]))
    }

    /// The value of the first pair whose key equals `key`.
    pub fn find(&self, key: &Item) -> Option<&Item> {
        self.iter().find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Looks up an integer label, as used by COSE headers and keys.
    pub fn get_int(&self, label: i64) -> Option<&Item> {
        self.iter()
            .find_map(|(k, v)| (k.as_int() == Some(label)).then_some(v))
    }

    pub fn get_str(&self, label: &str) -> Option<&Item> {
        self.iter()
            .find_map(|(k, v)| (k.as_tstr() == Some(label)).then_some(v))
    }

    /// Appends a key/value pair, growing the declared size past it if needed.
    pub fn insert(&mut self, key: impl Into<Item>, value: impl Into<Item>) {
        self.push_entry(key.into());
        self.push_entry(value.into());
    }

    /// Attaches the next key or value; even positions are keys.
    pub fn push_entry(&mut self, item: Item) {
        if self.entries.len() == self.size.saturating_mul(2) {
            self.size += 1;
        }
        self.entries.push(item);
    }

    /// The raw alternating key/value entries.
    pub fn entries(&self) -> &[Item] {
        &self.entries
    }
}

impl<K: Into<Item>, V: Into<Item>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Map::new();
        for (k, v) in iter {
            m.insert(k, v);
        }
        m
    }
}

/// A tagged item (CBOR major type 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Semantic {
    tag: u64,
    child: Option<Box<Item>>,
}

impl Semantic {
    pub fn new(tag: u64, child: impl Into<Item>) -> Self {
        Self {
            tag,
            child: Some(Box::new(child.into())),
        }
    }

    /// A tag shell awaiting its single child.
    pub fn with_tag(tag: u64) -> Self {
        Self { tag, child: None }
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn child(&self) -> Option<&Item> {
        self.child.as_deref()
    }

    /// Attaches the child, returning it back if one is already present.
    pub fn set_child(&mut self, item: Item) -> Result<(), Item> {
        if self.child.is_some() {
            return Err(item);
        }
        self.child = Some(Box::new(item));
        Ok(())
    }

    pub fn into_child(self) -> Option<Item> {
        self.child.map(|c| *c)
    }
}

impl From<u64> for Item {
    fn from(v: u64) -> Self {
        Item::Uint(v)
    }
}

impl From<u32> for Item {
    fn from(v: u32) -> Self {
        Item::Uint(v as u64)
    }
}

impl From<i64> for Item {
    fn from(v: i64) -> Self {
        if v < 0 {
            Item::Nint(v)
        } else {
            Item::Uint(v as u64)
        }
    }
}

impl From<i32> for Item {
    fn from(v: i32) -> Self {
        (v as i64).into()
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Item::Bool(b)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Tstr(s.to_owned())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Tstr(s)
    }
}

impl From<Vec<u8>> for Item {
    fn from(v: Vec<u8>) -> Self {
        Item::Bstr(v)
    }
}

impl From<&[u8]> for Item {
    fn from(v: &[u8]) -> Self {
        Item::Bstr(v.to_vec())
    }
}

impl From<Array> for Item {
    fn from(a: Array) -> Self {
        Item::Array(a)
    }
}

impl From<Map> for Item {
    fn from(m: Map) -> Self {
        Item::Map(m)
    }
}

impl From<Semantic> for Item {
    fn from(s: Semantic) -> Self {
        Item::Semantic(s)
    }
}

/// CBOR Diagnostic Notation (RFC 8949 §8).
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Uint(v) => write!(f, "{v}"),
            Item::Nint(v) => write!(f, "{v}"),
            Item::Bool(b) => write!(f, "{b}"),
            Item::Null => f.write_str("null"),
            Item::Bstr(v) => {
                f.write_str("h'")?;
                for b in v {
                    write!(f, "{b:02x}")?;
                }
                f.write_str("'")
            }
            Item::Tstr(s) => write_escaped(f, s),
            Item::Array(a) => {
                f.write_str("[")?;
                for (i, item) in a.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Item::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Item::Semantic(s) => match s.child() {
                Some(child) => write!(f, "{}({child})", s.tag()),
                None => write!(f, "{}(...)", s.tag()),
            },
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
