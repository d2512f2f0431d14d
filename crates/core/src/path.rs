//! Key paths into documents
//!
//! This module defines:
//! - KeyPath: an ordered, non-empty sequence of segments (e.g. `a.b.[2].c`)
//! - Segment: a map key or an array index
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Map key | `metadata` |
//! | `[n]` | Array index | `[0]` |
//! | `a.b` | Nested key | `metadata.name` |
//! | `a.[n].b` | Key, index, key | `containers.[0].image` |
//!
//! Segments are separated by `.` only; an index is a segment of its own.
//! Any empty segment (leading, trailing or doubled dot, `"."`, `""`) is
//! rejected with [`Error::EmptyKey`]. A path with no segments is rejected
//! with [`Error::InvalidKeyPath`].
//!
//! Some map keys cannot be named by any path string: the empty key, keys
//! containing `.`, and keys of the form `[N]`. See [`is_addressable_key`].
//! Paths holding such keys are rejected, whether built from segments or
//! deserialized, so every `KeyPath` displays as a string that parses back
//! to itself.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A segment in a key path
///
/// # Examples
///
/// ```
/// use docpath_core::path::Segment;
///
/// assert_eq!(Segment::parse("name"), Segment::Key("name".to_string()));
/// assert_eq!(Segment::parse("[3]"), Segment::Index(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    /// Map key: `name`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
}

impl Segment {
    /// Classify one already-split segment
    ///
    /// A segment of the form `[<digits>]` is an index, anything else is a key.
    pub fn parse(segment: &str) -> Segment {
        match parse_index(segment) {
            Ok(i) => Segment::Index(i),
            Err(_) => Segment::Key(segment.to_string()),
        }
    }

    /// Get the key, if this is a key segment
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    /// Check if this is an index segment
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Parse an index segment of the form `[N]`
///
/// # Errors
///
/// Returns [`Error::NotAnIndex`] if the brackets are missing or the content
/// is not a non-negative integer.
///
/// # Examples
///
/// ```
/// use docpath_core::path::parse_index;
///
/// assert_eq!(parse_index("[12]").unwrap(), 12);
/// assert!(parse_index("12").is_err());
/// assert!(parse_index("[a]").is_err());
/// ```
pub fn parse_index(segment: &str) -> Result<usize> {
    let digits = segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| Error::NotAnIndex(segment.to_string()))?;

    digits
        .parse::<usize>()
        .map_err(|_| Error::NotAnIndex(segment.to_string()))
}

/// Check whether a map key can appear as a key segment of a path
///
/// # Examples
///
/// ```
/// use docpath_core::path::is_addressable_key;
///
/// assert!(is_addressable_key("metadata"));
/// assert!(!is_addressable_key(""));
/// assert!(!is_addressable_key("app.kubernetes.io/name"));
/// assert!(!is_addressable_key("[0]"));
/// ```
pub fn is_addressable_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('.') && parse_index(key).is_err()
}

/// A path into a document
///
/// # Examples
///
/// ```
/// use docpath_core::path::{KeyPath, Segment};
///
/// let path = KeyPath::parse("spec.containers.[0].image").unwrap();
/// assert_eq!(path.depth(), 4);
/// assert_eq!(path.segments()[2], Segment::Index(0));
/// assert_eq!(path.to_string(), "spec.containers.[0].image");
///
/// assert!(KeyPath::parse("a..b").is_err());
/// assert!(KeyPath::parse("").is_err());
/// ```
///
/// Serializes as its display string and deserializes through
/// [`KeyPath::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Parse a dotted path string
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyKey`] if any segment is empty
    /// - [`Error::InvalidKeyPath`] if no segments remain
    pub fn parse(path: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for part in path.split('.') {
            if part.is_empty() {
                return Err(Error::EmptyKey(path.to_string()));
            }
            segments.push(Segment::parse(part));
        }
        if segments.is_empty() {
            return Err(Error::InvalidKeyPath(path.to_string()));
        }
        Ok(KeyPath { segments })
    }

    /// Create a path from segments, applying the same rules as [`parse`](Self::parse)
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKeyPath`] if `segments` is empty, or a key contains
    ///   `.` or looks like an index
    /// - [`Error::EmptyKey`] if a key is empty
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::InvalidKeyPath(String::new()));
        }
        let path = KeyPath { segments };
        for key in path.segments.iter().filter_map(Segment::as_key) {
            if key.is_empty() {
                return Err(Error::EmptyKey(path.to_string()));
            }
            if !is_addressable_key(key) {
                return Err(Error::InvalidKeyPath(path.to_string()));
            }
        }
        Ok(path)
    }

    /// Single-key path
    pub fn key(key: impl Into<String>) -> Result<Self> {
        Self::from_segments(vec![Segment::Key(key.into())])
    }

    /// Get the path segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Get the last segment
    pub fn last_segment(&self) -> &Segment {
        // Construction guarantees at least one segment.
        &self.segments[self.segments.len() - 1]
    }

    /// Split into the parent segments and the last segment
    pub fn split_last(&self) -> (&[Segment], &Segment) {
        let n = self.segments.len() - 1;
        (&self.segments[..n], &self.segments[n])
    }

    /// Get the parent path (None for a single-segment path)
    pub fn parent(&self) -> Option<KeyPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(KeyPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append a segment
    ///
    /// Fails like [`from_segments`](Self::from_segments) for a key that no
    /// path can hold.
    pub fn child(mut self, segment: Segment) -> Result<Self> {
        self.segments.push(segment);
        Self::from_segments(self.segments)
    }

    /// Check if this path is a prefix of `other` (or equal)
    pub fn is_ancestor_of(&self, other: &KeyPath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Check if this path is a proper prefix of `other`
    pub fn is_strict_ancestor_of(&self, other: &KeyPath) -> bool {
        self.segments.len() < other.segments.len() && self.is_ancestor_of(other)
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        KeyPath::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for KeyPath {
    type Error = Error;

    fn try_from(path: String) -> Result<Self> {
        KeyPath::parse(&path)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> String {
        path.to_string()
    }
}

impl AsRef<[Segment]> for KeyPath {
    fn as_ref(&self) -> &[Segment] {
        &self.segments
    }
}
