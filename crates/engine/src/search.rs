//! Leaf key search
//!
//! [`find_one`] walks a document depth-first, map entries in key order and
//! array elements in index order, and stops at the first map entry whose key
//! equals the leaf key. The entry's value is not searched further.
//!
//! [`find_all`] repeats that search on a private copy of the document,
//! deleting each match before searching again, until nothing is left. The
//! caller's document is never modified.
//!
//! [`KeySearch`] layers the per-document [`QueryCache`] on top.

use crate::cache::QueryCache;
use crate::navigator;
use docpath_core::{is_addressable_key, Error, KeyPath, Result, Segment, Value};

/// Find the first occurrence of `leaf_key` in `document`
///
/// Returns the full path to the match and the value stored there. Map keys
/// that no path can address are neither matched nor descended into: the
/// empty key, keys containing `.` (`app.kubernetes.io/name`) and keys of the
/// form `[N]`. See [`is_addressable_key`].
pub fn find_one<'a>(leaf_key: &str, document: &'a Value) -> Option<(KeyPath, &'a Value)> {
    let mut trail = Vec::new();
    let found = descend(leaf_key, document, &mut trail)?;
    let path = KeyPath::from_segments(trail).ok()?;
    Some((path, found))
}

fn descend<'a>(leaf_key: &str, node: &'a Value, trail: &mut Vec<Segment>) -> Option<&'a Value> {
    match node {
        Value::Map(map) => {
            for (key, child) in map {
                if !is_addressable_key(key) {
                    continue;
                }
                trail.push(Segment::Key(key.clone()));
                if key == leaf_key {
                    return Some(child);
                }
                if let Some(found) = descend(leaf_key, child, trail) {
                    return Some(found);
                }
                trail.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                trail.push(Segment::Index(index));
                if let Some(found) = descend(leaf_key, child, trail) {
                    return Some(found);
                }
                trail.pop();
            }
        }
        _ => {}
    }
    None
}

/// Find every occurrence of `leaf_key` in `document`
///
/// Paths are returned in discovery order. Occurrences nested under another
/// occurrence are not reported, since the outer match is consumed whole.
pub fn find_all(leaf_key: &str, document: &Value) -> Vec<KeyPath> {
    let mut scratch = document.clone();
    let mut found = Vec::new();
    loop {
        let path = match find_one(leaf_key, &scratch) {
            Some((path, _)) => path,
            None => break,
        };
        // Consume the match so the next round moves past it
        if navigator::delete_path(&mut scratch, &path).is_err() {
            break;
        }
        found.push(path);
    }
    found
}

/// Pick the path with the fewest segments
///
/// Among paths of equal depth the later one wins.
pub fn shallowest(paths: &[KeyPath]) -> Option<&KeyPath> {
    paths.iter().fold(None, |best, path| match best {
        Some(current) if path.depth() > current.depth() => Some(current),
        _ => Some(path),
    })
}

/// Key search over one document, backed by the query cache
pub struct KeySearch<'c> {
    cache: &'c mut QueryCache,
    doc: usize,
}

impl<'c> KeySearch<'c> {
    /// Search document `doc`, recording results in `cache`
    pub fn new(cache: &'c mut QueryCache, doc: usize) -> Self {
        KeySearch { cache, doc }
    }

    /// Every path holding `leaf_key`
    ///
    /// A cached bucket for the key answers directly; otherwise the document
    /// is searched and each path that resolves is recorded.
    pub fn find_keys(&mut self, leaf_key: &str, document: &Value) -> Vec<KeyPath> {
        if let Some(bucket) = self.cache.bucket(self.doc, leaf_key) {
            return bucket.paths().cloned().collect();
        }

        let paths = find_all(leaf_key, document);
        for path in &paths {
            if navigator::contains_path(document, path) {
                self.cache.record(self.doc, leaf_key, path.clone());
            }
        }
        paths
    }

    /// The shallowest path holding `leaf_key`, with its value
    ///
    /// # Errors
    ///
    /// [`Error::KeyDoesNotExist`] if the key occurs nowhere in the document.
    pub fn find_shallowest<'d>(
        &mut self,
        leaf_key: &str,
        document: &'d Value,
    ) -> Result<(KeyPath, &'d Value)> {
        if let Some(bucket) = self.cache.bucket(self.doc, leaf_key) {
            let first = bucket.first().clone();
            let value = navigator::get_path(document, &first)?;
            return Ok((first, value));
        }

        let paths = self.find_keys(leaf_key, document);
        let best = shallowest(&paths)
            .cloned()
            .ok_or_else(|| Error::KeyDoesNotExist(leaf_key.to_string()))?;
        let value = navigator::get_path(document, &best)?;
        Ok((best, value))
    }
}
