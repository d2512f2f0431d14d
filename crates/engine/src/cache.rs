//! Per-document query cache
//!
//! Remembers, for each `(document index, leaf key)` pair, the paths a key
//! search found. Only paths are stored; values are always read from the
//! live tree.
//!
//! # Invariants
//!
//! - Every recorded path resolved in its document when it was recorded, and
//!   the store drops or trims buckets whenever a mutation could break that.
//! - A bucket's `first` path is one of its paths and has minimal depth
//!   among them.
//! - A bucket is dropped as soon as its `first` path is invalidated.

use docpath_core::KeyPath;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Paths recorded for one `(document, leaf key)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheBucket {
    paths: BTreeSet<KeyPath>,
    first: KeyPath,
}

impl CacheBucket {
    fn new(path: KeyPath) -> Self {
        let mut paths = BTreeSet::new();
        paths.insert(path.clone());
        CacheBucket { paths, first: path }
    }

    /// The shallowest recorded path
    pub fn first(&self) -> &KeyPath {
        &self.first
    }

    /// All recorded paths, in path order
    pub fn paths(&self) -> impl Iterator<Item = &KeyPath> {
        self.paths.iter()
    }

    /// Check whether `path` was recorded
    pub fn contains(&self, path: &KeyPath) -> bool {
        self.paths.contains(path)
    }

    /// Number of recorded paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check whether no paths are recorded
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn insert(&mut self, path: KeyPath) {
        // A later path of equal depth replaces the current first
        if path.depth() <= self.first.depth() {
            self.first = path.clone();
        }
        self.paths.insert(path);
    }
}

/// Cache of key search results, keyed by document index and leaf key
#[derive(Debug, Default)]
pub struct QueryCache {
    documents: FxHashMap<usize, FxHashMap<String, CacheBucket>>,
}

impl QueryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `path` holds `leaf_key` in document `doc`
    pub fn record(&mut self, doc: usize, leaf_key: &str, path: KeyPath) {
        let buckets = self.documents.entry(doc).or_default();
        match buckets.get_mut(leaf_key) {
            Some(bucket) => bucket.insert(path),
            None => {
                buckets.insert(leaf_key.to_string(), CacheBucket::new(path));
            }
        }
    }

    /// Get the bucket for `leaf_key` in document `doc`
    pub fn bucket(&self, doc: usize, leaf_key: &str) -> Option<&CacheBucket> {
        self.documents.get(&doc)?.get(leaf_key)
    }

    /// Check whether any bucket of document `doc` records `path`
    pub fn contains_path(&self, doc: usize, path: &KeyPath) -> bool {
        self.documents
            .get(&doc)
            .map(|buckets| buckets.values().any(|b| b.contains(path)))
            .unwrap_or(false)
    }

    /// Forget `path` and every path below it in document `doc`
    ///
    /// Buckets whose `first` path is forgotten are dropped entirely; other
    /// buckets keep their remaining paths. Returns the number of buckets
    /// dropped.
    pub fn invalidate(&mut self, doc: usize, path: &KeyPath) -> usize {
        let Some(buckets) = self.documents.get_mut(&doc) else {
            return 0;
        };

        let before = buckets.len();
        buckets.retain(|_, bucket| {
            if path.is_ancestor_of(&bucket.first) {
                return false;
            }
            bucket.paths.retain(|p| !path.is_ancestor_of(p));
            !bucket.paths.is_empty()
        });
        let dropped = before - buckets.len();

        if buckets.is_empty() {
            self.documents.remove(&doc);
        }
        dropped
    }

    /// Drop every bucket of document `doc` holding `path` or a path below it
    ///
    /// Used when the subtree at `path` moves: trimming would leave those
    /// buckets without the occurrences at the new location. Returns the
    /// number of buckets dropped.
    pub fn drop_buckets_under(&mut self, doc: usize, path: &KeyPath) -> usize {
        let Some(buckets) = self.documents.get_mut(&doc) else {
            return 0;
        };

        let before = buckets.len();
        buckets.retain(|_, bucket| !bucket.paths.iter().any(|p| path.is_ancestor_of(p)));
        let dropped = before - buckets.len();

        if buckets.is_empty() {
            self.documents.remove(&doc);
        }
        dropped
    }

    /// Drop every bucket of document `doc`
    pub fn clear_document(&mut self, doc: usize) {
        self.documents.remove(&doc);
    }

    /// Drop document `doc` and shift the buckets of later documents down
    ///
    /// Mirrors removal of a document from the collection.
    pub fn remove_document(&mut self, doc: usize) {
        self.documents = std::mem::take(&mut self.documents)
            .into_iter()
            .filter(|(index, _)| *index != doc)
            .map(|(index, buckets)| {
                if index > doc {
                    (index - 1, buckets)
                } else {
                    (index, buckets)
                }
            })
            .collect();
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Number of buckets across all documents
    pub fn bucket_count(&self) -> usize {
        self.documents.values().map(|b| b.len()).sum()
    }

    /// Check whether the cache holds no buckets
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
