//! Store struct and open/close logic
//!
//! [`Store`] wires the document state, the key search, the query cache and
//! the backing file together behind one lock:
//! - single-document queries and mutations always target the active document
//! - every mutation of a file-backed store ends with a reload (write the
//!   whole collection atomically, then read it back) unless the store is in
//!   memory-only mode
//! - the all-documents variants (`*_global`) iterate every document and
//!   leave the active index alone
//!
//! ## Opening a store
//!
//! ```
//! use docpath_engine::Store;
//!
//! let store = Store::ephemeral().unwrap();
//! store.upsert("spec.replicas", 3).unwrap();
//! assert_eq!(store.get_path("spec.replicas").unwrap(), docpath_core::Value::Int(3));
//! ```

mod builder;
mod global;

pub use builder::StoreBuilder;

use crate::cache::QueryCache;
use crate::config::StoreConfig;
use crate::navigator;
use crate::search::KeySearch;
use crate::state::DocumentState;
use docpath_core::{is_addressable_key, Error, KeyPath, Result, Value};
use docpath_storage::{read_documents, DocumentCodec, DocumentFile};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything the store mutates, guarded by one lock
struct StoreInner {
    state: DocumentState,
    cache: QueryCache,
    file: Option<DocumentFile>,
    in_memory: bool,
}

impl StoreInner {
    fn persists(&self) -> bool {
        self.file.is_some() && !self.in_memory
    }

    /// Write the collection and read it back
    fn reload(&mut self) -> Result<()> {
        if !self.persists() {
            return Ok(());
        }
        self.write()?;
        self.read_back()
    }

    fn write(&self) -> Result<()> {
        match &self.file {
            Some(file) => file.save(self.state.documents()),
            None => Ok(()),
        }
    }

    fn read_back(&mut self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let documents = file.load()?;
        if documents.len() != self.state.len() {
            // Paths no longer line up with document indices
            self.cache.clear();
        }
        debug!(
            target: "docpath::store",
            documents = documents.len(),
            "Reloaded documents"
        );
        self.state.replace_documents(documents);
        Ok(())
    }

    fn active_index(&self) -> usize {
        self.state.active_index()
    }
}

// ============================================================================
// Store
// ============================================================================

/// Embedded multi-document store addressed by dotted key paths
///
/// # Thread Safety
///
/// `Store` is `Send + Sync`. Every operation takes the internal lock once
/// for its whole read/modify/write cycle.
pub struct Store {
    inner: Mutex<StoreInner>,
    codec: Arc<dyn DocumentCodec>,
}

impl Store {
    /// Create a builder
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Open the file-backed store at `path` with default settings
    ///
    /// The file (and its directory) is created holding one empty document if
    /// it does not exist yet.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Create a store that lives only in memory, holding one empty document
    pub fn ephemeral() -> Result<Self> {
        Self::builder().open()
    }

    /// Open a store as described by `config`
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        StoreBuilder::from_config(config).open()
    }

    pub(crate) fn open_with(
        file: Option<DocumentFile>,
        codec: Arc<dyn DocumentCodec>,
        in_memory: bool,
        create_missing: bool,
    ) -> Result<Self> {
        let mut state = DocumentState::new();
        let mut created = false;

        if let Some(file) = &file {
            if file.exists()? {
                state.replace_documents(file.load()?);
            } else if create_missing {
                created = true;
            } else {
                return Err(Error::FileNotExist(file.path().to_path_buf()));
            }
        }
        if state.is_empty() {
            state.add_document();
        }

        let inner = StoreInner {
            state,
            cache: QueryCache::new(),
            file,
            in_memory,
        };
        if created && !in_memory {
            inner.write()?;
        }

        info!(
            target: "docpath::store",
            path = ?inner.file.as_ref().map(|f| f.path().to_path_buf()),
            codec = codec.codec_id(),
            documents = inner.state.len(),
            in_memory,
            "Opened store"
        );

        Ok(Store {
            inner: Mutex::new(inner),
            codec,
        })
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<PathBuf> {
        self.inner
            .lock()
            .file
            .as_ref()
            .map(|f| f.path().to_path_buf())
    }

    /// Identifier of the codec used for the backing file and imports
    pub fn codec_id(&self) -> &str {
        self.codec.codec_id()
    }

    // ========================================================================
    // Queries on the active document
    // ========================================================================

    /// Value at `path` in the active document
    ///
    /// # Errors
    ///
    /// Path syntax errors, or the navigation errors of
    /// [`navigator::get_path`].
    pub fn get_path(&self, path: &str) -> Result<Value> {
        let path = KeyPath::parse(path)?;
        let inner = self.inner.lock();
        navigator::get_path(inner.state.active()?, &path).cloned()
    }

    /// Every path of the active document whose last key is `key`
    ///
    /// Returns an empty list when the key occurs nowhere. Map keys that no
    /// path can address are skipped, and asking for one fails with
    /// [`Error::InvalidKeyPath`].
    pub fn find_keys(&self, key: &str) -> Result<Vec<KeyPath>> {
        check_leaf_key(key)?;
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let active = inner.state.active_index();
        let document = inner.state.active()?;
        Ok(KeySearch::new(&mut inner.cache, active).find_keys(key, document))
    }

    /// The shallowest path holding `key` in the active document, with its value
    pub fn find_shallowest(&self, key: &str) -> Result<(KeyPath, Value)> {
        check_leaf_key(key)?;
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let active = inner.state.active_index();
        let document = inner.state.active()?;
        let (path, value) = KeySearch::new(&mut inner.cache, active).find_shallowest(key, document)?;
        Ok((path, value.clone()))
    }

    /// Value of the shallowest occurrence of `key`
    pub fn get_first(&self, key: &str) -> Result<Value> {
        self.find_shallowest(key).map(|(_, value)| value)
    }

    /// Paths cached for `key` in the active document
    pub fn cached_paths(&self, key: &str) -> Option<Vec<KeyPath>> {
        let inner = self.inner.lock();
        inner
            .cache
            .bucket(inner.active_index(), key)
            .map(|bucket| bucket.paths().cloned().collect())
    }

    /// Current value at `path` if the cache recorded it for `key`
    pub fn cached_value(&self, key: &str, path: &KeyPath) -> Option<Value> {
        let inner = self.inner.lock();
        let bucket = inner.cache.bucket(inner.active_index(), key)?;
        if !bucket.contains(path) {
            return None;
        }
        let document = inner.state.active().ok()?;
        navigator::get_path(document, path).ok().cloned()
    }

    // ========================================================================
    // Mutations of the active document
    // ========================================================================

    /// Set `value` at `path` in the active document
    ///
    /// Missing intermediate maps are created. On error the document is left
    /// unchanged.
    pub fn upsert(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        let path = KeyPath::parse(path)?;
        let mut inner = self.inner.lock();
        let active = inner.active_index();
        navigator::upsert(inner.state.active_mut()?, &path, value.into())?;
        inner.cache.clear_document(active);
        inner.reload()
    }

    /// Replace the value at `path`, which must already exist
    pub fn update(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        let path = KeyPath::parse(path)?;
        let mut inner = self.inner.lock();
        let active = inner.active_index();
        let document = inner.state.active_mut()?;
        *navigator::get_path_mut(document, &path)? = value.into();
        inner.cache.clear_document(active);
        inner.reload()
    }

    /// Remove the value at `path` from the active document and return it
    pub fn delete(&self, path: &str) -> Result<Value> {
        let path = KeyPath::parse(path)?;
        let mut inner = self.inner.lock();
        let active = inner.active_index();
        let removed = delete_in(&mut inner, active, &path)?;
        inner.reload()?;
        Ok(removed)
    }

    /// Upsert every top-level entry of the first document of `path` into the
    /// active document
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotExist`] / [`Error::DictNotFile`] for a bad `path`
    /// - [`Error::NotAType`] if the first document is not a map
    /// - [`Error::NotAMap`] if the active document is not a map
    pub fn merge_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let documents = read_documents(path, self.codec.as_ref())?;
        let entries = match documents.into_iter().find(|d| !d.is_null()) {
            Some(Value::Map(entries)) => entries,
            Some(other) => {
                return Err(Error::NotAType {
                    expected: "map",
                    found: other.type_name(),
                })
            }
            None => return Ok(()),
        };

        let mut inner = self.inner.lock();
        let active = inner.active_index();
        let target = inner
            .state
            .active_mut()?
            .as_map_mut()
            .ok_or_else(|| Error::NotAMap(".".to_string()))?;
        let merged = entries.len();
        target.extend(entries);
        inner.cache.clear_document(active);
        info!(target: "docpath::store", path = %path.display(), merged, "Merged file");
        inner.reload()
    }

    // ========================================================================
    // Document management
    // ========================================================================

    /// Number of documents
    pub fn document_count(&self) -> usize {
        self.inner.lock().state.len()
    }

    /// Index of the active document
    pub fn active_index(&self) -> usize {
        self.inner.lock().active_index()
    }

    /// Copy of every document
    pub fn documents(&self) -> Vec<Value> {
        self.inner.lock().state.documents().to_vec()
    }

    /// Copy of the active document
    pub fn active_document(&self) -> Result<Value> {
        self.inner.lock().state.active().cloned()
    }

    /// Append an empty document, make it active and return its index
    pub fn add_document(&self) -> Result<usize> {
        let mut inner = self.inner.lock();
        let index = inner.state.add_document();
        inner.reload()?;
        Ok(index)
    }

    /// Remove document `index`
    ///
    /// Later documents move down by one, together with their names and
    /// cached paths.
    pub fn delete_document(&self, index: usize) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.state.delete_document(index)?;
        inner.cache.remove_document(index);
        inner.reload()
    }

    /// Remove every document and name
    pub fn delete_all(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.state.clear();
        inner.cache.clear();
        inner.reload()
    }

    /// Make document `index` active
    pub fn switch(&self, index: usize) -> Result<()> {
        self.inner.lock().state.switch(index)
    }

    /// Make the document bound to `name` active and return its index
    pub fn switch_by_name(&self, name: &str) -> Result<usize> {
        self.inner.lock().state.switch_by_name(name)
    }

    /// Make document `index` active and bind `name` (lowercased) to it
    pub fn set_name(&self, name: &str, index: usize) -> Result<()> {
        self.inner.lock().state.set_name(name, index)
    }

    /// Name every document `kind/name` from the strings at the two paths
    ///
    /// Documents lacking either string stay unnamed. Returns the number of
    /// documents named.
    pub fn set_names(&self, kind_path: &str, name_path: &str) -> Result<usize> {
        let kind_path = KeyPath::parse(kind_path)?;
        let name_path = KeyPath::parse(name_path)?;
        Ok(self.inner.lock().state.set_names(&kind_path, &name_path))
    }

    /// Index bound to `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.inner.lock().state.index_of(name)
    }

    /// All document names, sorted
    pub fn list_names(&self) -> Vec<String> {
        self.inner.lock().state.list_names()
    }

    /// Append the non-empty documents of the stream file at `path`
    ///
    /// With `clear_existing` the current documents and names are dropped
    /// first. Returns the number of documents appended.
    pub fn import_documents(&self, path: impl AsRef<Path>, clear_existing: bool) -> Result<usize> {
        let documents = read_documents(path.as_ref(), self.codec.as_ref())?;
        self.import_values(documents, clear_existing)
    }

    /// Like [`import_documents`](Self::import_documents), from encoded bytes
    pub fn import_bytes(&self, data: &[u8], clear_existing: bool) -> Result<usize> {
        let documents = self
            .codec
            .decode_stream(data)
            .map_err(|e| Error::codec("import", e))?;
        self.import_values(documents, clear_existing)
    }

    fn import_values(&self, documents: Vec<Value>, clear_existing: bool) -> Result<usize> {
        let mut inner = self.inner.lock();
        let decoded = documents.len();
        inner.state.stage(documents);
        let added = inner.state.commit_staged(clear_existing);
        if clear_existing {
            inner.cache.clear();
        }

        if added < decoded {
            warn!(
                target: "docpath::store",
                discarded = decoded - added,
                "Discarded empty documents during import"
            );
        }
        info!(target: "docpath::store", added, clear_existing, "Imported documents");
        inner.reload()?;
        Ok(added)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Replace the documents with the content of the backing file
    ///
    /// The query cache is cleared. Without a backing file this is a no-op.
    pub fn read(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        let Some(file) = &inner.file else {
            return Ok(());
        };
        let documents = file.load()?;
        inner.state.replace_documents(documents);
        inner.cache.clear();
        Ok(())
    }

    /// Write the documents to the backing file, even in memory-only mode
    pub fn write(&self) -> Result<()> {
        self.inner.lock().write()
    }

    /// Write unless memory-only, then drop all documents, names and cache
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.persists() {
            inner.write()?;
        }
        inner.state.clear();
        inner.cache.clear();
        info!(target: "docpath::store", "Closed store");
        Ok(())
    }

    /// Switch memory-only mode on or off
    ///
    /// In memory-only mode mutations never touch the backing file; call
    /// [`write`](Self::write) to persist explicitly.
    pub fn set_in_memory(&self, in_memory: bool) {
        self.inner.lock().in_memory = in_memory;
    }

    /// Check whether mutations skip the backing file
    pub fn is_in_memory(&self) -> bool {
        !self.inner.lock().persists()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Store")
            .field("file", &inner.file)
            .field("documents", &inner.state.len())
            .field("active", &inner.state.active_index())
            .field("in_memory", &inner.in_memory)
            .finish()
    }
}

/// Delete `path` from document `doc` and keep the cache consistent
fn delete_in(inner: &mut StoreInner, doc: usize, path: &KeyPath) -> Result<Value> {
    let document = inner.state.document_mut(doc)?;
    let moved = navigator::swap_source(document, path);
    let removed = navigator::delete_path(document, path)?;

    inner.cache.invalidate(doc, path);
    if let Some(moved) = moved {
        // The moved element's occurrences now live at `path`
        inner.cache.drop_buckets_under(doc, &moved);
    }
    Ok(removed)
}

fn check_leaf_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::EmptyKey(key.to_string()));
    }
    if !is_addressable_key(key) {
        return Err(Error::InvalidKeyPath(key.to_string()));
    }
    Ok(())
}
