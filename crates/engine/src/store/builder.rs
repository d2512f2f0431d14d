//! Store builder for fluent configuration

use std::path::PathBuf;
use std::sync::Arc;

use docpath_core::{Error, Result};
use docpath_storage::{get_codec, DocumentCodec, DocumentFile};

use super::Store;
use crate::config::StoreConfig;

/// Builder for [`Store`]
///
/// # Three Ways to Open a Store
///
/// ```no_run
/// use docpath_engine::Store;
///
/// // 1. File-backed with defaults (YAML, created when missing)
/// let store = Store::open("local/db.yaml")?;
///
/// // 2. Builder for custom settings
/// let store = Store::builder()
///     .path("local/db.jsonl")
///     .codec("json")
///     .in_memory(true)
///     .open()?;
///
/// // 3. Ephemeral (no file at all)
/// let store = Store::ephemeral()?;
/// # Ok::<(), docpath_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct StoreBuilder {
    path: Option<PathBuf>,
    in_memory: bool,
    codec: String,
    create_missing: bool,
}

impl StoreBuilder {
    /// Create a builder with the default settings of [`StoreConfig`]
    pub fn new() -> Self {
        Self::from_config(&StoreConfig::default())
    }

    /// Create a builder from a loaded configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            path: config.path.clone(),
            in_memory: config.in_memory,
            codec: config.codec.clone(),
            create_missing: config.create_missing,
        }
    }

    /// Set the backing file
    ///
    /// Without a path the store is ephemeral.
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Never write the backing file after opening
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Set the codec (`"yaml"` or `"json"`)
    pub fn codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }

    /// Create the backing file when it does not exist (default: true)
    pub fn create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }

    /// Open the store
    ///
    /// # Errors
    ///
    /// - [`Error::Codec`] for an unknown codec
    /// - [`Error::FileNotExist`] if the file is missing and `create_missing`
    ///   is off
    /// - [`Error::DictNotFile`] if the path is a directory
    /// - I/O and decode errors from reading or creating the file
    pub fn open(self) -> Result<Store> {
        let codec: Arc<dyn DocumentCodec> =
            Arc::from(get_codec(&self.codec).map_err(|e| Error::codec("open", e))?);
        let file = self
            .path
            .map(|path| DocumentFile::new(path, Arc::clone(&codec)));
        Store::open_with(file, codec, self.in_memory, self.create_missing)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
