//! The file backing a store
//!
//! A [`DocumentFile`] pairs a path with a codec and knows how to load the
//! document collection from it and write the collection back.

use crate::codec::DocumentCodec;
use crate::fs;
use docpath_core::{Error, Result, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Multi-document file on disk
#[derive(Clone)]
pub struct DocumentFile {
    path: PathBuf,
    codec: Arc<dyn DocumentCodec>,
}

impl DocumentFile {
    /// Create a handle; nothing is touched on disk
    pub fn new(path: impl Into<PathBuf>, codec: Arc<dyn DocumentCodec>) -> Self {
        DocumentFile {
            path: path.into(),
            codec,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Codec used for this file
    pub fn codec(&self) -> &dyn DocumentCodec {
        self.codec.as_ref()
    }

    /// Check whether the file exists
    ///
    /// Fails with [`Error::DictNotFile`] if a directory occupies the path.
    pub fn exists(&self) -> Result<bool> {
        fs::exists(&self.path)
    }

    /// Create the parent directory if needed
    pub fn ensure_parent_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) => fs::ensure_dir(dir),
            None => Ok(()),
        }
    }

    /// Read every non-null document from the file
    pub fn load(&self) -> Result<Vec<Value>> {
        let mut documents = read_documents(&self.path, self.codec())?;
        documents.retain(|d| !d.is_null());
        debug!(
            target: "docpath::storage",
            path = %self.path.display(),
            documents = documents.len(),
            "Loaded documents"
        );
        Ok(documents)
    }

    /// Atomically replace the file with the encoded documents
    ///
    /// Null documents are omitted.
    pub fn save(&self, documents: &[Value]) -> Result<()> {
        self.ensure_parent_dir()?;
        let bytes = self
            .codec
            .encode_stream(documents)
            .map_err(|e| Error::codec("write", e))?;
        fs::atomic_replace(&self.path, &bytes)?;
        debug!(
            target: "docpath::storage",
            path = %self.path.display(),
            bytes = bytes.len(),
            "Wrote documents"
        );
        Ok(())
    }
}

impl std::fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile")
            .field("path", &self.path)
            .field("codec", &self.codec.codec_id())
            .finish()
    }
}

/// Read and decode every document of a stream file, nulls included
///
/// # Errors
///
/// - [`Error::DictNotFile`] if `path` is a directory
/// - [`Error::FileNotExist`] if `path` does not exist
/// - [`Error::Codec`] if the content cannot be decoded
pub fn read_documents(path: &Path, codec: &dyn DocumentCodec) -> Result<Vec<Value>> {
    if !fs::exists(path)? {
        return Err(Error::FileNotExist(path.to_path_buf()));
    }
    let bytes = fs::read_all(path)?;
    codec
        .decode_stream(&bytes)
        .map_err(|e| Error::codec("read", e))
}
