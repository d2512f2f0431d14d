//! Operations across every document
//!
//! None of these change the active index. Upserts and updates are checked
//! against every document before any document is modified, so they either
//! apply everywhere they target or nowhere.

use super::{check_leaf_key, delete_in, Store};
use crate::navigator;
use crate::search::KeySearch;
use docpath_core::{KeyPath, Result, Value};
use std::collections::BTreeMap;
use tracing::debug;

impl Store {
    /// Set `value` at `path` in every document
    ///
    /// # Errors
    ///
    /// The first document that cannot take the upsert aborts the whole
    /// operation; no document is modified in that case.
    pub fn upsert_global(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        let path = KeyPath::parse(path)?;
        let value = value.into();
        let mut inner = self.inner.lock();

        for document in inner.state.documents() {
            navigator::validate_upsert(document, &path)?;
        }
        for document in inner.state.documents_mut() {
            navigator::upsert(document, &path, value.clone())?;
        }

        inner.cache.clear();
        inner.reload()
    }

    /// Replace the value at `path` in every document where it exists
    ///
    /// Returns the number of documents updated.
    pub fn update_global(&self, path: &str, value: impl Into<Value>) -> Result<usize> {
        let path = KeyPath::parse(path)?;
        let value = value.into();
        let mut inner = self.inner.lock();

        let targets: Vec<usize> = inner
            .state
            .documents()
            .iter()
            .enumerate()
            .filter(|(_, document)| navigator::contains_path(document, &path))
            .map(|(index, _)| index)
            .collect();

        for &index in &targets {
            let document = inner.state.document_mut(index)?;
            *navigator::get_path_mut(document, &path)? = value.clone();
            inner.cache.clear_document(index);
        }

        if !targets.is_empty() {
            inner.reload()?;
        }
        Ok(targets.len())
    }

    /// Value at `path` in every document where it resolves
    ///
    /// Returns `(document index, value)` pairs in document order.
    pub fn get_path_global(&self, path: &str) -> Result<Vec<(usize, Value)>> {
        let path = KeyPath::parse(path)?;
        let inner = self.inner.lock();

        Ok(inner
            .state
            .documents()
            .iter()
            .enumerate()
            .filter_map(|(index, document)| {
                navigator::get_path(document, &path)
                    .ok()
                    .map(|value| (index, value.clone()))
            })
            .collect())
    }

    /// Every path holding `key`, per document
    ///
    /// Documents without the key are left out of the map.
    pub fn find_keys_global(&self, key: &str) -> Result<BTreeMap<usize, Vec<KeyPath>>> {
        check_leaf_key(key)?;
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let mut found = BTreeMap::new();
        for (index, document) in inner.state.documents().iter().enumerate() {
            let paths = KeySearch::new(&mut inner.cache, index).find_keys(key, document);
            if !paths.is_empty() {
                found.insert(index, paths);
            }
        }
        Ok(found)
    }

    /// Remove `path` from every document where it resolves
    ///
    /// Returns the number of documents changed.
    pub fn delete_global(&self, path: &str) -> Result<usize> {
        let path = KeyPath::parse(path)?;
        let mut inner = self.inner.lock();

        let targets: Vec<usize> = inner
            .state
            .documents()
            .iter()
            .enumerate()
            .filter(|(_, document)| navigator::contains_path(document, &path))
            .map(|(index, _)| index)
            .collect();
        debug!(
            target: "docpath::store",
            path = %path,
            documents = targets.len(),
            "Deleting from every document"
        );

        for (done, &index) in targets.iter().enumerate() {
            if let Err(e) = delete_in(&mut inner, index, &path) {
                // Persist the documents already changed before failing
                if done > 0 {
                    inner.reload()?;
                }
                return Err(e);
            }
        }

        if !targets.is_empty() {
            inner.reload()?;
        }
        Ok(targets.len())
    }
}
