//! Multi-document state
//!
//! [`DocumentState`] owns the ordered document collection, the active
//! document index, the name registry and the import staging buffer.
//!
//! Invariants kept by every operation:
//! - `active` is a valid index whenever the collection is non-empty, and 0
//!   when it is empty
//! - every name is bound to a valid index
//! - the staging buffer is empty outside of an import

use crate::navigator;
use docpath_core::{Error, KeyPath, Result, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Documents, active index and name bindings
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    documents: Vec<Value>,
    active: usize,
    names: BTreeMap<String, usize>,
    import_buffer: Vec<Value>,
}

impl DocumentState {
    /// Create a state holding no documents
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state holding `documents`, the first one active
    pub fn with_documents(documents: Vec<Value>) -> Self {
        DocumentState {
            documents,
            ..Self::default()
        }
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check whether no documents are held
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Index of the active document
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// All documents in collection order
    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// All documents, for in-place edits that keep the collection size
    pub fn documents_mut(&mut self) -> &mut [Value] {
        &mut self.documents
    }

    /// Document at `index`
    pub fn document(&self, index: usize) -> Result<&Value> {
        self.check_index(index)?;
        Ok(&self.documents[index])
    }

    /// Document at `index`, mutably
    pub fn document_mut(&mut self, index: usize) -> Result<&mut Value> {
        self.check_index(index)?;
        Ok(&mut self.documents[index])
    }

    /// The active document
    ///
    /// Fails with [`Error::LibOutOfIndex`] when there are no documents.
    pub fn active(&self) -> Result<&Value> {
        self.document(self.active)
    }

    /// The active document, mutably
    pub fn active_mut(&mut self) -> Result<&mut Value> {
        self.document_mut(self.active)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.documents.len() {
            Ok(())
        } else {
            Err(Error::LibOutOfIndex {
                index,
                len: self.documents.len(),
            })
        }
    }

    /// Append an empty map document and make it active
    ///
    /// Returns the index of the new document.
    pub fn add_document(&mut self) -> usize {
        self.documents.push(Value::map());
        self.active = self.documents.len() - 1;
        self.active
    }

    /// Remove the document at `index` and return it
    ///
    /// Names bound to `index` are dropped and names bound to later documents
    /// follow their document down by one. The active index keeps pointing
    /// at the same document when that document survives; when the active
    /// document itself is removed the previous one becomes active.
    pub fn delete_document(&mut self, index: usize) -> Result<Value> {
        self.check_index(index)?;

        self.names.retain(|_, bound| *bound != index);
        for bound in self.names.values_mut() {
            if *bound > index {
                *bound -= 1;
            }
        }

        let removed = self.documents.remove(index);
        if self.active > index || (self.active == index && index > 0) {
            self.active -= 1;
        }
        if self.active >= self.documents.len() {
            self.active = 0;
        }
        Ok(removed)
    }

    /// Make document `index` active
    pub fn switch(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active = index;
        Ok(())
    }

    /// Make the document bound to `name` active and return its index
    ///
    /// Names are case-insensitive.
    pub fn switch_by_name(&mut self, name: &str) -> Result<usize> {
        let index = self
            .index_of(name)
            .ok_or_else(|| Error::DocNotExists(name.to_string()))?;
        self.switch(index)?;
        Ok(index)
    }

    /// Index bound to `name`, if any
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get(&name.to_lowercase()).copied()
    }

    /// Make document `index` active and bind `name` to it
    pub fn set_name(&mut self, name: &str, index: usize) -> Result<()> {
        self.switch(index)?;
        self.names.insert(name.to_lowercase(), index);
        Ok(())
    }

    /// Bind `kind/name` for every document where both paths hold strings
    ///
    /// Documents where either path is missing or not a string are skipped.
    /// The active index is left unchanged. Returns the number of documents
    /// named.
    pub fn set_names(&mut self, kind_path: &KeyPath, name_path: &KeyPath) -> usize {
        let mut bound = Vec::new();
        for (index, document) in self.documents.iter().enumerate() {
            match document_name(document, kind_path, name_path) {
                Ok(name) => bound.push((name, index)),
                Err(e) => {
                    debug!(target: "docpath::state", index, error = %e, "Document left unnamed");
                }
            }
        }

        let count = bound.len();
        self.names.extend(bound);
        count
    }

    /// All bound names, sorted
    pub fn list_names(&self) -> Vec<String> {
        self.names.keys().cloned().collect()
    }

    /// The name registry
    pub fn names(&self) -> &BTreeMap<String, usize> {
        &self.names
    }

    /// Replace the whole collection, as when re-reading the backing file
    ///
    /// The active index is clamped and names pointing past the new end are
    /// dropped.
    pub fn replace_documents(&mut self, documents: Vec<Value>) {
        self.documents = documents;
        let len = self.documents.len();
        if self.active >= len {
            self.active = len.saturating_sub(1);
        }
        self.names.retain(|_, bound| *bound < len);
    }

    /// Drop all documents and names
    pub fn clear(&mut self) {
        self.documents.clear();
        self.names.clear();
        self.import_buffer.clear();
        self.active = 0;
    }

    /// Put decoded documents in the staging buffer, replacing its content
    pub fn stage(&mut self, documents: Vec<Value>) {
        self.import_buffer = documents;
    }

    /// Number of staged documents
    pub fn staged_len(&self) -> usize {
        self.import_buffer.len()
    }

    /// Move the staged documents into the collection
    ///
    /// Null and empty documents are discarded. With `clear_existing` the
    /// current documents and names are dropped first. The staging buffer is
    /// empty afterwards. Returns the number of documents appended.
    pub fn commit_staged(&mut self, clear_existing: bool) -> usize {
        let staged = std::mem::take(&mut self.import_buffer);
        if clear_existing {
            self.clear();
        }

        let before = self.documents.len();
        self.documents
            .extend(staged.into_iter().filter(|d| !d.is_empty_document()));
        self.documents.len() - before
    }
}

/// `kind/name` for a document, lowercased
fn document_name(document: &Value, kind_path: &KeyPath, name_path: &KeyPath) -> Result<String> {
    let kind = string_at(document, kind_path)?;
    let name = string_at(document, name_path)?;
    Ok(format!("{}/{}", kind.to_lowercase(), name.to_lowercase()))
}

fn string_at<'a>(document: &'a Value, path: &KeyPath) -> Result<&'a str> {
    let value = navigator::get_path(document, path)?;
    value.as_str().ok_or_else(|| Error::FieldNotString {
        path: path.to_string(),
        found: value.type_name(),
    })
}
