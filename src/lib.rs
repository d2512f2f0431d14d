//! docpath - embedded, path-addressable multi-document store
//!
//! A store holds an ordered collection of documents (trees of maps, arrays
//! and scalars), persisted as a YAML multi-document stream, and queried and
//! mutated through dotted key paths such as `spec.containers.[0].image`.
//!
//! # Quick Start
//!
//! ```
//! use docpath::{Store, Value};
//!
//! // Create an in-memory store with one empty document
//! let store = Store::ephemeral()?;
//!
//! store.upsert("metadata.name", "web")?;
//! store.upsert("spec.replicas", 3)?;
//!
//! assert_eq!(store.get_path("metadata.name")?, Value::from("web"));
//! assert_eq!(store.get_first("replicas")?, Value::Int(3));
//! # Ok::<(), docpath::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `docpath-core`: values, key paths and errors
//! - `docpath-storage`: codecs and atomic file replacement
//! - `docpath-engine`: navigation, key search, query cache, document state
//!   and the [`Store`] façade

pub use docpath_core::{Error, ErrorKind, KeyPath, Map, Result, Segment, Value};
pub use docpath_engine::{Extractor, Store, StoreBuilder, StoreConfig};

/// Lower-level building blocks
pub mod engine {
    pub use docpath_engine::{cache, navigator, search, state};
}

/// Codecs and file helpers
pub mod storage {
    pub use docpath_storage::*;
}
