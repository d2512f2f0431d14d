//! Query engine and store for docpath
//!
//! This crate builds the store on top of the core types and the storage
//! layer:
//! - navigator: resolve, upsert and delete by key path
//! - search: leaf key search (first, all, shallowest)
//! - cache: per-document memo of search results
//! - state: document collection, active document, names
//! - store: the `Store` façade, single-document and global operations
//!
//! The store is the only component that knows about:
//! - Cache invalidation on mutation
//! - Reloading the backing file after each mutation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod extract;
pub mod navigator;
pub mod search;
pub mod state;
pub mod store;

pub use cache::{CacheBucket, QueryCache};
pub use config::StoreConfig;
pub use extract::Extractor;
pub use search::{find_all, find_one, KeySearch};
pub use state::DocumentState;
pub use store::{Store, StoreBuilder};
