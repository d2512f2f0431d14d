//! Store Integration Tests
//!
//! End-to-end behavior of the public `Store` API, organized by concern:
//! - paths: navigation, upsert and delete through key paths
//! - search: key search and the query cache
//! - documents: multi-document state and naming
//! - globals: operations across every document
//! - persistence: backing file, import, merge, lifecycle

#[path = "../common/mod.rs"]
mod common;

mod documents;
mod globals;
mod search;
