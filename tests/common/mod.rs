//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub use docpath::{ErrorKind, KeyPath, Store, Value};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

/// Multi-document manifest: five resources plus a null and an empty document
pub const MANIFESTS: &str = r#"---
apiVersion: v1
kind: Service
metadata:
  name: web
  labels:
    app: web
    version: v0.1.0
spec:
  selector:
    app: web
    version: v0.1.0
  ports:
    - port: 80
      targetPort: 8080
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  labels:
    app: web
    version: v0.1.0
spec:
  replicas: 2
  selector:
    matchLabels:
      app: web
      version: v0.1.0
  template:
    metadata:
      labels:
        app: web
        version: v0.1.0
    spec:
      containers:
        - name: web
          image: registry.local/web:0.1.0
          ports:
            - containerPort: 8080
---
~
---
apiVersion: autoscaling/v2
kind: HorizontalPodAutoscaler
metadata:
  name: web
spec:
  minReplicas: 2
  maxReplicas: 5
---
{}
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: Web-Settings
  labels:
    app: web
    version: v0.1.0
data:
  LOG_LEVEL: info
---
apiVersion: v1
kind: Secret
metadata:
  labels:
    app: web
    version: v0.1.0
"#;

/// Number of non-empty documents in [`MANIFESTS`]
pub const MANIFEST_DOCUMENTS: usize = 5;

/// Parse a key path, panicking on bad syntax
pub fn path(s: &str) -> KeyPath {
    KeyPath::parse(s).expect("valid key path")
}

/// Build a map value from entries
pub fn map(entries: Vec<(&str, Value)>) -> Value {
    entries.into_iter().collect()
}

/// Write `contents` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let file = dir.join(name);
    fs::write(&file, contents).expect("write fixture");
    file
}

// ============================================================================
// TestStore - file-backed store in a temporary directory
// ============================================================================

/// File-backed store living in its own temporary directory
pub struct TestStore {
    pub store: Store,
    pub dir: TempDir,
    pub file: PathBuf,
}

impl TestStore {
    /// Open a fresh store at `<tmp>/local/db.yaml`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("local").join("db.yaml");
        let store = Store::open(&file).expect("open store");
        TestStore { store, dir, file }
    }

    /// Open a second, independent store on the same file
    pub fn reopen(&self) -> Store {
        Store::open(&self.file).expect("reopen store")
    }

    /// Write a fixture file next to the store
    pub fn fixture(&self, name: &str, contents: &str) -> PathBuf {
        write_file(self.dir.path(), name, contents)
    }

    /// Raw content of the backing file
    pub fn file_text(&self) -> String {
        fs::read_to_string(&self.file).expect("read store file")
    }
}
