//! Store configuration via TOML
//!
//! A config file only needs the keys it changes; everything else falls back
//! to [`StoreConfig::default`].

use docpath_core::{Error, Result};
use docpath_storage::DEFAULT_CODEC;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Store configuration loaded from TOML.
///
/// # Example
///
/// ```toml
/// path = "/var/lib/app/state.yaml"
/// codec = "yaml"
/// in_memory = false
/// create_missing = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing file. Without one the store is ephemeral.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Keep every change in memory and never write the backing file.
    #[serde(default)]
    pub in_memory: bool,
    /// Codec of the backing file: `"yaml"` or `"json"`.
    #[serde(default = "default_codec")]
    pub codec: String,
    /// Create the backing file with one empty document when it is missing.
    #[serde(default = "default_create_missing")]
    pub create_missing: bool,
}

fn default_codec() -> String {
    DEFAULT_CODEC.to_string()
}

fn default_create_missing() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            in_memory: false,
            codec: default_codec(),
            create_missing: default_create_missing(),
        }
    }
}

impl StoreConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docpath store configuration
#
# Backing file. Leave unset for an ephemeral store.
# path = "state.yaml"

# Codec of the backing file: "yaml" (default) or "json" (one document per line)
codec = "yaml"

# Never write the backing file (default: false)
in_memory = false

# Create the backing file when it does not exist (default: true)
create_missing = true
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if the text is not a valid config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::codec("config", e))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotExist(path.to_path_buf()),
            _ => Error::io("config", e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize this config to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::codec("config", e))
    }
}
