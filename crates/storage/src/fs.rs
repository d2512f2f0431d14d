//! Filesystem operations used by the store
//!
//! Writes never modify the target in place: the new content goes to a
//! temporary file (prefix `.tx.`) in the target's directory, which is then
//! renamed over the target. Readers therefore observe either the old or the
//! new file, never a partial one. No fsync is issued.

use docpath_core::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Prefix of the temporary files created by [`atomic_replace`]
pub const TEMP_PREFIX: &str = ".tx.";

/// Create a directory and its parents if they do not exist
///
/// Directories are created with mode `0700` on unix.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| Error::io("ensure_dir", e))
}

/// Check whether a regular file exists at `path`
///
/// # Errors
///
/// Returns [`Error::DictNotFile`] if a directory occupies the path.
pub fn exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(Error::DictNotFile(path.to_path_buf())),
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io("exists", e)),
    }
}

/// Read a whole file
///
/// # Errors
///
/// Returns [`Error::FileNotExist`] if nothing exists at `path`.
pub fn read_all(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotExist(path.to_path_buf()),
        _ => Error::io("read", e),
    })
}

/// Replace the content of `path` atomically (temp file + rename)
pub fn atomic_replace(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| Error::io("write", e))?;
    tmp.write_all(bytes).map_err(|e| Error::io("write", e))?;
    tmp.persist(path).map_err(|e| Error::io("write", e.error))?;
    Ok(())
}
