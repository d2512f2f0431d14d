//! Persistence layer for docpath
//!
//! This crate implements the collaborators the store persists through:
//! - codec: multi-document stream encoding (YAML, JSON lines)
//! - fs: directory creation, existence checks, reads, atomic replacement
//! - file: the store's backing file (path + codec)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod file;
pub mod fs;

pub use codec::{get_codec, CodecError, DocumentCodec, JsonLinesCodec, YamlCodec, DEFAULT_CODEC};
pub use file::{read_documents, DocumentFile};
