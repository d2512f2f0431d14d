//! Core types for docpath
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: recursive tree node (null, scalars, arrays, maps)
//! - KeyPath / Segment: dotted paths into a document
//! - Error / ErrorKind: the typed error hierarchy and `Result` alias

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod path;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use path::{is_addressable_key, parse_index, KeyPath, Segment};
pub use value::{Map, Value};
