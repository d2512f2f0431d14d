//! Error types for docpath
//!
//! Every operation in the workspace returns [`Result`]. Shape mismatches
//! (wrong segment kind, missing key, out-of-range index) are ordinary,
//! recoverable outcomes and get their own variants. Failures coming from
//! lower layers (I/O, codecs) are wrapped together with the name of the
//! operation that failed; their kind is never rewritten.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docpath operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the document store
#[derive(Debug, Error)]
pub enum Error {
    /// A map key (or a searched leaf key) is absent
    #[error("the given key [{0}] does not exist")]
    KeyDoesNotExist(String),

    /// A key segment was applied to something that is not a map
    #[error("cannot resolve key [{0}]: target object is not a map")]
    NotAMap(String),

    /// An index segment was applied to something that is not an array
    #[error("cannot resolve {0}: received a non array object")]
    NotArrayObj(String),

    /// Array index beyond the last element
    #[error("index value ({index}) is bigger than the last index ({}) of the array to be indexed", .len.saturating_sub(1))]
    ArrayOutOfRange {
        /// The requested index
        index: usize,
        /// Length of the indexed array
        len: usize,
    },

    /// Segment is not of the form `[N]`
    #[error("object ({0}) is not an index. Index example: some.path.[0].someKey")]
    NotAnIndex(String),

    /// Path has no segments
    #[error("the key path [{0}] that was given is not valid")]
    InvalidKeyPath(String),

    /// Path contains an empty segment
    #[error("empty key in path [{0}]")]
    EmptyKey(String),

    /// File to read or merge is missing
    #[error("the given file [{}] does not exist", .0.display())]
    FileNotExist(PathBuf),

    /// A directory occupies the requested file path
    #[error("can not create file [{}], a directory exists with that name", .0.display())]
    DictNotFile(PathBuf),

    /// Document index outside the document collection
    #[error("document index {index} is out of range for {len} documents")]
    LibOutOfIndex {
        /// The requested index
        index: usize,
        /// Number of documents held
        len: usize,
    },

    /// No document is bound to the given name
    #[error("document [{0}] does not exist")]
    DocNotExists(String),

    /// A string was required
    #[error("field [{path}] is not a string, found {found}")]
    FieldNotString {
        /// Where the value was read from
        path: String,
        /// Type name of the value found
        found: &'static str,
    },

    /// Value has a different type than requested
    #[error("value is not of type {expected}, found {found}")]
    NotAType {
        /// Requested type name
        expected: &'static str,
        /// Type name of the value found
        found: &'static str,
    },

    /// I/O error, tagged with the failing operation
    #[error("I/O error during {op}: {source}")]
    Io {
        /// Operation that failed
        op: &'static str,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Encoding or decoding error, tagged with the failing operation
    #[error("codec error during {op}: {message}")]
    Codec {
        /// Operation that failed
        op: &'static str,
        /// Codec message
        message: String,
    },
}

/// Discriminant of [`Error`], convenient for matching and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::KeyDoesNotExist`]
    KeyDoesNotExist,
    /// See [`Error::NotAMap`]
    NotAMap,
    /// See [`Error::NotArrayObj`]
    NotArrayObj,
    /// See [`Error::ArrayOutOfRange`]
    ArrayOutOfRange,
    /// See [`Error::NotAnIndex`]
    NotAnIndex,
    /// See [`Error::InvalidKeyPath`]
    InvalidKeyPath,
    /// See [`Error::EmptyKey`]
    EmptyKey,
    /// See [`Error::FileNotExist`]
    FileNotExist,
    /// See [`Error::DictNotFile`]
    DictNotFile,
    /// See [`Error::LibOutOfIndex`]
    LibOutOfIndex,
    /// See [`Error::DocNotExists`]
    DocNotExists,
    /// See [`Error::FieldNotString`]
    FieldNotString,
    /// See [`Error::NotAType`]
    NotAType,
    /// See [`Error::Io`]
    Io,
    /// See [`Error::Codec`]
    Codec,
}

impl Error {
    /// Wrap an I/O error with the operation name
    pub fn io(op: &'static str, source: io::Error) -> Self {
        Error::Io { op, source }
    }

    /// Wrap a codec failure with the operation name
    pub fn codec(op: &'static str, message: impl ToString) -> Self {
        Error::Codec {
            op,
            message: message.to_string(),
        }
    }

    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::KeyDoesNotExist(_) => ErrorKind::KeyDoesNotExist,
            Error::NotAMap(_) => ErrorKind::NotAMap,
            Error::NotArrayObj(_) => ErrorKind::NotArrayObj,
            Error::ArrayOutOfRange { .. } => ErrorKind::ArrayOutOfRange,
            Error::NotAnIndex(_) => ErrorKind::NotAnIndex,
            Error::InvalidKeyPath(_) => ErrorKind::InvalidKeyPath,
            Error::EmptyKey(_) => ErrorKind::EmptyKey,
            Error::FileNotExist(_) => ErrorKind::FileNotExist,
            Error::DictNotFile(_) => ErrorKind::DictNotFile,
            Error::LibOutOfIndex { .. } => ErrorKind::LibOutOfIndex,
            Error::DocNotExists(_) => ErrorKind::DocNotExists,
            Error::FieldNotString { .. } => ErrorKind::FieldNotString,
            Error::NotAType { .. } => ErrorKind::NotAType,
            Error::Io { .. } => ErrorKind::Io,
            Error::Codec { .. } => ErrorKind::Codec,
        }
    }

    /// Check if this error means "the path does not resolve in this tree"
    ///
    /// These are the outcomes that global read operations skip over.
    pub fn is_unresolved_path(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::KeyDoesNotExist
                | ErrorKind::NotAMap
                | ErrorKind::NotArrayObj
                | ErrorKind::ArrayOutOfRange
        )
    }
}
