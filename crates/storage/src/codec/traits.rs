//! Document codec trait definitions.

use docpath_core::Value;

/// Document codec trait.
///
/// Converts between the in-memory document collection and the bytes of a
/// multi-document stream. Every document is encoded as one self-delimited
/// unit, so a stream is the concatenation of its documents' units.
///
/// # Thread Safety
///
/// Codecs must be `Send + Sync` so a store holding one can be shared
/// across threads.
pub trait DocumentCodec: Send + Sync {
    /// Decode every document of a stream, in order.
    ///
    /// Null documents are returned as [`Value::Null`]; filtering them is the
    /// caller's decision.
    fn decode_stream(&self, data: &[u8]) -> Result<Vec<Value>, CodecError>;

    /// Encode a single document as one unit of a stream.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Encode a document collection, omitting null documents.
    fn encode_stream(&self, documents: &[Value]) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        for doc in documents.iter().filter(|d| !d.is_null()) {
            buf.extend_from_slice(&self.encode(doc)?);
        }
        Ok(buf)
    }

    /// Unique codec identifier (as used in configuration).
    fn codec_id(&self) -> &str;
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Input could not be decoded.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// A document could not be encoded.
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Unknown codec identifier.
    #[error("Unknown codec: {0}")]
    UnknownCodec(String),
}
