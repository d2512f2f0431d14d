//! JSON-lines codec.
//!
//! One compact JSON value per line. Decoding accepts any whitespace
//! separated sequence of JSON values.

use super::traits::{CodecError, DocumentCodec};
use docpath_core::Value;

/// JSON-lines codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesCodec;

impl DocumentCodec for JsonLinesCodec {
    fn decode_stream(&self, data: &[u8]) -> Result<Vec<Value>, CodecError> {
        serde_json::Deserializer::from_slice(data)
            .into_iter::<serde_json::Value>()
            .map(|doc| {
                doc.map(Value::from)
                    .map_err(|e| CodecError::DecodeError(e.to_string()))
            })
            .collect()
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let mut line =
            serde_json::to_vec(value).map_err(|e| CodecError::EncodeError(e.to_string()))?;
        line.push(b'\n');
        Ok(line)
    }

    fn codec_id(&self) -> &str {
        "json"
    }
}
