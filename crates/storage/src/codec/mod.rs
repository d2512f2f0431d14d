//! Document codec abstraction.
//!
//! The codec seam converts the in-memory document collection to and from
//! the bytes of the backing file. Everything the store persists or imports
//! goes through a [`DocumentCodec`].
//!
//! # Known Codecs
//!
//! - `"yaml"`: [`YamlCodec`], `---` separated YAML documents (default)
//! - `"json"`: [`JsonLinesCodec`], one JSON value per line
//!
//! # Usage
//!
//! ```
//! use docpath_storage::codec::get_codec;
//! use docpath_core::Value;
//!
//! let codec = get_codec("yaml").unwrap();
//! let doc: Value = [("name", "web")].into_iter().collect();
//!
//! let encoded = codec.encode_stream(&[doc.clone()]).unwrap();
//! let decoded = codec.decode_stream(&encoded).unwrap();
//!
//! assert_eq!(decoded, vec![doc]);
//! ```

mod json;
mod traits;
mod yaml;

pub use json::JsonLinesCodec;
pub use traits::{CodecError, DocumentCodec};
pub use yaml::YamlCodec;

/// Identifier of the codec used when none is configured.
pub const DEFAULT_CODEC: &str = "yaml";

/// Get a codec by its identifier.
///
/// Returns the codec if recognized, or an error for unknown codec IDs.
pub fn get_codec(codec_id: &str) -> Result<Box<dyn DocumentCodec>, CodecError> {
    match codec_id {
        "yaml" => Ok(Box::new(YamlCodec)),
        "json" => Ok(Box::new(JsonLinesCodec)),
        _ => Err(CodecError::UnknownCodec(codec_id.to_string())),
    }
}
