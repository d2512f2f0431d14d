//! YAML multi-document codec (default).
//!
//! Documents are separated by `---` markers. On decode, non-string map keys
//! (`1: x`, `true: y`) are converted to their string form, and tags are
//! dropped in favour of the tagged value.

use super::traits::{CodecError, DocumentCodec};
use docpath_core::{Map, Value};
use serde::Deserialize;

/// YAML codec
///
/// # Example
///
/// ```
/// use docpath_storage::codec::{DocumentCodec, YamlCodec};
/// use docpath_core::Value;
///
/// let codec = YamlCodec;
/// let docs = codec.decode_stream(b"kind: Service\n---\nkind: Deployment\n").unwrap();
/// assert_eq!(docs.len(), 2);
/// assert_eq!(docs[1].get("kind"), Some(&Value::from("Deployment")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn decode_stream(&self, data: &[u8]) -> Result<Vec<Value>, CodecError> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_slice(data) {
            let raw = serde_yaml::Value::deserialize(document)
                .map_err(|e| CodecError::DecodeError(e.to_string()))?;
            documents.push(from_yaml(raw)?);
        }
        Ok(documents)
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let body =
            serde_yaml::to_string(value).map_err(|e| CodecError::EncodeError(e.to_string()))?;
        let mut unit = Vec::with_capacity(body.len() + 4);
        unit.extend_from_slice(b"---\n");
        unit.extend_from_slice(body.as_bytes());
        Ok(unit)
    }

    fn codec_id(&self) -> &str {
        "yaml"
    }
}

fn from_yaml(raw: serde_yaml::Value) -> Result<Value, CodecError> {
    Ok(match raw {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                map.insert(key_to_string(k)?, from_yaml(v)?);
            }
            Value::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn key_to_string(key: serde_yaml::Value) -> Result<String, CodecError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
        other => Err(CodecError::DecodeError(format!(
            "unsupported map key: {:?}",
            other
        ))),
    }
}
