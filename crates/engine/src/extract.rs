//! Typed extraction from query results
//!
//! An [`Extractor`] walks into a value one step at a time and converts the
//! final node to a concrete type. A failing step is remembered and reported
//! by the terminal call, so chains need a single `?`:
//!
//! ```
//! use docpath_core::Value;
//! use docpath_engine::Extractor;
//!
//! let ports: Value = [("ports", vec![80, 443])].into_iter().collect();
//! let port = Extractor::new(&ports).key("ports").index(1).as_i64().unwrap();
//! assert_eq!(port, 443);
//! ```

use docpath_core::{Error, Map, Result, Segment, Value};
use std::collections::BTreeMap;

/// Chainable typed accessor over a borrowed value
#[derive(Debug)]
pub struct Extractor<'a> {
    current: Result<&'a Value>,
    trail: Vec<Segment>,
}

impl<'a> Extractor<'a> {
    /// Start extracting from `value`
    pub fn new(value: &'a Value) -> Self {
        Extractor {
            current: Ok(value),
            trail: Vec::new(),
        }
    }

    /// Step into map entry `key`
    pub fn key(mut self, key: &str) -> Self {
        self.current = match self.current {
            Ok(Value::Map(map)) => map
                .get(key)
                .ok_or_else(|| Error::KeyDoesNotExist(key.to_string())),
            Ok(_) => Err(Error::NotAMap(key.to_string())),
            Err(e) => Err(e),
        };
        self.trail.push(Segment::Key(key.to_string()));
        self
    }

    /// Step into array element `index`
    pub fn index(mut self, index: usize) -> Self {
        let segment = Segment::Index(index);
        self.current = match self.current {
            Ok(Value::Array(items)) => items.get(index).ok_or(Error::ArrayOutOfRange {
                index,
                len: items.len(),
            }),
            Ok(_) => Err(Error::NotArrayObj(segment.to_string())),
            Err(e) => Err(e),
        };
        self.trail.push(segment);
        self
    }

    fn location(&self) -> String {
        if self.trail.is_empty() {
            return ".".to_string();
        }
        self.trail
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The reached value
    pub fn value(self) -> Result<&'a Value> {
        self.current
    }

    /// A copy of the reached value
    pub fn into_value(self) -> Result<Value> {
        self.current.cloned()
    }

    /// The reached value as a string slice
    pub fn as_str(self) -> Result<&'a str> {
        let location = self.location();
        let value = self.current?;
        value.as_str().ok_or_else(|| Error::FieldNotString {
            path: location,
            found: value.type_name(),
        })
    }

    /// The reached value as an integer
    pub fn as_i64(self) -> Result<i64> {
        let value = self.current?;
        value.as_i64().ok_or_else(|| not_a("int", value))
    }

    /// The reached value as a float; integers are widened
    pub fn as_f64(self) -> Result<f64> {
        let value = self.current?;
        match value {
            Value::Int(i) => Ok(*i as f64),
            _ => value.as_f64().ok_or_else(|| not_a("float", value)),
        }
    }

    /// The reached value as a boolean
    pub fn as_bool(self) -> Result<bool> {
        let value = self.current?;
        value.as_bool().ok_or_else(|| not_a("bool", value))
    }

    /// The reached value as a map
    pub fn as_map(self) -> Result<&'a Map> {
        let value = self.current?;
        value.as_map().ok_or_else(|| not_a("map", value))
    }

    /// The reached value as an array
    pub fn as_array(self) -> Result<&'a [Value]> {
        let value = self.current?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| not_a("array", value))
    }

    /// The reached map with every value rendered as a string
    ///
    /// Scalars are rendered (`1` becomes `"1"`); nested containers and nulls
    /// fail with [`Error::FieldNotString`].
    pub fn as_string_map(self) -> Result<BTreeMap<String, String>> {
        let location = self.location();
        let map = self.as_map()?;
        map.iter()
            .map(|(key, value)| {
                let rendered = render_scalar(value, || format!("{}.{}", location, key))?;
                Ok((key.clone(), rendered))
            })
            .collect()
    }

    /// The reached array with every element rendered as a string
    pub fn as_string_array(self) -> Result<Vec<String>> {
        let location = self.location();
        let items = self.as_array()?;
        items
            .iter()
            .enumerate()
            .map(|(index, value)| render_scalar(value, || format!("{}.[{}]", location, index)))
            .collect()
    }
}

fn not_a(expected: &'static str, value: &Value) -> Error {
    Error::NotAType {
        expected,
        found: value.type_name(),
    }
}

fn render_scalar(value: &Value, location: impl FnOnce() -> String) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(value.to_string()),
        _ => Err(Error::FieldNotString {
            path: location(),
            found: value.type_name(),
        }),
    }
}
