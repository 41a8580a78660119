use super::Source;
use super::text;
use crate::error::Error;
use crate::value::Kind;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

enum Input {
    Reader(Box<dyn Read + Send + Sync>),
    Path(PathBuf),
}

/// Source backed by a JSON object
///
/// Keys are matched against option names at the top level of the document.
/// Typed reads accept the native JSON shape or its text form, so both
/// `{"port": 8080}` and `{"port": "8080"}` resolve an int option.
pub struct JsonSource {
    input: Option<Input>,
    values: Map<String, Value>,
}

impl JsonSource {
    /// Decode from a reader on load. The reader is consumed by the first load.
    pub fn from_reader(reader: impl Read + Send + Sync + 'static) -> Self {
        Self {
            input: Some(Input::Reader(Box::new(reader))),
            values: Map::new(),
        }
    }

    /// Decode the file at `path` on every load
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            input: Some(Input::Path(path.as_ref().to_path_buf())),
            values: Map::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Self {
        Self::from_reader(std::io::Cursor::new(json.as_bytes().to_vec()))
    }

    fn lookup(&self, name: &str) -> Result<&Value, Error> {
        self.values.get(name).ok_or_else(|| Error::not_found(name))
    }
}

impl std::fmt::Debug for JsonSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSource")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

/// Name of a JSON value's shape, used in type errors
fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode(reader: impl Read) -> Result<Map<String, Value>, Error> {
    match serde_json::from_reader(reader) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::load(format!(
            "json document must be an object, found {}",
            shape(&other)
        ))),
        Err(e) => Err(Error::load(e)),
    }
}

impl Source for JsonSource {
    fn name(&self) -> &str {
        "json"
    }

    fn load(&mut self) -> Result<(), Error> {
        self.values = match self.input.take() {
            Some(Input::Reader(reader)) => decode(reader)?,
            Some(Input::Path(path)) => {
                let file = File::open(&path).map_err(|e| {
                    Error::load(format!("failed to open {}: {}", path.display(), e))
                })?;
                let values = decode(BufReader::new(file))?;
                self.input = Some(Input::Path(path));
                values
            }
            // Reader already consumed by an earlier load
            None => return Ok(()),
        };
        tracing::debug!(count = self.values.len(), "decoded json document");
        Ok(())
    }

    fn string(&self, name: &str) -> Result<String, Error> {
        match self.lookup(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::invalid_type(name, shape(other), Kind::String)),
        }
    }

    fn int(&self, name: &str) -> Result<i32, Error> {
        match self.lookup(name)? {
            Value::String(s) => text::int(name, Some(s)),
            Value::Number(n) => {
                let wide = match n.as_i64() {
                    Some(i) => i,
                    // Fractional numbers truncate toward zero
                    None => n.as_f64().map(|f| f.trunc() as i64).unwrap_or(i64::MAX),
                };
                i32::try_from(wide)
                    .map_err(|e| Error::invalid_value(name, n.to_string(), Kind::Int, e))
            }
            other => Err(Error::invalid_type(name, shape(other), Kind::Int)),
        }
    }

    fn float(&self, name: &str) -> Result<f32, Error> {
        match self.lookup(name)? {
            Value::String(s) => text::float(name, Some(s)),
            Value::Number(n) => n
                .as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| Error::invalid_type(name, "number", Kind::Float)),
            other => Err(Error::invalid_type(name, shape(other), Kind::Float)),
        }
    }

    fn bool(&self, name: &str) -> Result<bool, Error> {
        match self.lookup(name)? {
            Value::String(s) => text::bool(name, Some(s)),
            Value::Bool(b) => Ok(*b),
            other => Err(Error::invalid_type(name, shape(other), Kind::Bool)),
        }
    }

    fn time(&self, name: &str) -> Result<DateTime<Utc>, Error> {
        match self.lookup(name)? {
            Value::String(s) => text::time(name, Some(s)),
            other => Err(Error::invalid_type(name, shape(other), Kind::Time)),
        }
    }

    fn duration(&self, name: &str) -> Result<Duration, Error> {
        match self.lookup(name)? {
            Value::String(s) => text::duration(name, Some(s)),
            other => Err(Error::invalid_type(name, shape(other), Kind::Duration)),
        }
    }
}
