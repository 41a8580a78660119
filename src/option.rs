use crate::error::Error;
use crate::source::Source;
use crate::value::{Kind, Scalar, Value};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A default paired with the cell it falls back into
#[derive(Debug)]
pub struct Slot<T> {
    default: T,
    cell: Value<T>,
}

impl<T: Scalar> Slot<T> {
    pub(crate) fn new(default: T, cell: Value<T>) -> Self {
        Self { default, cell }
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn cell(&self) -> &Value<T> {
        &self.cell
    }

    /// Read from every source in order; each success overwrites the cell
    fn scan(&self, name: &str, sources: &[Box<dyn Source + '_>]) -> (bool, Vec<Error>) {
        let mut resolved = false;
        let mut errors = Vec::new();

        for source in sources {
            match T::read(&**source, name) {
                Ok(value) => {
                    tracing::trace!(option = name, source = source.name(), "value found");
                    self.cell.set(value);
                    resolved = true;
                }
                Err(Error::OptionNotFound { .. }) => {
                    tracing::trace!(option = name, source = source.name(), "not found");
                }
                Err(e) => errors.push(e),
            }
        }

        (resolved, errors)
    }

    fn set_default(&self) {
        self.cell.set(self.default.clone());
    }
}

/// Where a resolved option is written, one variant per scalar kind
#[derive(Debug)]
pub enum Target {
    String(Slot<String>),
    Int(Slot<i32>),
    Float(Slot<f32>),
    Bool(Slot<bool>),
    Time(Slot<DateTime<Utc>>),
    Duration(Slot<Duration>),
}

impl Target {
    pub fn kind(&self) -> Kind {
        match self {
            Target::String(_) => Kind::String,
            Target::Int(_) => Kind::Int,
            Target::Float(_) => Kind::Float,
            Target::Bool(_) => Kind::Bool,
            Target::Time(_) => Kind::Time,
            Target::Duration(_) => Kind::Duration,
        }
    }

    fn render_default(&self) -> String {
        match self {
            Target::String(slot) => slot.default.render(),
            Target::Int(slot) => slot.default.render(),
            Target::Float(slot) => slot.default.render(),
            Target::Bool(slot) => slot.default.render(),
            Target::Time(slot) => slot.default.render(),
            Target::Duration(slot) => slot.default.render(),
        }
    }
}

/// One declared option
#[derive(Debug)]
pub struct OptionRecord {
    name: String,
    description: String,
    target: Target,
    resolved: bool,
}

impl OptionRecord {
    pub(crate) fn new<T: Scalar>(
        name: String,
        description: String,
        default: T,
        cell: Value<T>,
    ) -> Self {
        Self {
            name,
            description,
            target: T::into_target(default, cell),
            resolved: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> Kind {
        self.target.kind()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Whether the last resolution pass found a value in any source
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn default_display(&self) -> String {
        self.target.render_default()
    }

    /// Consult every source for this option
    ///
    /// Returns every error other than not-found. The resolved flag is reset
    /// first so a repeated pass reflects only the current sources.
    pub(crate) fn scan(&mut self, sources: &[Box<dyn Source + '_>]) -> Vec<Error> {
        let name = self.name.as_str();
        let (resolved, errors) = match &self.target {
            Target::String(slot) => slot.scan(name, sources),
            Target::Int(slot) => slot.scan(name, sources),
            Target::Float(slot) => slot.scan(name, sources),
            Target::Bool(slot) => slot.scan(name, sources),
            Target::Time(slot) => slot.scan(name, sources),
            Target::Duration(slot) => slot.scan(name, sources),
        };
        self.resolved = resolved;
        errors
    }

    pub(crate) fn set_default(&self) {
        match &self.target {
            Target::String(slot) => slot.set_default(),
            Target::Int(slot) => slot.set_default(),
            Target::Float(slot) => slot.set_default(),
            Target::Bool(slot) => slot.set_default(),
            Target::Time(slot) => slot.set_default(),
            Target::Duration(slot) => slot.set_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MapSource;

    fn sources(list: Vec<MapSource>) -> Vec<Box<dyn Source>> {
        list.into_iter()
            .map(|s| Box::new(s) as Box<dyn Source>)
            .collect()
    }

    #[test]
    fn test_record_metadata() {
        let record = OptionRecord::new(
            "port".to_string(),
            "Server port".to_string(),
            8080,
            Value::default(),
        );

        assert_eq!(record.name(), "port");
        assert_eq!(record.description(), "Server port");
        assert_eq!(record.kind(), Kind::Int);
        assert_eq!(record.default_display(), "8080");
        assert!(!record.is_resolved());
    }

    #[test]
    fn test_scan_last_source_wins() {
        let cell = Value::default();
        let mut record = OptionRecord::new("x".to_string(), String::new(), 0, cell.clone());
        let sources = sources(vec![
            MapSource::from_pairs([("x", "1")]),
            MapSource::from_pairs([("x", "2")]),
            MapSource::new(),
        ]);

        let errors = record.scan(&sources);

        assert!(errors.is_empty());
        assert!(record.is_resolved());
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn test_scan_collects_errors_and_keeps_going() {
        let cell = Value::default();
        let mut record = OptionRecord::new("x".to_string(), String::new(), 0, cell.clone());
        let sources = sources(vec![
            MapSource::from_pairs([("x", "nope")]),
            MapSource::from_pairs([("x", "7")]),
        ]);

        let errors = record.scan(&sources);

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], Error::OptionInvalidValue { .. }));
        assert!(record.is_resolved());
        assert_eq!(cell.get(), 7);
    }

    #[test]
    fn test_set_default_writes_default() {
        let cell = Value::default();
        let mut record =
            OptionRecord::new("flag".to_string(), String::new(), true, cell.clone());

        assert!(record.scan(&[]).is_empty());
        assert!(!record.is_resolved());

        record.set_default();
        assert!(cell.get());
    }
}
