use super::Source;
use super::text::{TextSource, text_reads};
use crate::error::Error;
use std::collections::HashMap;

/// In-memory source of text values
///
/// # Example
/// ```rust
/// use layered_options::{MapSource, Options};
///
/// let mut options = Options::new().with_source(MapSource::from_pairs([("port", "9000")]));
/// let port = options.int("port", 8080, "Server port");
///
/// options.load().unwrap();
/// assert_eq!(port.get(), 9000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TextSource for MapSource {
    fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl Source for MapSource {
    fn name(&self) -> &str {
        "map"
    }

    fn load(&mut self) -> Result<(), Error> {
        Ok(())
    }

    text_reads!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_typed_reads() {
        let source = MapSource::from_pairs([
            ("name", "svc"),
            ("port", "8080"),
            ("ratio", "0.5"),
            ("debug", "true"),
            ("started", "2019-05-23T00:00:00Z"),
            ("timeout", "30s"),
        ]);

        assert_eq!(source.string("name").unwrap(), "svc");
        assert_eq!(source.int("port").unwrap(), 8080);
        assert_eq!(source.float("ratio").unwrap(), 0.5);
        assert!(source.bool("debug").unwrap());
        assert_eq!(
            source.time("started").unwrap().to_rfc3339(),
            "2019-05-23T00:00:00+00:00"
        );
        assert_eq!(source.duration("timeout").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_key() {
        let source = MapSource::new();
        assert!(source.string("anything").unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_overwrites() {
        let mut source = MapSource::from_pairs([("port", "1")]);
        source.set("port", "2");
        assert_eq!(source.len(), 1);
        assert_eq!(source.int("port").unwrap(), 2);
    }
}
