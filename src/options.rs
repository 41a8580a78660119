use crate::error::ErrorList;
use crate::option::OptionRecord;
use crate::source::Source;
use crate::value::{Scalar, Value};
use chrono::{DateTime, Utc};
use std::{fs, path::Path, time::Duration};

/// A registry of typed options resolved against an ordered list of sources
///
/// Options are declared first, then [`Options::load`] resolves all of them in
/// one pass. Every source is consulted for every option, in the order the
/// sources were added, and the last source that supplies a value wins. An
/// option no source supplies receives its declared default.
///
/// # Example
/// ```rust
/// use layered_options::{MapSource, Options};
///
/// let mut options = Options::new()
///     .with_source(MapSource::from_pairs([("x", "5")]))
///     .with_source(MapSource::from_pairs([("y", "10")]));
///
/// let x = options.int("x", 0, "First value");
/// let y = options.int("y", 0, "Second value");
/// let flag = options.bool("flag", true, "Some switch");
///
/// options.load().unwrap();
/// assert_eq!(x.get(), 5);
/// assert_eq!(y.get(), 10);
/// assert!(flag.get());
/// ```
pub struct Options<'a> {
    options: Vec<OptionRecord>,
    sources: Vec<Box<dyn Source + 'a>>,
}

impl<'a> Options<'a> {
    /// Create a registry with no sources
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Create a registry reading from `sources`, in order
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Source + 'a>>,
    {
        Self {
            options: Vec::new(),
            sources: sources.into_iter().collect(),
        }
    }

    /// Append a source after the ones already configured
    ///
    /// Pass `&mut source` to keep ownership of the source.
    pub fn with_source(mut self, source: impl Source + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Declare an option backed by a new cell
    pub fn declare<T: Scalar>(
        &mut self,
        name: impl Into<String>,
        default: T,
        description: impl Into<String>,
    ) -> Value<T> {
        let cell = Value::default();
        self.declare_var(&cell, name, default, description);
        cell
    }

    /// Declare an option backed by a caller-provided cell
    pub fn declare_var<T: Scalar>(
        &mut self,
        cell: &Value<T>,
        name: impl Into<String>,
        default: T,
        description: impl Into<String>,
    ) {
        let name = name.into();
        if self.get(&name).is_some() {
            tracing::warn!(option = %name, "option declared more than once");
        }
        self.options.push(OptionRecord::new(
            name,
            description.into(),
            default,
            cell.clone(),
        ));
    }

    pub fn string(
        &mut self,
        name: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Value<String> {
        self.declare(name, default.into(), description)
    }

    pub fn string_var(
        &mut self,
        cell: &Value<String>,
        name: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.declare_var(cell, name, default.into(), description)
    }

    pub fn int(
        &mut self,
        name: impl Into<String>,
        default: i32,
        description: impl Into<String>,
    ) -> Value<i32> {
        self.declare(name, default, description)
    }

    pub fn int_var(
        &mut self,
        cell: &Value<i32>,
        name: impl Into<String>,
        default: i32,
        description: impl Into<String>,
    ) {
        self.declare_var(cell, name, default, description)
    }

    pub fn float(
        &mut self,
        name: impl Into<String>,
        default: f32,
        description: impl Into<String>,
    ) -> Value<f32> {
        self.declare(name, default, description)
    }

    pub fn float_var(
        &mut self,
        cell: &Value<f32>,
        name: impl Into<String>,
        default: f32,
        description: impl Into<String>,
    ) {
        self.declare_var(cell, name, default, description)
    }

    pub fn bool(
        &mut self,
        name: impl Into<String>,
        default: bool,
        description: impl Into<String>,
    ) -> Value<bool> {
        self.declare(name, default, description)
    }

    pub fn bool_var(
        &mut self,
        cell: &Value<bool>,
        name: impl Into<String>,
        default: bool,
        description: impl Into<String>,
    ) {
        self.declare_var(cell, name, default, description)
    }

    pub fn time(
        &mut self,
        name: impl Into<String>,
        default: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Value<DateTime<Utc>> {
        self.declare(name, default, description)
    }

    pub fn time_var(
        &mut self,
        cell: &Value<DateTime<Utc>>,
        name: impl Into<String>,
        default: DateTime<Utc>,
        description: impl Into<String>,
    ) {
        self.declare_var(cell, name, default, description)
    }

    pub fn duration(
        &mut self,
        name: impl Into<String>,
        default: Duration,
        description: impl Into<String>,
    ) -> Value<Duration> {
        self.declare(name, default, description)
    }

    pub fn duration_var(
        &mut self,
        cell: &Value<Duration>,
        name: impl Into<String>,
        default: Duration,
        description: impl Into<String>,
    ) {
        self.declare_var(cell, name, default, description)
    }

    /// Resolve every declared option
    ///
    /// All sources are loaded first. If any of them fails, the failures are
    /// returned and no option is resolved. Otherwise each option is resolved
    /// in declaration order; an option whose reads fail keeps going to the
    /// next one, and all such failures are returned together. On error, cells
    /// may hold partially resolved values.
    pub fn load(&mut self) -> Result<(), ErrorList> {
        let mut load_errors = ErrorList::new();
        for source in &mut self.sources {
            match source.load() {
                Ok(()) => tracing::debug!(source = source.name(), "source loaded"),
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "source failed to load");
                    load_errors.push(e);
                }
            }
        }
        load_errors.into_result()?;

        let mut errors = ErrorList::new();
        for option in &mut self.options {
            let scan_errors = option.scan(&self.sources);
            if !scan_errors.is_empty() {
                tracing::warn!(
                    option = option.name(),
                    errors = scan_errors.len(),
                    "option failed to resolve"
                );
                errors.extend(scan_errors);
                continue;
            }
            if option.is_resolved() {
                tracing::debug!(option = option.name(), "option resolved from sources");
            } else {
                option.set_default();
                tracing::debug!(option = option.name(), "option set to default");
            }
        }
        errors.into_result()
    }

    /// Number of declared options
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Declared options, in declaration order
    pub fn records(&self) -> impl Iterator<Item = &OptionRecord> {
        self.options.iter()
    }

    /// First option declared under `name`
    pub fn get(&self, name: &str) -> Option<&OptionRecord> {
        self.options.iter().find(|o| o.name() == name)
    }

    /// Whether the last [`load`](Self::load) found `name` in any source
    pub fn is_resolved(&self, name: &str) -> bool {
        self.get(name).is_some_and(OptionRecord::is_resolved)
    }

    /// Render the declared options as a markdown table
    pub fn docs(&self) -> String {
        let mut md = String::new();

        md.push_str("## Options Summary\n\n");
        md.push_str("| Option | Type | Description | Default |\n");
        md.push_str("|--------|------|-------------|---------|\n");
        for option in &self.options {
            let default = option.default_display();
            let default_display = if default.is_empty() {
                "-".to_string()
            } else {
                default
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                option.name(),
                option.kind(),
                option.description(),
                default_display
            ));
        }

        md
    }

    /// Write [`docs`](Self::docs) to a markdown file
    ///
    /// # Example
    /// ```no_run
    /// use layered_options::Options;
    ///
    /// let mut options = Options::new();
    /// let port = options.int("port", 8080, "Server port");
    /// options.write_docs("OPTIONS.md").unwrap();
    /// ```
    pub fn write_docs(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, self.docs())
    }
}

impl std::fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("options", &self.options)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self::new()
    }
}
