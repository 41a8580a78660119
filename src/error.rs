use crate::value::Kind;
use colored::Colorize;
use std::fmt;

/// Boxed backend error carried by [`Error::Load`] and [`Error::Other`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by sources and by option resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source has no value for this option. Resolution treats this as an
    /// absence, never as a failure.
    #[error("errors.OptionNotFound{{Name='{name}'}}")]
    OptionNotFound { name: String },

    /// The source holds a value whose shape cannot become the requested kind
    #[error("errors.OptionInvalidType{{Name='{name}', Source='{found}', Target='{target}'}}")]
    OptionInvalidType {
        name: String,
        /// Description of the shape the source actually held
        found: String,
        target: Kind,
    },

    /// The source holds text that does not parse as the requested kind
    #[error(
        "errors.OptionInvalidValue{{Name='{name}', Value='{value}', Target='{target}', Reason='{reason}'}}"
    )]
    OptionInvalidValue {
        name: String,
        value: String,
        target: Kind,
        reason: String,
    },

    /// A source could not import its backing data
    #[error("{0}")]
    Load(BoxError),

    /// Any other backend failure while reading a value
    #[error("{0}")]
    Other(BoxError),
}

impl Error {
    pub fn not_found(name: &str) -> Self {
        Error::OptionNotFound {
            name: name.to_string(),
        }
    }

    pub fn invalid_type(name: &str, found: impl Into<String>, target: Kind) -> Self {
        Error::OptionInvalidType {
            name: name.to_string(),
            found: found.into(),
            target,
        }
    }

    pub fn invalid_value(
        name: &str,
        value: impl Into<String>,
        target: Kind,
        reason: impl fmt::Display,
    ) -> Self {
        Error::OptionInvalidValue {
            name: name.to_string(),
            value: value.into(),
            target,
            reason: reason.to_string(),
        }
    }

    pub fn load(err: impl Into<BoxError>) -> Self {
        Error::Load(err.into())
    }

    pub fn other(err: impl Into<BoxError>) -> Self {
        Error::Other(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::OptionNotFound { .. })
    }
}

/// An ordered collection of errors reported as one
///
/// Renders as `errors.List{e1, e2, ...}`. An empty list renders as the empty
/// string.
#[derive(Debug, Default)]
pub struct ErrorList(Vec<Error>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: Error) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Error> {
        self.0
    }

    /// `Ok(())` when empty, otherwise the list itself as the error
    pub fn into_result(self) -> Result<(), ErrorList> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.0.split_first() else {
            return Ok(());
        };
        write!(f, "errors.List{{{}", first)?;
        for error in rest {
            write!(f, ", {}", error)?;
        }
        write!(f, "}}")
    }
}

impl std::error::Error for ErrorList {}

impl From<Vec<Error>> for ErrorList {
    fn from(errors: Vec<Error>) -> Self {
        Self(errors)
    }
}

impl FromIterator<Error> for ErrorList {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Error> for ErrorList {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ErrorList {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Format an error list as a human-readable, colored multi-line report
pub fn format_errors(errors: &ErrorList) -> String {
    let details = errors
        .iter()
        .map(|e| match e {
            Error::OptionInvalidType {
                name,
                found,
                target,
            } => format!(
                "  - {}: found {} where {} was expected",
                name.magenta().bold(),
                found.red(),
                target.to_string().cyan()
            ),
            Error::OptionInvalidValue {
                name,
                value,
                target,
                reason,
            } => format!(
                "  - {}: invalid {} value {} ({})",
                name.magenta().bold(),
                target.to_string().cyan(),
                format!("'{}'", value).red(),
                reason
            ),
            other => format!("  - {}", other),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Options failed to load with {} error(s):\n{}",
        errors.len().to_string().yellow().bold(),
        details
    )
}
