use super::Source;
use super::text::{TextSource, text_reads};
use crate::error::Error;
use std::collections::HashMap;

/// Source backed by environment variables
///
/// The process environment is captured when the source is loaded, so values
/// set after [`Options::load`](crate::Options::load) are not observed. An
/// optional prefix is prepended to every option name before lookup.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
    vars: HashMap<String, String>,
    fixed: bool,
}

impl EnvSource {
    /// Read from the process environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from a fixed set of variables instead of the process environment
    pub fn from_vars<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: None,
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            fixed: true,
        }
    }

    /// Look up `PREFIX` + name, e.g. `APP_` + `port` reads `APP_port`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn key<'a>(&self, name: &'a str) -> std::borrow::Cow<'a, str> {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, name).into(),
            None => name.into(),
        }
    }
}

impl TextSource for EnvSource {
    fn text(&self, name: &str) -> Option<&str> {
        self.vars.get(&*self.key(name)).map(String::as_str)
    }
}

impl Source for EnvSource {
    fn name(&self) -> &str {
        "env"
    }

    fn load(&mut self) -> Result<(), Error> {
        if self.fixed {
            return Ok(());
        }
        // Variables that are not valid unicode cannot back an option
        self.vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        tracing::debug!(count = self.vars.len(), "captured environment");
        Ok(())
    }

    text_reads!();
}
