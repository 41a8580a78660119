use super::Source;
use super::text::{TextSource, text_reads};
use crate::error::Error;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source backed by a dotenv file
///
/// The file is parsed on load without touching the process environment. A
/// missing or malformed file fails the load.
#[derive(Debug, Clone)]
pub struct DotenvSource {
    path: PathBuf,
    vars: HashMap<String, String>,
}

impl DotenvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            vars: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for DotenvSource {
    fn text(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl Source for DotenvSource {
    fn name(&self) -> &str {
        "dotenv"
    }

    fn load(&mut self) -> Result<(), Error> {
        let path = self.path.display();
        let iter = dotenvy::from_path_iter(&self.path)
            .map_err(|e| Error::load(format!("failed to read {}: {}", path, e)))?;

        self.vars = iter
            .collect::<Result<_, _>>()
            .map_err(|e| Error::load(format!("failed to parse {}: {}", path, e)))?;
        tracing::debug!(%path, count = self.vars.len(), "loaded dotenv file");
        Ok(())
    }

    text_reads!();
}
