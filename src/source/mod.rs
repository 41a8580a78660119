//! Backing stores that options are resolved from.
//!
//! Every store implements [`Source`]: a one-shot [`Source::load`] that imports
//! the raw data, followed by typed reads. A read for a key the store does not
//! hold fails with [`Error::OptionNotFound`], which the registry treats as an
//! absence rather than a failure.

mod dotenv;
mod env;
mod flags;
mod json;
mod map;
pub(crate) mod text;

pub use dotenv::DotenvSource;
pub use env::EnvSource;
pub use flags::FlagSource;
pub use json::JsonSource;
pub use map::MapSource;

use crate::error::Error;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A store options can be read from
pub trait Source: Send + Sync {
    /// Short label used in log output
    fn name(&self) -> &str {
        "source"
    }

    /// Import the backing data. Called once per resolution pass, before any read.
    fn load(&mut self) -> Result<(), Error>;

    fn string(&self, name: &str) -> Result<String, Error>;

    fn int(&self, name: &str) -> Result<i32, Error>;

    fn float(&self, name: &str) -> Result<f32, Error>;

    fn bool(&self, name: &str) -> Result<bool, Error>;

    fn time(&self, name: &str) -> Result<DateTime<Utc>, Error>;

    fn duration(&self, name: &str) -> Result<Duration, Error>;
}

macro_rules! forward_source {
    ($ty:ty) => {
        impl<S: Source + ?Sized> Source for $ty {
            fn name(&self) -> &str {
                (**self).name()
            }

            fn load(&mut self) -> Result<(), Error> {
                (**self).load()
            }

            fn string(&self, name: &str) -> Result<String, Error> {
                (**self).string(name)
            }

            fn int(&self, name: &str) -> Result<i32, Error> {
                (**self).int(name)
            }

            fn float(&self, name: &str) -> Result<f32, Error> {
                (**self).float(name)
            }

            fn bool(&self, name: &str) -> Result<bool, Error> {
                (**self).bool(name)
            }

            fn time(&self, name: &str) -> Result<DateTime<Utc>, Error> {
                (**self).time(name)
            }

            fn duration(&self, name: &str) -> Result<Duration, Error> {
                (**self).duration(name)
            }
        }
    };
}

forward_source!(&mut S);
forward_source!(Box<S>);
