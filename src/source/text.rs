//! Conversions from text values shared by the string-backed sources.

use crate::error::Error;
use crate::value::Kind;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A source whose values are stored as text
pub(crate) trait TextSource {
    fn text(&self, name: &str) -> Option<&str>;
}

fn present<'a>(name: &str, raw: Option<&'a str>) -> Result<&'a str, Error> {
    raw.ok_or_else(|| Error::not_found(name))
}

pub(crate) fn string(name: &str, raw: Option<&str>) -> Result<String, Error> {
    present(name, raw).map(str::to_string)
}

pub(crate) fn int(name: &str, raw: Option<&str>) -> Result<i32, Error> {
    let raw = present(name, raw)?;
    raw.parse()
        .map_err(|e| Error::invalid_value(name, raw, Kind::Int, e))
}

pub(crate) fn float(name: &str, raw: Option<&str>) -> Result<f32, Error> {
    let raw = present(name, raw)?;
    raw.parse()
        .map_err(|e| Error::invalid_value(name, raw, Kind::Float, e))
}

pub(crate) fn bool(name: &str, raw: Option<&str>) -> Result<bool, Error> {
    match present(name, raw)? {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(Error::invalid_value(
            name,
            other,
            Kind::Bool,
            "expected one of 1, t, true, 0, f, false",
        )),
    }
}

pub(crate) fn time(name: &str, raw: Option<&str>) -> Result<DateTime<Utc>, Error> {
    let raw = present(name, raw)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::invalid_value(name, raw, Kind::Time, e))
}

pub(crate) fn duration(name: &str, raw: Option<&str>) -> Result<Duration, Error> {
    let raw = present(name, raw)?;
    humantime::parse_duration(raw).map_err(|e| Error::invalid_value(name, raw, Kind::Duration, e))
}

/// Implements the typed reads of [`Source`](crate::Source) on top of
/// [`TextSource::text`]
macro_rules! text_reads {
    () => {
        fn string(&self, name: &str) -> Result<String, $crate::Error> {
            $crate::source::text::string(name, self.text(name))
        }

        fn int(&self, name: &str) -> Result<i32, $crate::Error> {
            $crate::source::text::int(name, self.text(name))
        }

        fn float(&self, name: &str) -> Result<f32, $crate::Error> {
            $crate::source::text::float(name, self.text(name))
        }

        fn bool(&self, name: &str) -> Result<bool, $crate::Error> {
            $crate::source::text::bool(name, self.text(name))
        }

        fn time(
            &self,
            name: &str,
        ) -> Result<::chrono::DateTime<::chrono::Utc>, $crate::Error> {
            $crate::source::text::time(name, self.text(name))
        }

        fn duration(&self, name: &str) -> Result<::std::time::Duration, $crate::Error> {
            $crate::source::text::duration(name, self.text(name))
        }
    };
}

pub(crate) use text_reads;
