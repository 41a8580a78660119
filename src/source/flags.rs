use super::Source;
use super::text;
use crate::error::Error;
use crate::value::Scalar;
use chrono::{DateTime, Utc};
use clap::parser::{MatchesError, ValueSource};
use clap::{ArgMatches, Command};
use std::ffi::OsString;
use std::time::Duration;

/// Source backed by command-line flags parsed with clap
///
/// Option names are matched against argument ids. An argument the command
/// does not define, or one that was not given on the command line, is not
/// found.
///
/// # Example
/// ```rust
/// use clap::{Arg, Command};
/// use layered_options::{FlagSource, Options};
///
/// let command = Command::new("svc").arg(Arg::new("port").long("port"));
/// let mut options = Options::new().with_source(FlagSource::new(command, ["svc", "--port", "9000"]));
/// let port = options.int("port", 8080, "Server port");
///
/// options.load().unwrap();
/// assert_eq!(port.get(), 9000);
/// ```
#[derive(Debug)]
pub struct FlagSource {
    pending: Option<(Command, Vec<OsString>)>,
    matches: ArgMatches,
}

impl FlagSource {
    /// Parse `args` (including the binary name) against `command` on load
    pub fn new<I, T>(command: Command, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            pending: Some((command, args.into_iter().map(Into::into).collect())),
            matches: ArgMatches::default(),
        }
    }

    /// Read from matches that were already parsed
    pub fn from_matches(matches: ArgMatches) -> Self {
        Self {
            pending: None,
            matches,
        }
    }

    /// Whether `name` is a known argument that was given on the command line
    ///
    /// Values clap filled in from an argument's own default count as absent,
    /// so they never shadow earlier sources or the option's default.
    fn given(&self, name: &str) -> bool {
        // value_source panics on ids the command does not define
        matches!(self.matches.try_contains_id(name), Ok(true))
            && self.matches.value_source(name) != Some(ValueSource::DefaultValue)
    }

    /// Read natively typed values first, then fall back to text parsing
    fn read<T, F>(&self, name: &str, parse: F) -> Result<T, Error>
    where
        T: Scalar,
        F: FnOnce(&str, Option<&str>) -> Result<T, Error>,
    {
        if !self.given(name) {
            return Err(Error::not_found(name));
        }
        match self.matches.try_get_one::<T>(name) {
            Ok(Some(value)) => return Ok(value.clone()),
            Ok(None) => return Err(Error::not_found(name)),
            Err(MatchesError::Downcast { .. }) => {}
            Err(e) => return Err(Error::other(e)),
        }
        match self.matches.try_get_one::<String>(name) {
            Ok(raw) => parse(name, raw.map(String::as_str)),
            Err(MatchesError::Downcast { actual, .. }) => {
                Err(Error::invalid_type(name, format!("{:?}", actual), T::KIND))
            }
            Err(e) => Err(Error::other(e)),
        }
    }
}

impl Source for FlagSource {
    fn name(&self) -> &str {
        "flags"
    }

    fn load(&mut self) -> Result<(), Error> {
        if let Some((command, args)) = self.pending.take() {
            self.matches = command.try_get_matches_from(args).map_err(Error::load)?;
            tracing::debug!("parsed command-line flags");
        }
        Ok(())
    }

    fn string(&self, name: &str) -> Result<String, Error> {
        self.read(name, text::string)
    }

    fn int(&self, name: &str) -> Result<i32, Error> {
        self.read(name, text::int)
    }

    fn float(&self, name: &str) -> Result<f32, Error> {
        self.read(name, text::float)
    }

    fn bool(&self, name: &str) -> Result<bool, Error> {
        self.read(name, text::bool)
    }

    fn time(&self, name: &str) -> Result<DateTime<Utc>, Error> {
        self.read(name, text::time)
    }

    fn duration(&self, name: &str) -> Result<Duration, Error> {
        self.read(name, text::duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;
    use clap::{Arg, ArgAction, value_parser};

    fn command() -> Command {
        Command::new("svc")
            .arg(Arg::new("host").long("host"))
            .arg(Arg::new("port").long("port"))
            .arg(
                Arg::new("workers")
                    .long("workers")
                    .value_parser(value_parser!(i32)),
            )
            .arg(Arg::new("debug").long("debug").action(ArgAction::SetTrue))
            .arg(Arg::new("timeout").long("timeout"))
            .arg(
                Arg::new("listen")
                    .long("listen")
                    .value_parser(value_parser!(u16))
                    .default_value("80"),
            )
    }

    fn loaded(args: &[&str]) -> FlagSource {
        let mut source = FlagSource::new(command(), args.iter().copied());
        source.load().unwrap();
        source
    }

    #[test]
    fn test_text_flags() {
        let source = loaded(&["svc", "--host", "0.0.0.0", "--port", "9000", "--timeout", "2s"]);

        assert_eq!(source.string("host").unwrap(), "0.0.0.0");
        assert_eq!(source.int("port").unwrap(), 9000);
        assert_eq!(source.duration("timeout").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_native_flags() {
        let source = loaded(&["svc", "--workers", "4", "--debug"]);

        assert_eq!(source.int("workers").unwrap(), 4);
        assert!(source.bool("debug").unwrap());
    }

    #[test]
    fn test_absent_flag_is_not_found() {
        let source = loaded(&["svc"]);

        assert!(source.string("host").unwrap_err().is_not_found());
        assert!(source.int("port").unwrap_err().is_not_found());
    }

    #[test]
    fn test_clap_default_is_not_found() {
        let source = loaded(&["svc"]);
        assert!(source.bool("debug").unwrap_err().is_not_found());
    }

    #[test]
    fn test_unknown_argument_is_not_found() {
        let source = loaded(&["svc"]);
        assert!(source.string("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_bad_args_fail_load() {
        let mut source = FlagSource::new(command(), ["svc", "--unknown"]);
        assert!(matches!(source.load().unwrap_err(), Error::Load(_)));
    }

    #[test]
    fn test_from_matches() {
        let matches = command().get_matches_from(["svc", "--port", "1"]);
        let source = FlagSource::from_matches(matches);
        assert_eq!(source.int("port").unwrap(), 1);
    }

    #[test]
    fn test_typed_default_is_not_found() {
        let source = loaded(&["svc"]);

        assert!(source.int("listen").unwrap_err().is_not_found());
        assert!(source.string("listen").unwrap_err().is_not_found());
    }

    #[test]
    fn test_wrong_shape_is_invalid_type() {
        let source = loaded(&["svc", "--debug", "--listen", "8080"]);

        assert!(matches!(
            source.string("debug").unwrap_err(),
            Error::OptionInvalidType {
                target: Kind::String,
                ..
            }
        ));
        assert!(matches!(
            source.int("listen").unwrap_err(),
            Error::OptionInvalidType {
                target: Kind::Int,
                ..
            }
        ));
    }
}
