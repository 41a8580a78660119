use clap::{Arg, ArgAction, Command};
use layered_options::{DotenvSource, EnvSource, FlagSource, JsonSource, MapSource, Options};
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn dotenv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn command() -> Command {
    Command::new("svc")
        .arg(Arg::new("port").long("port"))
        .arg(Arg::new("debug").long("debug").action(ArgAction::SetTrue))
}

#[test]
fn test_layered_sources_resolve_in_order() {
    let dotenv = dotenv_file("host=from-dotenv\nport=1000\nname=from-dotenv\n");
    let env = EnvSource::from_vars([("port", "2000"), ("timeout", "10s")]);
    let json = JsonSource::from_json_str(r#"{"port": 3000, "ratio": 0.5}"#);
    let flags = FlagSource::new(command(), ["svc", "--port", "4000"]);

    let mut options = Options::new()
        .with_source(DotenvSource::new(dotenv.path()))
        .with_source(env)
        .with_source(json)
        .with_source(flags);
    let host = options.string("host", "localhost", "Server host");
    let port = options.int("port", 80, "Server port");
    let ratio = options.float("ratio", 1.0, "Sample ratio");
    let timeout = options.duration("timeout", Duration::from_secs(1), "Request timeout");
    let debug = options.bool("debug", true, "Debug mode");

    options.load().unwrap();

    assert_eq!(host.get(), "from-dotenv");
    assert_eq!(port.get(), 4000);
    assert_eq!(ratio.get(), 0.5);
    assert_eq!(timeout.get(), Duration::from_secs(10));
    // The flag was not passed, so clap's implicit false does not count
    assert!(debug.get());
}

#[test]
fn test_source_load_failures_are_collected() {
    let mut options = Options::new()
        .with_source(DotenvSource::new("/nonexistent/options.env"))
        .with_source(JsonSource::from_json_str("[1, 2, 3]"))
        .with_source(FlagSource::new(command(), ["svc", "--bogus"]));
    let port = options.int("port", 80, "Server port");

    let errors = options.load().unwrap_err();

    assert_eq!(errors.len(), 3);
    assert_eq!(port.get(), 0);
}

#[test]
fn test_json_type_mismatch_is_reported() {
    let mut options =
        Options::new().with_source(JsonSource::from_json_str(r#"{"host": 42, "port": "8080"}"#));
    let host = options.string("host", "localhost", "Server host");
    let port = options.int("port", 80, "Server port");

    let errors = options.load().unwrap_err();

    assert_eq!(
        errors.to_string(),
        "errors.List{errors.OptionInvalidType{Name='host', Source='number', Target='string'}}"
    );
    assert_eq!(host.get(), "");
    assert_eq!(port.get(), 8080);
}

#[test]
#[serial]
fn test_process_environment_with_prefix() {
    // SAFETY: serialized with every other test that touches the environment
    unsafe {
        std::env::set_var("LAYERED_TEST_port", "7070");
    }

    let mut options = Options::new().with_source(EnvSource::new().with_prefix("LAYERED_TEST_"));
    let port = options.int("port", 80, "Server port");
    let host = options.string("host", "localhost", "Server host");
    options.load().unwrap();

    // SAFETY: as above
    unsafe {
        std::env::remove_var("LAYERED_TEST_port");
    }

    assert_eq!(port.get(), 7070);
    assert_eq!(host.get(), "localhost");
}

#[test]
#[serial]
fn test_environment_is_captured_on_load() {
    let mut options = Options::new().with_source(EnvSource::new().with_prefix("LAYERED_LATE_"));
    let port = options.int("port", 80, "Server port");

    options.load().unwrap();
    // SAFETY: serialized with every other test that touches the environment
    unsafe {
        std::env::set_var("LAYERED_LATE_port", "9999");
    }
    let late = port.get();
    // SAFETY: as above
    unsafe {
        std::env::remove_var("LAYERED_LATE_port");
    }

    assert_eq!(late, 80);
}

#[test]
fn test_unpassed_typed_flag_keeps_earlier_value() {
    let command = Command::new("svc").arg(
        Arg::new("port")
            .long("port")
            .value_parser(clap::value_parser!(u16))
            .default_value("80"),
    );

    let mut options = Options::new()
        .with_source(MapSource::from_pairs([("port", "9000")]))
        .with_source(FlagSource::new(command, ["svc"]));
    let port = options.int("port", 8080, "Server port");

    options.load().unwrap();

    assert_eq!(port.get(), 9000);
}
