use clap::{Parser, Subcommand};
use colored::Colorize;
use layered_options::{
    DotenvSource, EnvSource, FromOptions, JsonSource, MapSource, Options, define_options,
    format_errors,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

define_options! {
    #[derive(Debug)]
    pub struct ServiceOptions {
        #[option(name = "bind_address", doc = "Address the service listens on", default = "127.0.0.1:8000")]
        pub bind_address: String,

        #[option(name = "workers", doc = "Number of worker threads", default = 4)]
        pub workers: i32,

        #[option(name = "sample_ratio", doc = "Fraction of requests traced", default = 0.1)]
        pub sample_ratio: f32,

        #[option(name = "debug", doc = "Enable debug endpoints", default = false)]
        pub debug: bool,

        #[option(name = "request_timeout", doc = "Upstream request timeout", default = Duration::from_secs(30))]
        pub request_timeout: Duration,
    }
}

#[derive(Debug, Parser)]
#[command(name = "options-cli", about = "Resolve service options from layered sources")]
struct Cli {
    /// Dotenv file, read before the environment
    #[arg(long, global = true)]
    dotenv: Option<PathBuf>,

    /// JSON document, read after the environment
    #[arg(long, global = true)]
    json: Option<PathBuf>,

    /// Prefix prepended to option names when reading the environment
    #[arg(long, global = true)]
    env_prefix: Option<String>,

    /// Override an option, e.g. --set workers=8; read last
    #[arg(long = "set", value_name = "NAME=VALUE", global = true, value_parser = parse_assignment)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the options and print them
    Show,
    /// Write the option documentation as markdown
    Docs {
        #[arg(long, default_value = "OPTIONS.md")]
        out: PathBuf,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

fn build_options(cli: &Cli) -> Options<'static> {
    let mut options = Options::new();
    if let Some(path) = &cli.dotenv {
        options = options.with_source(DotenvSource::new(path));
    }

    let mut env = EnvSource::new();
    if let Some(prefix) = &cli.env_prefix {
        env = env.with_prefix(prefix.clone());
    }
    options = options.with_source(env);

    if let Some(path) = &cli.json {
        options = options.with_source(JsonSource::from_path(path));
    }
    if !cli.overrides.is_empty() {
        options = options.with_source(MapSource::from_pairs(cli.overrides.clone()));
    }
    options
}

fn show(cli: &Cli) -> ExitCode {
    match ServiceOptions::load_or_error(build_options(cli)) {
        Ok(resolved) => {
            println!("{}", "Options resolved successfully!".green());
            print_field("bind_address", &*resolved.bind_address, resolved.bind_address.resolved);
            print_field("workers", &*resolved.workers, resolved.workers.resolved);
            print_field("sample_ratio", &*resolved.sample_ratio, resolved.sample_ratio.resolved);
            print_field("debug", &*resolved.debug, resolved.debug.resolved);
            print_field(
                "request_timeout",
                &humantime::format_duration(*resolved.request_timeout),
                resolved.request_timeout.resolved,
            );
            ExitCode::SUCCESS
        }
        Err(errors) => {
            eprintln!("{}", format_errors(&errors));
            ExitCode::FAILURE
        }
    }
}

fn print_field(name: &str, value: &dyn std::fmt::Display, resolved: bool) {
    let origin = if resolved { "source" } else { "default" };
    println!("  {}: {} ({})", name.magenta().bold(), value, origin.dimmed());
}

fn docs(out: &Path) -> ExitCode {
    match ServiceOptions::describe().write_docs(out) {
        Ok(()) => {
            println!("✓ Documentation written to {}", out.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to write documentation: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Show => show(&cli),
        Command::Docs { out } => docs(out),
    }
}
