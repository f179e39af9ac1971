//! Command-line interface for the replay driver.
//!
//! Flags override the matching configuration file settings.

use clap::{Arg, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the number of ticks to run
    pub ticks: Option<u32>,
    /// Print drained commands as JSON lines instead of log lines
    pub json_output: bool,
}

impl CliArgs {
    /// Parses command line arguments using clap.
    pub fn parse() -> Self {
        Self::from_matches(Self::command().get_matches())
    }

    fn command() -> Command {
        Command::new("Stream Replay")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Replays scripted device input through the client message stream")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("replay.toml"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("ticks")
                    .short('t')
                    .long("ticks")
                    .value_name("COUNT")
                    .help("Number of client ticks to run (default: until the script ends)")
                    .value_parser(clap::value_parser!(u32)),
            )
            .arg(
                Arg::new("json-output")
                    .long("json-output")
                    .help("Print drained commands as JSON lines")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("replay.toml")),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            ticks: matches.get_one::<u32>("ticks").copied(),
            json_output: matches.get_flag("json-output"),
        }
    }

    /// Parses an explicit argument list; used by tests.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(Self::command().try_get_matches_from(args)?))
    }
}
