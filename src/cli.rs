use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::MonitorConfig;

const USAGE_MESSAGE: &str =
    "Provide this arg: <process name> <max lifetime in minutes> <monitoring frequency in minutes>";
const NUMERIC_MESSAGE: &str =
    "Provide valid numeric values for max lifetime and monitoring frequency.";

/// Watch processes by name and kill any instance that outlives its allowed
/// lifetime.
#[derive(Parser, Debug)]
#[command(name = "procwatch", version, about)]
struct Cli {
    /// Exact name of the processes to watch
    #[arg(value_name = "PROCESS_NAME")]
    process_name: String,

    /// Maximum allowed lifetime in minutes
    #[arg(value_name = "MAX_LIFETIME_MINUTES")]
    max_lifetime: String,

    /// Monitoring frequency in minutes
    #[arg(value_name = "FREQUENCY_MINUTES")]
    frequency: String,
}

/// Argument failures surface as a single fixed message on stdout; the
/// monitor never starts.
#[derive(Debug, PartialEq, Eq)]
pub enum CliError {
    /// Wrong argument count or shape.
    Usage,
    /// Second or third argument is not numeric.
    InvalidNumeric,
    /// `--help` / `--version` output, already rendered.
    Display(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage => f.write_str(USAGE_MESSAGE),
            CliError::InvalidNumeric => f.write_str(NUMERIC_MESSAGE),
            CliError::Display(rendered) => f.write_str(rendered),
        }
    }
}

impl std::error::Error for CliError {}

/// Parse and validate the command line into a `MonitorConfig`.
///
/// The numeric arguments are captured as strings so that a parse failure
/// produces the fixed user-facing message instead of clap's own text.
pub fn parse_config<I, T>(args: I) -> Result<MonitorConfig, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            CliError::Display(e.render().to_string())
        }
        _ => CliError::Usage,
    })?;

    let max_lifetime: u64 = cli
        .max_lifetime
        .parse()
        .map_err(|_| CliError::InvalidNumeric)?;
    let frequency: u64 = cli
        .frequency
        .parse()
        .map_err(|_| CliError::InvalidNumeric)?;

    Ok(MonitorConfig::new(cli.process_name, max_lifetime, frequency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Result<MonitorConfig, CliError> {
        parse_config(std::iter::once("procwatch").chain(args.iter().copied()))
    }

    #[test]
    fn test_valid_args_produce_config() {
        let config = parse(&["ping", "5", "2"]).unwrap();
        assert_eq!(config.process_name, "ping");
        assert_eq!(config.max_lifetime_minutes, 5);
        assert_eq!(config.poll_interval, Duration::from_millis(120_000));
    }

    #[test]
    fn test_wrong_argument_count_is_usage_error() {
        assert_eq!(parse(&[]).unwrap_err(), CliError::Usage);
        assert_eq!(parse(&["ping"]).unwrap_err(), CliError::Usage);
        assert_eq!(parse(&["ping", "1"]).unwrap_err(), CliError::Usage);
        assert_eq!(
            parse(&["ping", "1", "1", "extra"]).unwrap_err(),
            CliError::Usage
        );
    }

    #[test]
    fn test_non_numeric_lifetime_rejected() {
        assert_eq!(parse(&["ping", "c", "1"]).unwrap_err(), CliError::InvalidNumeric);
    }

    #[test]
    fn test_non_numeric_frequency_rejected() {
        assert_eq!(parse(&["ping", "1", "a"]).unwrap_err(), CliError::InvalidNumeric);
    }

    #[test]
    fn test_error_messages_are_the_fixed_strings() {
        assert_eq!(
            CliError::Usage.to_string(),
            "Provide this arg: <process name> <max lifetime in minutes> <monitoring frequency in minutes>"
        );
        assert_eq!(
            CliError::InvalidNumeric.to_string(),
            "Provide valid numeric values for max lifetime and monitoring frequency."
        );
    }

    #[test]
    fn test_help_still_renders() {
        match parse(&["--help"]).unwrap_err() {
            CliError::Display(rendered) => assert!(rendered.contains("Usage")),
            other => panic!("expected rendered help, got {other:?}"),
        }
    }
}
