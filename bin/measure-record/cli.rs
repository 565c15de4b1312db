use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rusty_dcpower::config::parse_resource_names;
use rusty_dcpower::{IndexMode, RecordConfig};
use std::path::PathBuf;

/// Outputs the specified voltage, then takes the specified number of
/// voltage and current readings.
///
/// Every option falls back to the config file, then `DCPOWER_*`
/// environment variables, then the built-in default.
#[derive(Parser, Debug)]
#[command(name = "measure-record", allow_negative_numbers = true)]
pub struct Args {
    /// Resource names of NI SMUs [default: "PXI1Slot2/0, PXI1Slot3/0-1"]
    #[arg(short = 'n', long = "resource-name", value_name = "NAMES")]
    pub resource_name: Option<String>,

    /// Measure record length per channel [default: 20]
    #[arg(short = 'l', long)]
    pub length: Option<i64>,

    /// Voltage level (V) [default: 5.0]
    #[arg(short = 'v', long)]
    pub voltage: Option<f64>,

    /// Option string (also accepted as -op)
    #[arg(short = 'o', long = "option-string", value_name = "OPTIONS")]
    pub option_string: Option<String>,

    /// Server address [default: localhost]
    #[arg(short = 'a', long)]
    pub address: Option<String>,

    /// Server port [default: 31763]
    #[arg(short = 'p', long)]
    pub port: Option<String>,

    /// Name of a server session to create or attach to; empty opens a new unnamed session
    #[arg(long, value_name = "NAME")]
    pub session_name: Option<String>,

    /// Seconds to wait for samples on each fetch [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    pub fetch_timeout: Option<f64>,

    /// Seconds to wait for the server connection [default: 5.0]
    #[arg(long, value_name = "SECONDS")]
    pub connect_timeout: Option<f64>,

    /// Number samples across all fetches of a channel instead of per fetch
    #[arg(long)]
    pub cumulative_index: bool,

    /// Also write every sample to this JSONL file
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// Overlay the options given on the command line
    pub fn apply(&self, config: &mut RecordConfig) {
        if let Some(ref names) = self.resource_name {
            config.resource_names = parse_resource_names(names);
        }
        if let Some(length) = self.length {
            config.record_length = length;
        }
        if let Some(voltage) = self.voltage {
            config.voltage_level = voltage;
        }
        if let Some(ref options) = self.option_string {
            config.option_string = options.clone();
        }
        if let Some(ref address) = self.address {
            config.server_address = address.clone();
        }
        if let Some(ref port) = self.port {
            config.server_port = port.clone();
        }
        if let Some(ref name) = self.session_name {
            config.session_name = name.clone();
        }
        if let Some(timeout) = self.fetch_timeout {
            config.fetch_timeout_secs = timeout;
        }
        if let Some(timeout) = self.connect_timeout {
            config.connect_timeout_secs = timeout;
        }
        if self.cumulative_index {
            config.index_mode = IndexMode::Cumulative;
        }
        if let Some(ref path) = self.save {
            config.sample_log = Some(path.clone());
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }
    }
}

/// Report a rejected configuration value the way clap reports bad arguments
pub fn config_error(message: impl std::fmt::Display) -> clap::Error {
    Args::command().error(ErrorKind::ValueValidation, message)
}

/// Rewrite the two-letter `-op` flag, which clap cannot express, to its
/// long form. Tokens after `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            if arg == "-op" {
                "--option-string".to_string()
            } else if let Some(value) = arg.strip_prefix("-op=") {
                format!("--option-string={value}")
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &[&str]) -> Result<Args, clap::Error> {
        let argv = std::iter::once("measure-record")
            .chain(tokens.iter().copied())
            .map(str::to_string);
        Args::try_parse_from(normalize_args(argv))
    }

    #[test]
    fn test_no_options_keeps_defaults() {
        let args = parse(&[]).unwrap();
        let mut config = RecordConfig::default();
        args.apply(&mut config);
        assert_eq!(config, RecordConfig::default());
    }

    #[test]
    fn test_short_options() {
        let args = parse(&[
            "-n", "PXI1Slot4/0-3", "-l", "5", "-v", "-1.5", "-op", "Simulate=1", "-a", "smu",
            "-p", "50051",
        ])
        .unwrap();
        let mut config = RecordConfig::default();
        args.apply(&mut config);

        assert_eq!(config.resource_names, vec!["PXI1Slot4/0-3"]);
        assert_eq!(config.record_length, 5);
        assert_eq!(config.voltage_level, -1.5);
        assert_eq!(config.option_string, "Simulate=1");
        assert_eq!(config.server_address, "smu");
        assert_eq!(config.server_port, "50051");
    }

    #[test]
    fn test_long_options() {
        let args = parse(&[
            "--resource-name",
            "PXI1Slot2/0, PXI1Slot3/0",
            "--length=-2",
            "--option-string=Simulate=1, DriverSetup=Model:4162",
            "--cumulative-index",
        ])
        .unwrap();
        let mut config = RecordConfig::default();
        args.apply(&mut config);

        assert_eq!(config.resource_names, vec!["PXI1Slot2/0", "PXI1Slot3/0"]);
        assert_eq!(config.record_length, -2);
        assert_eq!(config.option_string, "Simulate=1, DriverSetup=Model:4162");
        assert_eq!(config.index_mode, IndexMode::Cumulative);
    }

    #[test]
    fn test_unparsable_length_is_usage_error() {
        let err = parse(&["-l", "twenty"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_rejected_config_value_prints_usage() {
        let args = parse(&["-p", "grpc"]).unwrap();
        let mut config = RecordConfig::default();
        args.apply(&mut config);
        let message = config.validate().unwrap_err();

        let err = config_error(message);
        assert_eq!(err.exit_code(), 2);
        let rendered = err.render().to_string();
        assert!(rendered.contains("Usage:"));
        assert!(rendered.contains("grpc"));
    }

    #[test]
    fn test_normalize_only_rewrites_op() {
        let argv = ["prog", "-op=x", "-o", "y", "--", "-op"].map(String::from);
        assert_eq!(
            normalize_args(argv),
            vec!["prog", "--option-string=x", "-o", "y", "--", "-op"]
        );
    }
}
