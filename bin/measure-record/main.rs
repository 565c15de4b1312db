mod cli;

use clap::Parser;
use env_logger::Env;
use log::{error, info, warn, LevelFilter};
use rusty_dcpower::{
    load_config, DcPowerError, GrpcClient, MeasureRecord, RecordConfig, RecordSummary,
    SampleLogger,
};
use std::process::ExitCode;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::cli::{config_error, normalize_args, Args};

/// Exit status for bad command-line or configuration input, as clap uses
const USAGE_EXIT: u8 = 2;

/// Measure-record example for NI-DCPower over the NI gRPC Device Server
///
/// Usage:
///   measure-record -n "PXI1Slot2/0" -l 10 -v 2.5 -a localhost -p 31763
///   measure-record --config smu.toml --log-level debug
fn main() -> ExitCode {
    let args = Args::parse_from(normalize_args(std::env::args()));

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => config_error(e).exit(),
    };

    initialize_logging(&config.log_level);
    log_startup_info(&config);

    let shutdown_flag = setup_shutdown_handler();

    match run(&config, shutdown_flag) {
        Ok(summary) => {
            info!(
                "Fetched {} samples from {} channels",
                summary.total_samples(),
                summary.channels.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Measurement failed: {e}");
            eprintln!("Error: {e}");
            match e {
                DcPowerError::Usage(_) => ExitCode::from(USAGE_EXIT),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// Defaults, then config file and environment, then command-line flags
fn build_config(args: &Args) -> Result<RecordConfig, config::ConfigError> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Connect, then run the measure record against the server
fn run(
    config: &RecordConfig,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<RecordSummary, DcPowerError> {
    let mut client = GrpcClient::builder()
        .address(&config.server_address)
        .port(&config.server_port)
        .connect_timeout(config.connect_timeout())
        .build()?;
    info!("Connected to {}:{}", config.server_address, config.server_port);

    let mut record = MeasureRecord::new(config).with_shutdown_flag(shutdown_flag);
    if let Some(ref path) = config.sample_log {
        let logger = SampleLogger::new(path, 1000);
        info!("Saving samples to {:?}", logger.path());
        record = record.with_sample_log(logger);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    record.run(&mut client, &mut out)
}

fn log_startup_info(config: &RecordConfig) {
    info!("=== NI-DCPower Measure Record ===");
    info!("Server: {}:{}", config.server_address, config.server_port);
    info!("Resources: {}", config.resource_names.join(", "));
    info!(
        "Record length: {}, voltage level: {} V",
        config.record_length, config.voltage_level
    );
    if !config.option_string.is_empty() {
        info!("Option string: {}", config.option_string);
    }
    if !config.session_name.is_empty() {
        info!("Session name: {}", config.session_name);
    }
    if config.record_length <= 0 {
        warn!(
            "Record length {} is not positive; no samples will be fetched",
            config.record_length
        );
    }
}

/// Setup Ctrl+C handler so guards release the session before exit
fn setup_shutdown_handler() -> Arc<AtomicBool> {
    let shutdown_flag = Arc::new(AtomicBool::new(false));
    let shutdown_flag_clone = shutdown_flag.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Ctrl+C received - stopping after the current fetch...");
        shutdown_flag_clone.store(true, Ordering::SeqCst);
    }) {
        warn!("Could not install Ctrl+C handler: {e}");
    }

    shutdown_flag
}

/// Initialize logging with configurable level
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => {
            eprintln!("Warning: Invalid log level '{}', using 'warn'", log_level);
            LevelFilter::Warn
        }
    };

    env_logger::Builder::from_env(Env::default())
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}
