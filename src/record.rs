//! Finite measure-record acquisition: configure, initiate, drain, print.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::config::{IndexMode, RecordConfig};
use crate::driver::DcPowerDriver;
use crate::error::DcPowerError;
use crate::logger::{SampleLogger, SampleRecord};
use crate::session::{Acquisition, Session};
use crate::types::Measurement;

pub const HEADER: &str = "Channel           Num  Voltage    Current    In Compliance";

/// Format one sample row: name padded to 15, index width 3, six decimals.
pub fn format_row(channel: &str, index: usize, measurement: &Measurement) -> String {
    format!(
        "{:<15} {:>3}    {:8.6}   {:8.6}   {}",
        channel,
        index,
        measurement.voltage,
        measurement.current,
        if measurement.in_compliance { "True" } else { "False" }
    )
}

pub fn format_rate(delta_time: f64) -> String {
    format!("Effective measurement rate: {} S/s", 1.0 / delta_time)
}

/// Samples drained from each channel, in resolution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSummary {
    pub channels: Vec<(String, usize)>,
}

impl RecordSummary {
    pub fn total_samples(&self) -> usize {
        self.channels.iter().map(|(_, n)| n).sum()
    }
}

/// One measure-record run against an already connected driver.
///
/// ```no_run
/// use rusty_dcpower::{GrpcClient, MeasureRecord, RecordConfig};
///
/// let config = RecordConfig::default();
/// let mut client = GrpcClient::new(&config.server_address, &config.server_port)?;
/// let summary = MeasureRecord::new(&config).run(&mut client, &mut std::io::stdout())?;
/// println!("{} samples", summary.total_samples());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct MeasureRecord<'a> {
    config: &'a RecordConfig,
    shutdown: Option<Arc<AtomicBool>>,
    sample_log: Option<SampleLogger>,
}

impl<'a> MeasureRecord<'a> {
    pub fn new(config: &'a RecordConfig) -> Self {
        Self {
            config,
            shutdown: None,
            sample_log: None,
        }
    }

    /// Stop between fetches once `flag` is set
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    pub fn with_sample_log(mut self, logger: SampleLogger) -> Self {
        self.sample_log = Some(logger);
        self
    }

    /// Open, configure and commit a session, then drain every channel.
    ///
    /// The session is closed and acquisition aborted on every exit path.
    /// Rows already written before an error stay written.
    pub fn run<D: DcPowerDriver, W: Write>(
        &mut self,
        driver: &mut D,
        out: &mut W,
    ) -> Result<RecordSummary, DcPowerError> {
        let config = self.config;
        let mut session = Session::open(
            driver,
            &config.resource_names,
            &config.option_string,
            &config.session_options(),
        )?;

        session.configure(&config.measure_config())?;
        session.commit()?;
        info!("Configuration committed");

        let delta_time = session.measure_record_delta_time()?;
        writeln!(out, "{}", format_rate(delta_time))?;
        writeln!(out, "{HEADER}")?;

        let mut acquisition = session.initiate()?;
        let channels = acquisition.channel_names()?;
        debug!("Draining {} channels: {channels:?}", channels.len());

        let target = config.samples_per_channel();
        let timeout = config.fetch_timeout();
        let mut summary = RecordSummary::default();
        for channel in channels {
            let drained = self.drain_channel(&mut acquisition, &channel, target, timeout, out)?;
            summary.channels.push((channel, drained));
        }

        out.flush()?;
        if let Some(logger) = self.sample_log.as_mut() {
            logger.flush()?;
        }
        Ok(summary)
    }

    fn drain_channel<D: DcPowerDriver, W: Write>(
        &mut self,
        acquisition: &mut Acquisition<'_, '_, D>,
        channel: &str,
        target: usize,
        timeout: Duration,
        out: &mut W,
    ) -> Result<usize, DcPowerError> {
        let mut acquired = 0;
        while acquired < target {
            if self.interrupted() {
                return Err(DcPowerError::Interrupted);
            }

            let remaining = target - acquired;
            let backlog = acquisition.fetch_backlog(channel)?;
            let count = backlog.clamp(1, remaining);
            let mut batch = acquisition.fetch_multiple(channel, count, timeout)?;
            batch.truncate(remaining);

            for (i, measurement) in batch.iter().enumerate() {
                let index = match self.config.index_mode {
                    IndexMode::PerFetch => i,
                    IndexMode::Cumulative => acquired + i,
                };
                writeln!(out, "{}", format_row(channel, index, measurement))?;
                if let Some(logger) = self.sample_log.as_mut() {
                    logger.add(SampleRecord::new(channel, index, measurement))?;
                }
            }
            acquired += batch.len();
        }

        debug!("Channel '{channel}' drained: {acquired} samples");
        Ok(acquired)
    }

    fn interrupted(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
