use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::DcPowerError;
use crate::types::Measurement;

/// One displayed sample as written to the JSONL sample log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub index: usize,
    pub voltage: f64,
    pub current: f64,
    pub in_compliance: bool,
}

impl SampleRecord {
    pub fn new(channel: &str, index: usize, measurement: &Measurement) -> Self {
        Self {
            timestamp: Utc::now(),
            channel: channel.to_string(),
            index,
            voltage: measurement.voltage,
            current: measurement.current,
            in_compliance: measurement.in_compliance,
        }
    }
}

/// Buffered JSONL writer for fetched samples.
///
/// Records are appended to the file in batches of `buffer_size`. Whatever is
/// still buffered is written on drop.
#[derive(Debug)]
pub struct SampleLogger {
    buffer: Vec<SampleRecord>,
    buffer_size: usize,
    file_path: PathBuf,
}

impl SampleLogger {
    pub fn new<P: Into<PathBuf>>(file_path: P, buffer_size: usize) -> Self {
        let mut path = file_path.into();
        if path.extension().is_none() {
            path.set_extension("jsonl");
        }

        Self {
            buffer: Vec::with_capacity(buffer_size.max(1)),
            buffer_size: buffer_size.max(1),
            file_path: path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn add(&mut self, record: SampleRecord) -> Result<(), DcPowerError> {
        self.buffer.push(record);

        if self.buffer.len() >= self.buffer_size {
            self.flush()?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), DcPowerError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .map_err(|source| DcPowerError::Io {
                source,
                context: format!("Could not open sample log {:?}", self.file_path),
            })?;

        let mut writer = std::io::BufWriter::new(file);
        for record in &self.buffer {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{line}").map_err(|source| DcPowerError::Io {
                source,
                context: format!("Could not write sample log {:?}", self.file_path),
            })?;
        }
        writer.flush()?;

        debug!(
            "Flushed {} samples to {:?}",
            self.buffer.len(),
            self.file_path
        );
        self.buffer.clear();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Drop for SampleLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::error!("Dropping unsaved samples: {e}");
        } else {
            info!("Sample log written to {:?}", self.file_path);
        }
    }
}

/// Read a JSONL sample log back into records
pub fn read_sample_log(path: &Path) -> Result<Vec<SampleRecord>, DcPowerError> {
    let content = std::fs::read_to_string(path).map_err(|source| DcPowerError::Io {
        source,
        context: format!("Could not read sample log {path:?}"),
    })?;

    let mut records = Vec::new();
    for line in content.lines() {
        if !line.trim().is_empty() {
            records.push(serde_json::from_str(line)?);
        }
    }
    Ok(records)
}
