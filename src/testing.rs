//! Scripted in-memory driver for exercising the run logic.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use crate::driver::{DcPowerDriver, SessionOptions};
use crate::error::DcPowerError;
use crate::types::{Attribute, AttributeValue, Measurement, SessionHandle};

/// Status the real driver returns for an out-of-range property value
const INVALID_VALUE: i32 = -1074118650;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open {
        resource_name: String,
        option_string: String,
    },
    Close,
    Set(Attribute, AttributeValue),
    Get(Attribute),
    Commit,
    Initiate,
    Abort,
    ChannelNames(String),
    Fetch { channel: String, count: usize },
}

pub struct SimulatedDriver {
    channels: Vec<String>,
    calls: Vec<Call>,
    record_length: i32,
    voltage_level: f64,
    delta_time: f64,
    fetched: HashMap<String, usize>,
    batches: HashMap<String, VecDeque<usize>>,
    rejected: HashSet<Attribute>,
    fail_commit: bool,
    fail_fetch_on_call: Option<usize>,
    fetch_calls: usize,
}

impl SimulatedDriver {
    pub fn new(channels: Vec<&str>) -> Self {
        Self {
            channels: channels.into_iter().map(str::to_string).collect(),
            calls: Vec::new(),
            record_length: 0,
            voltage_level: 0.0,
            delta_time: 1e-3,
            fetched: HashMap::new(),
            batches: HashMap::new(),
            rejected: HashSet::new(),
            fail_commit: false,
            fail_fetch_on_call: None,
            fetch_calls: 0,
        }
    }

    /// Script the sizes of successive fetches on one channel
    pub fn with_batches(mut self, channel: &str, sizes: Vec<usize>) -> Self {
        self.batches.insert(channel.to_string(), sizes.into());
        self
    }

    pub fn with_delta_time(mut self, delta_time: f64) -> Self {
        self.delta_time = delta_time;
        self
    }

    pub fn reject_attribute(mut self, attribute: Attribute) -> Self {
        self.rejected.insert(attribute);
        self
    }

    pub fn fail_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Make the n-th fetch call (1-based) fail
    pub fn fail_fetch_on_call(mut self, n: usize) -> Self {
        self.fail_fetch_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    fn remaining(&self, channel: &str) -> usize {
        let fetched = self.fetched.get(channel).copied().unwrap_or(0);
        usize::try_from(self.record_length)
            .unwrap_or(0)
            .saturating_sub(fetched)
    }

    fn next_batch(&self, channel: &str) -> usize {
        let remaining = self.remaining(channel);
        match self.batches.get(channel).and_then(|b| b.front()) {
            Some(size) => (*size).min(remaining),
            None => remaining,
        }
    }
}

impl DcPowerDriver for SimulatedDriver {
    fn open_session(
        &mut self,
        resource_name: &str,
        option_string: &str,
        _options: &SessionOptions,
    ) -> Result<SessionHandle, DcPowerError> {
        self.calls.push(Call::Open {
            resource_name: resource_name.to_string(),
            option_string: option_string.to_string(),
        });
        Ok(SessionHandle::new("sim-session"))
    }

    fn close_session(&mut self, _session: &SessionHandle) -> Result<(), DcPowerError> {
        self.calls.push(Call::Close);
        Ok(())
    }

    fn set_attribute(
        &mut self,
        _session: &SessionHandle,
        _channels: &str,
        attribute: Attribute,
        value: AttributeValue,
    ) -> Result<(), DcPowerError> {
        self.calls.push(Call::Set(attribute, value));
        if self.rejected.contains(&attribute) {
            return Err(DcPowerError::Driver {
                code: INVALID_VALUE,
                message: "Invalid value for parameter or property.".to_string(),
            });
        }
        match attribute {
            Attribute::MeasureRecordLength => self.record_length = value.as_i32()?,
            Attribute::VoltageLevel => self.voltage_level = value.as_f64()?,
            _ => {}
        }
        Ok(())
    }

    fn get_attribute(
        &mut self,
        _session: &SessionHandle,
        channels: &str,
        attribute: Attribute,
    ) -> Result<AttributeValue, DcPowerError> {
        self.calls.push(Call::Get(attribute));
        match attribute {
            Attribute::MeasureRecordDeltaTime => Ok(AttributeValue::Real64(self.delta_time)),
            Attribute::ChannelCount => Ok(AttributeValue::Int32(self.channels.len() as i32)),
            Attribute::FetchBacklog => Ok(AttributeValue::Int32(self.next_batch(channels) as i32)),
            Attribute::MeasureRecordLength => Ok(AttributeValue::Int32(self.record_length)),
            Attribute::VoltageLevel => Ok(AttributeValue::Real64(self.voltage_level)),
            other => Err(DcPowerError::Type(format!("{} not simulated", other.label()))),
        }
    }

    fn commit(&mut self, _session: &SessionHandle) -> Result<(), DcPowerError> {
        self.calls.push(Call::Commit);
        if self.fail_commit {
            return Err(DcPowerError::Driver {
                code: INVALID_VALUE,
                message: "Maximum voltage level exceeded.".to_string(),
            });
        }
        Ok(())
    }

    fn initiate(&mut self, _session: &SessionHandle, _channels: &str) -> Result<(), DcPowerError> {
        self.calls.push(Call::Initiate);
        Ok(())
    }

    fn abort(&mut self, _session: &SessionHandle, _channels: &str) -> Result<(), DcPowerError> {
        self.calls.push(Call::Abort);
        Ok(())
    }

    fn channel_names(
        &mut self,
        _session: &SessionHandle,
        indices: &str,
    ) -> Result<Vec<String>, DcPowerError> {
        self.calls.push(Call::ChannelNames(indices.to_string()));
        Ok(self.channels.clone())
    }

    fn fetch_multiple(
        &mut self,
        _session: &SessionHandle,
        channel: &str,
        count: usize,
        _timeout: Duration,
    ) -> Result<Vec<Measurement>, DcPowerError> {
        self.calls.push(Call::Fetch {
            channel: channel.to_string(),
            count,
        });
        self.fetch_calls += 1;
        if self.fail_fetch_on_call == Some(self.fetch_calls) {
            return Err(DcPowerError::Driver {
                code: -1074116059,
                message: "Fetch timed out.".to_string(),
            });
        }

        let available = self.next_batch(channel);
        let n = count.min(available);
        if let Some(queue) = self.batches.get_mut(channel) {
            queue.pop_front();
        }

        let start = self.fetched.get(channel).copied().unwrap_or(0);
        self.fetched.insert(channel.to_string(), start + n);

        Ok((start..start + n)
            .map(|i| Measurement {
                voltage: self.voltage_level - 1e-4 * i as f64,
                current: 1e-6 * (i + 1) as f64,
                in_compliance: false,
            })
            .collect())
    }
}
