use serde::{Deserialize, Serialize};

use crate::error::DcPowerError;

/// One voltage/current reading fetched from a channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub voltage: f64,
    pub current: f64,
    pub in_compliance: bool,
}

/// Opaque name of a session held open by the device server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle {
    name: String,
}

impl SessionHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Value kind stored by a driver attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Int32,
    Real64,
    Boolean,
}

/// NI-DCPower attributes used by the measurement client.
///
/// Discriminants are the driver's attribute ids and go on the wire as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    MeasureRecordLength = 1150063,
    MeasureRecordLengthIsFinite = 1150064,
    MeasureWhen = 1150057,
    VoltageLevel = 1250001,
    MeasureRecordDeltaTime = 1150065,
    FetchBacklog = 1150056,
    ChannelCount = 1050203,
}

impl Attribute {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            Attribute::MeasureRecordLength
            | Attribute::MeasureWhen
            | Attribute::FetchBacklog
            | Attribute::ChannelCount => AttributeKind::Int32,
            Attribute::VoltageLevel | Attribute::MeasureRecordDeltaTime => AttributeKind::Real64,
            Attribute::MeasureRecordLengthIsFinite => AttributeKind::Boolean,
        }
    }

    /// Human-readable name used in log lines and error messages
    pub fn label(self) -> &'static str {
        match self {
            Attribute::MeasureRecordLength => "measure record length",
            Attribute::MeasureRecordLengthIsFinite => "measure record length is finite",
            Attribute::MeasureWhen => "measure when",
            Attribute::VoltageLevel => "voltage level",
            Attribute::MeasureRecordDeltaTime => "measure record delta time",
            Attribute::FetchBacklog => "fetch backlog",
            Attribute::ChannelCount => "channel count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Int32(i32),
    Real64(f64),
    Boolean(bool),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Int32(_) => AttributeKind::Int32,
            AttributeValue::Real64(_) => AttributeKind::Real64,
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
        }
    }

    pub fn as_i32(&self) -> Result<i32, DcPowerError> {
        match self {
            AttributeValue::Int32(v) => Ok(*v),
            other => Err(DcPowerError::Type(format!("Expected Int32, got {other:?}"))),
        }
    }

    pub fn as_f64(&self) -> Result<f64, DcPowerError> {
        match self {
            AttributeValue::Real64(v) => Ok(*v),
            other => Err(DcPowerError::Type(format!("Expected Real64, got {other:?}"))),
        }
    }

    pub fn as_bool(&self) -> Result<bool, DcPowerError> {
        match self {
            AttributeValue::Boolean(v) => Ok(*v),
            other => Err(DcPowerError::Type(format!("Expected Boolean, got {other:?}"))),
        }
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int32(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Real64(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

/// When the SMU takes a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureWhen {
    /// Record starts once the source operation completes
    AutomaticallyAfterSourceComplete = 1025,
    OnDemand = 1026,
    OnMeasureTrigger = 1027,
}

impl From<MeasureWhen> for AttributeValue {
    fn from(when: MeasureWhen) -> Self {
        AttributeValue::Int32(when as i32)
    }
}
