pub mod config;
pub mod driver;
pub mod error;
pub mod grpc;
pub mod logger;
pub mod record;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::config::{load_config, IndexMode, RecordConfig};
pub use driver::{DcPowerDriver, InitializationBehavior, SessionOptions};
pub use error::DcPowerError;
pub use grpc::{ConnectionConfig, GrpcClient, GrpcClientBuilder};
pub use logger::{SampleLogger, SampleRecord};
pub use record::{MeasureRecord, RecordSummary};
pub use session::{Acquisition, MeasureConfig, Session};
pub use types::{
    Attribute, AttributeKind, AttributeValue, MeasureWhen, Measurement, SessionHandle,
};
