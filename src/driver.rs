use std::time::Duration;

use crate::error::DcPowerError;
use crate::types::{Attribute, AttributeValue, Measurement, SessionHandle};

/// How the device server treats the session name when opening a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializationBehavior {
    /// Create the named session, or attach to it if it already exists
    #[default]
    Unspecified = 0,
    /// Always create a new session; fail if the name is taken
    InitializeServerSession = 1,
    /// Attach to an existing session; fail if it does not exist
    AttachToServerSession = 2,
}

/// Per-session options sent with the open request.
///
/// An empty `session_name` asks the server for a new, unnamed session
/// rather than reusing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub session_name: String,
    pub initialization_behavior: InitializationBehavior,
}

impl SessionOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            session_name: name.into(),
            ..Default::default()
        }
    }
}

/// Operations of an NI-DCPower driver service used by the measurement client.
///
/// [`crate::grpc::GrpcClient`] maps these onto the gRPC device server. Tests
/// implement it with a scripted in-memory driver.
///
/// Channel arguments are driver channel strings; an empty string addresses
/// every channel in the session.
pub trait DcPowerDriver {
    /// Open a session on the given resources
    fn open_session(
        &mut self,
        resource_name: &str,
        option_string: &str,
        options: &SessionOptions,
    ) -> Result<SessionHandle, DcPowerError>;

    /// Release a session on the server
    fn close_session(&mut self, session: &SessionHandle) -> Result<(), DcPowerError>;

    fn set_attribute(
        &mut self,
        session: &SessionHandle,
        channels: &str,
        attribute: Attribute,
        value: AttributeValue,
    ) -> Result<(), DcPowerError>;

    /// Read an attribute; the returned value has the attribute's kind
    fn get_attribute(
        &mut self,
        session: &SessionHandle,
        channels: &str,
        attribute: Attribute,
    ) -> Result<AttributeValue, DcPowerError>;

    /// Validate and apply pending configuration
    fn commit(&mut self, session: &SessionHandle) -> Result<(), DcPowerError>;

    fn initiate(&mut self, session: &SessionHandle, channels: &str) -> Result<(), DcPowerError>;

    fn abort(&mut self, session: &SessionHandle, channels: &str) -> Result<(), DcPowerError>;

    /// Expand channel indices such as `"0-2"` into channel names, in driver order
    fn channel_names(
        &mut self,
        session: &SessionHandle,
        indices: &str,
    ) -> Result<Vec<String>, DcPowerError>;

    /// Fetch up to `count` measurements from one channel
    fn fetch_multiple(
        &mut self,
        session: &SessionHandle,
        channel: &str,
        count: usize,
        timeout: Duration,
    ) -> Result<Vec<Measurement>, DcPowerError>;
}

/// Split a comma-separated channel list reply into trimmed names
pub fn split_channel_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
