use super::GrpcClient;
use crate::driver::{DcPowerDriver, SessionOptions};
use crate::error::DcPowerError;
use crate::types::{Attribute, AttributeValue, Measurement, SessionHandle};
use std::time::Duration;

impl DcPowerDriver for GrpcClient {
    fn open_session(
        &mut self,
        resource_name: &str,
        option_string: &str,
        options: &SessionOptions,
    ) -> Result<SessionHandle, DcPowerError> {
        self.initialize_with_independent_channels(resource_name, option_string, options)
    }

    fn close_session(&mut self, session: &SessionHandle) -> Result<(), DcPowerError> {
        self.close(session)
    }

    fn set_attribute(
        &mut self,
        session: &SessionHandle,
        channels: &str,
        attribute: Attribute,
        value: AttributeValue,
    ) -> Result<(), DcPowerError> {
        self.set_attribute_value(session, channels, attribute, value)
    }

    fn get_attribute(
        &mut self,
        session: &SessionHandle,
        channels: &str,
        attribute: Attribute,
    ) -> Result<AttributeValue, DcPowerError> {
        self.get_attribute_value(session, channels, attribute)
    }

    fn commit(&mut self, session: &SessionHandle) -> Result<(), DcPowerError> {
        GrpcClient::commit(self, session)
    }

    fn initiate(&mut self, session: &SessionHandle, channels: &str) -> Result<(), DcPowerError> {
        self.initiate_with_channels(session, channels)
    }

    fn abort(&mut self, session: &SessionHandle, channels: &str) -> Result<(), DcPowerError> {
        self.abort_with_channels(session, channels)
    }

    fn channel_names(
        &mut self,
        session: &SessionHandle,
        indices: &str,
    ) -> Result<Vec<String>, DcPowerError> {
        self.get_channel_names(session, indices)
    }

    fn fetch_multiple(
        &mut self,
        session: &SessionHandle,
        channel: &str,
        count: usize,
        timeout: Duration,
    ) -> Result<Vec<Measurement>, DcPowerError> {
        GrpcClient::fetch_multiple(self, session, channel, count, timeout)
    }
}
