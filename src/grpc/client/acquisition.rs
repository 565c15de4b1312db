use super::{map_status, GrpcClient};
use crate::driver::split_channel_list;
use crate::error::DcPowerError;
use crate::grpc::proto::{
    ChannelsRequest, FetchMultipleRequest, FetchMultipleResponse,
    GetChannelNameFromStringRequest, Session, SessionRequest,
};
use crate::types::{Measurement, SessionHandle};
use log::{debug, trace};
use std::time::Duration;

impl GrpcClient {
    /// Validate and apply the pending configuration without starting
    /// generation or acquisition.
    pub fn commit(&mut self, session: &SessionHandle) -> Result<(), DcPowerError> {
        let request = SessionRequest {
            vi: Session::named(session.name()),
        };
        let reply = self
            .runtime
            .block_on(self.service.commit(request))
            .map_err(map_status)?;
        self.check_status(Some(session), reply.status, "Commit")
    }

    /// Start sourcing and measuring on the given channels (empty = all)
    pub fn initiate_with_channels(
        &mut self,
        session: &SessionHandle,
        channels: &str,
    ) -> Result<(), DcPowerError> {
        let request = ChannelsRequest {
            vi: Session::named(session.name()),
            channel_name: channels.to_string(),
        };
        let reply = self
            .runtime
            .block_on(self.service.initiate_with_channels(request))
            .map_err(map_status)?;
        self.check_status(Some(session), reply.status, "Initiate")
    }

    /// Stop sourcing and measuring on the given channels (empty = all)
    pub fn abort_with_channels(
        &mut self,
        session: &SessionHandle,
        channels: &str,
    ) -> Result<(), DcPowerError> {
        let request = ChannelsRequest {
            vi: Session::named(session.name()),
            channel_name: channels.to_string(),
        };
        let reply = self
            .runtime
            .block_on(self.service.abort_with_channels(request))
            .map_err(map_status)?;
        self.check_status(Some(session), reply.status, "Abort")
    }

    /// Expand channel indices (e.g. `"0-2"`) to the session's channel names
    pub fn get_channel_names(
        &mut self,
        session: &SessionHandle,
        indices: &str,
    ) -> Result<Vec<String>, DcPowerError> {
        let request = GetChannelNameFromStringRequest {
            vi: Session::named(session.name()),
            indices: indices.to_string(),
        };
        let reply = self
            .runtime
            .block_on(self.service.get_channel_name_from_string(request))
            .map_err(map_status)?;
        self.check_status(Some(session), reply.status, "GetChannelNameFromString")?;

        let names = split_channel_list(&reply.channel_name);
        debug!("Channels for '{indices}': {names:?}");
        Ok(names)
    }

    /// Fetch up to `count` measurements from one channel.
    ///
    /// Blocks until `count` samples are available or `timeout` expires.
    ///
    /// # Errors
    /// `DcPowerError::Type` if the reply arrays are shorter than the
    /// reported sample count.
    pub fn fetch_multiple(
        &mut self,
        session: &SessionHandle,
        channel: &str,
        count: usize,
        timeout: Duration,
    ) -> Result<Vec<Measurement>, DcPowerError> {
        let count = i32::try_from(count)
            .map_err(|_| DcPowerError::Type(format!("fetch count {count} out of range")))?;
        let request = FetchMultipleRequest {
            vi: Session::named(session.name()),
            channel_name: channel.to_string(),
            timeout: timeout.as_secs_f64(),
            count,
        };
        let reply = self
            .runtime
            .block_on(self.service.fetch_multiple(request))
            .map_err(map_status)?;
        self.check_status(Some(session), reply.status, "FetchMultiple")?;

        let measurements = measurements_from_reply(reply)?;
        trace!("Fetched {} of {count} from '{channel}'", measurements.len());
        Ok(measurements)
    }
}

/// Zip the parallel reply arrays into the first `actual_count` measurements.
///
/// Arrays longer than `actual_count` are allowed and the surplus is dropped.
pub(crate) fn measurements_from_reply(
    reply: FetchMultipleResponse,
) -> Result<Vec<Measurement>, DcPowerError> {
    let actual = usize::try_from(reply.actual_count).map_err(|_| {
        DcPowerError::Type(format!(
            "FetchMultiple reported a negative sample count {}",
            reply.actual_count
        ))
    })?;
    if reply.voltage_measurements.len() < actual
        || reply.current_measurements.len() < actual
        || reply.in_compliance.len() < actual
    {
        return Err(DcPowerError::Type(format!(
            "FetchMultiple reported {actual} samples but returned {}/{}/{} values",
            reply.voltage_measurements.len(),
            reply.current_measurements.len(),
            reply.in_compliance.len()
        )));
    }

    Ok(reply
        .voltage_measurements
        .into_iter()
        .zip(reply.current_measurements)
        .zip(reply.in_compliance)
        .take(actual)
        .map(|((voltage, current), in_compliance)| Measurement {
            voltage,
            current,
            in_compliance,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(
        voltages: &[f64],
        currents: &[f64],
        compliance: &[bool],
        actual: i32,
    ) -> FetchMultipleResponse {
        FetchMultipleResponse {
            status: 0,
            voltage_measurements: voltages.to_vec(),
            current_measurements: currents.to_vec(),
            in_compliance: compliance.to_vec(),
            actual_count: actual,
        }
    }

    #[test]
    fn test_reply_with_matching_arrays() {
        let measurements =
            measurements_from_reply(reply(&[5.0, 4.999], &[1e-6, 2e-6], &[false, true], 2))
                .unwrap();
        assert_eq!(
            measurements,
            vec![
                Measurement {
                    voltage: 5.0,
                    current: 1e-6,
                    in_compliance: false
                },
                Measurement {
                    voltage: 4.999,
                    current: 2e-6,
                    in_compliance: true
                },
            ]
        );
    }

    #[test]
    fn test_reply_surplus_values_are_dropped() {
        let measurements = measurements_from_reply(reply(
            &[1.0, 2.0, 3.0],
            &[0.1, 0.2, 0.3],
            &[false, false, true],
            2,
        ))
        .unwrap();
        assert_eq!(measurements.len(), 2);
        assert_eq!(measurements[1].voltage, 2.0);
    }

    #[test]
    fn test_reply_short_array_is_type_error() {
        let result = measurements_from_reply(reply(&[1.0, 2.0], &[0.1], &[false, false], 2));
        assert!(matches!(result, Err(DcPowerError::Type(_))));
    }

    #[test]
    fn test_reply_negative_count_is_type_error() {
        let result = measurements_from_reply(reply(&[1.0], &[0.1], &[false], -1));
        assert!(matches!(result, Err(DcPowerError::Type(_))));
    }

    #[test]
    fn test_reply_with_no_samples() {
        let measurements = measurements_from_reply(reply(&[], &[], &[], 0)).unwrap();
        assert!(measurements.is_empty());
    }
}
