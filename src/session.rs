use std::ops::{Deref, DerefMut};
use std::time::Duration;

use log::{debug, info, warn};

use crate::driver::{DcPowerDriver, SessionOptions};
use crate::error::DcPowerError;
use crate::types::{Attribute, AttributeValue, MeasureWhen, Measurement, SessionHandle};

/// Channel string addressing every channel in the session
const ALL_CHANNELS: &str = "";

/// Measurement settings applied to an open session in one call.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureConfig {
    /// Samples per channel; passed to the driver unchecked
    pub record_length: i32,
    pub voltage_level: f64,
    pub measure_when: MeasureWhen,
}

impl MeasureConfig {
    pub fn new(record_length: i32, voltage_level: f64) -> Self {
        Self {
            record_length,
            voltage_level,
            measure_when: MeasureWhen::AutomaticallyAfterSourceComplete,
        }
    }
}

/// An open driver session, closed when dropped.
///
/// The session borrows the driver for its whole lifetime, so nothing else
/// can talk to the service while it is open.
pub struct Session<'d, D: DcPowerDriver> {
    driver: &'d mut D,
    handle: SessionHandle,
}

impl<'d, D: DcPowerDriver> Session<'d, D> {
    /// Open a session on `resource_names` (joined with `", "`).
    pub fn open(
        driver: &'d mut D,
        resource_names: &[String],
        option_string: &str,
        options: &SessionOptions,
    ) -> Result<Self, DcPowerError> {
        let resource_name = resource_names.join(", ");
        let handle = driver.open_session(&resource_name, option_string, options)?;
        debug!("Session '{}' open on '{resource_name}'", handle.name());
        Ok(Self { driver, handle })
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Apply record length, finite record, measure-when and voltage level.
    ///
    /// Nothing reaches the hardware until [`Session::commit`].
    ///
    /// # Errors
    /// [`DcPowerError::Configuration`] naming the attribute the driver rejected.
    pub fn configure(&mut self, config: &MeasureConfig) -> Result<(), DcPowerError> {
        let settings: [(Attribute, AttributeValue); 4] = [
            (Attribute::MeasureRecordLength, config.record_length.into()),
            (Attribute::MeasureRecordLengthIsFinite, true.into()),
            (Attribute::MeasureWhen, config.measure_when.into()),
            (Attribute::VoltageLevel, config.voltage_level.into()),
        ];

        for (attribute, value) in settings {
            self.driver
                .set_attribute(&self.handle, ALL_CHANNELS, attribute, value)
                .map_err(|e| e.rejected(attribute.label()))?;
        }
        Ok(())
    }

    /// Validate and apply the configuration on the instrument
    pub fn commit(&mut self) -> Result<(), DcPowerError> {
        self.driver
            .commit(&self.handle)
            .map_err(|e| e.rejected("commit"))
    }

    /// Start sourcing and measuring; acquisition stops when the guard drops
    pub fn initiate(&mut self) -> Result<Acquisition<'_, 'd, D>, DcPowerError> {
        self.driver.initiate(&self.handle, ALL_CHANNELS)?;
        debug!("Acquisition started on '{}'", self.handle.name());
        Ok(Acquisition { session: self })
    }

    /// Interval between samples of the measure record, in seconds
    pub fn measure_record_delta_time(&mut self) -> Result<f64, DcPowerError> {
        self.driver
            .get_attribute(&self.handle, ALL_CHANNELS, Attribute::MeasureRecordDeltaTime)?
            .as_f64()
    }

    pub fn channel_count(&mut self) -> Result<usize, DcPowerError> {
        let count = self
            .driver
            .get_attribute(&self.handle, ALL_CHANNELS, Attribute::ChannelCount)?
            .as_i32()?;
        usize::try_from(count)
            .map_err(|_| DcPowerError::Type(format!("negative channel count {count}")))
    }

    /// Names of every channel in the session, in driver order
    pub fn channel_names(&mut self) -> Result<Vec<String>, DcPowerError> {
        let count = self.channel_count()?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let indices = format!("0-{}", count - 1);
        self.driver.channel_names(&self.handle, &indices)
    }

    /// Samples ready to fetch on `channel` without blocking
    pub fn fetch_backlog(&mut self, channel: &str) -> Result<usize, DcPowerError> {
        let backlog = self
            .driver
            .get_attribute(&self.handle, channel, Attribute::FetchBacklog)?
            .as_i32()?;
        Ok(usize::try_from(backlog).unwrap_or(0))
    }

    pub fn fetch_multiple(
        &mut self,
        channel: &str,
        count: usize,
        timeout: Duration,
    ) -> Result<Vec<Measurement>, DcPowerError> {
        self.driver
            .fetch_multiple(&self.handle, channel, count, timeout)
    }
}

impl<D: DcPowerDriver> Drop for Session<'_, D> {
    fn drop(&mut self) {
        match self.driver.close_session(&self.handle) {
            Ok(()) => info!("Session '{}' closed", self.handle.name()),
            Err(e) => warn!("Failed to close session '{}': {e}", self.handle.name()),
        }
    }
}

/// A running acquisition, aborted when dropped.
///
/// Dereferences to the [`Session`] so fetches go through the guard.
pub struct Acquisition<'s, 'd, D: DcPowerDriver> {
    session: &'s mut Session<'d, D>,
}

impl<'d, D: DcPowerDriver> Deref for Acquisition<'_, 'd, D> {
    type Target = Session<'d, D>;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl<D: DcPowerDriver> DerefMut for Acquisition<'_, '_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl<D: DcPowerDriver> Drop for Acquisition<'_, '_, D> {
    fn drop(&mut self) {
        let session = &mut *self.session;
        match session.driver.abort(&session.handle, ALL_CHANNELS) {
            Ok(()) => debug!("Acquisition stopped on '{}'", session.handle.name()),
            Err(e) => warn!("Failed to abort acquisition on '{}': {e}", session.handle.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, SimulatedDriver};

    fn resources() -> Vec<String> {
        vec!["PXI1Slot2/0".to_string(), "PXI1Slot3/0-1".to_string()]
    }

    #[test]
    fn test_open_joins_resources_and_closes_on_drop() {
        let mut driver = SimulatedDriver::new(vec!["PXI1Slot2/0"]);
        {
            let session =
                Session::open(&mut driver, &resources(), "Simulate=1", &SessionOptions::default())
                    .unwrap();
            assert_eq!(session.handle().name(), "sim-session");
        }

        assert_eq!(
            driver.calls()[0],
            Call::Open {
                resource_name: "PXI1Slot2/0, PXI1Slot3/0-1".to_string(),
                option_string: "Simulate=1".to_string(),
            }
        );
        assert_eq!(driver.calls().last(), Some(&Call::Close));
    }

    #[test]
    fn test_configure_sets_all_attributes() {
        let mut driver = SimulatedDriver::new(vec!["0"]);
        {
            let mut session =
                Session::open(&mut driver, &resources(), "", &SessionOptions::default()).unwrap();
            session.configure(&MeasureConfig::new(20, 5.0)).unwrap();
        }

        let sets: Vec<_> = driver
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::Set(attribute, value) => Some((*attribute, *value)),
                _ => None,
            })
            .collect();
        assert_eq!(
            sets,
            vec![
                (Attribute::MeasureRecordLength, AttributeValue::Int32(20)),
                (Attribute::MeasureRecordLengthIsFinite, AttributeValue::Boolean(true)),
                (Attribute::MeasureWhen, AttributeValue::Int32(1025)),
                (Attribute::VoltageLevel, AttributeValue::Real64(5.0)),
            ]
        );
    }

    #[test]
    fn test_rejected_voltage_is_configuration_error() {
        let mut driver = SimulatedDriver::new(vec!["0"]).reject_attribute(Attribute::VoltageLevel);
        let mut session =
            Session::open(&mut driver, &resources(), "", &SessionOptions::default()).unwrap();

        let err = session.configure(&MeasureConfig::new(20, 500.0)).unwrap_err();
        match err {
            DcPowerError::Configuration(msg) => assert!(msg.starts_with("voltage level")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_acquisition_aborts_before_session_closes() {
        let mut driver = SimulatedDriver::new(vec!["0"]);
        {
            let mut session =
                Session::open(&mut driver, &resources(), "", &SessionOptions::default()).unwrap();
            let _acquisition = session.initiate().unwrap();
        }

        let tail: Vec<_> = driver.calls().iter().rev().take(3).rev().cloned().collect();
        assert_eq!(tail, vec![Call::Initiate, Call::Abort, Call::Close]);
    }

    #[test]
    fn test_channel_names_expand_full_range() {
        let mut driver = SimulatedDriver::new(vec!["PXI1Slot2/0", "PXI1Slot3/0", "PXI1Slot3/1"]);
        let mut session =
            Session::open(&mut driver, &resources(), "", &SessionOptions::default()).unwrap();

        let names = session.channel_names().unwrap();
        assert_eq!(names, vec!["PXI1Slot2/0", "PXI1Slot3/0", "PXI1Slot3/1"]);
        drop(session);
        assert!(driver
            .calls()
            .contains(&Call::ChannelNames("0-2".to_string())));
    }
}
