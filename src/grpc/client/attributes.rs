use super::{map_status, GrpcClient};
use crate::error::DcPowerError;
use crate::grpc::proto::{
    GetAttributeRequest, Session, SetAttributeViBooleanRequest, SetAttributeViInt32Request,
    SetAttributeViReal64Request,
};
use crate::types::{Attribute, AttributeKind, AttributeValue, SessionHandle};
use log::debug;

impl GrpcClient {
    /// Write an attribute, dispatching on the value kind.
    ///
    /// # Errors
    /// `DcPowerError::Type` if the value kind does not match the attribute,
    /// `DcPowerError::Driver` if the driver rejects the value.
    pub fn set_attribute_value(
        &mut self,
        session: &SessionHandle,
        channels: &str,
        attribute: Attribute,
        value: AttributeValue,
    ) -> Result<(), DcPowerError> {
        if value.kind() != attribute.kind() {
            return Err(DcPowerError::Type(format!(
                "{} expects {:?}, got {:?}",
                attribute.label(),
                attribute.kind(),
                value
            )));
        }

        debug!("Set {} on '{channels}' to {value:?}", attribute.label());

        let vi = Session::named(session.name());
        let channel_name = channels.to_string();
        let attribute_id = attribute.id();

        let reply = match value {
            AttributeValue::Int32(value_raw) => self.runtime.block_on(
                self.service
                    .set_attribute_vi_int32(SetAttributeViInt32Request {
                        vi,
                        channel_name,
                        attribute_id,
                        value_raw,
                    }),
            ),
            AttributeValue::Real64(value_raw) => self.runtime.block_on(
                self.service
                    .set_attribute_vi_real64(SetAttributeViReal64Request {
                        vi,
                        channel_name,
                        attribute_id,
                        value_raw,
                    }),
            ),
            AttributeValue::Boolean(value) => self.runtime.block_on(
                self.service
                    .set_attribute_vi_boolean(SetAttributeViBooleanRequest {
                        vi,
                        channel_name,
                        attribute_id,
                        value,
                    }),
            ),
        }
        .map_err(map_status)?;

        self.check_status(Some(session), reply.status, attribute.label())
    }

    /// Read an attribute using the call matching its kind
    pub fn get_attribute_value(
        &mut self,
        session: &SessionHandle,
        channels: &str,
        attribute: Attribute,
    ) -> Result<AttributeValue, DcPowerError> {
        let request = GetAttributeRequest {
            vi: Session::named(session.name()),
            channel_name: channels.to_string(),
            attribute_id: attribute.id(),
        };

        let (status, value) = match attribute.kind() {
            AttributeKind::Int32 => {
                let reply = self
                    .runtime
                    .block_on(self.service.get_attribute_vi_int32(request))
                    .map_err(map_status)?;
                (reply.status, AttributeValue::Int32(reply.value))
            }
            AttributeKind::Real64 => {
                let reply = self
                    .runtime
                    .block_on(self.service.get_attribute_vi_real64(request))
                    .map_err(map_status)?;
                (reply.status, AttributeValue::Real64(reply.value))
            }
            AttributeKind::Boolean => {
                let reply = self
                    .runtime
                    .block_on(self.service.get_attribute_vi_boolean(request))
                    .map_err(map_status)?;
                (reply.status, AttributeValue::Boolean(reply.value))
            }
        };

        self.check_status(Some(session), status, attribute.label())?;
        debug!("Read {} on '{channels}': {value:?}", attribute.label());
        Ok(value)
    }
}
