//! Request and response messages of the `nidcpower_grpc.NiDCPower` service.
//!
//! Only the calls the measurement client issues are declared. Field numbers
//! follow the device server's `nidcpower.proto` and `session.proto`. Enum
//! fields are carried as their raw `int32` value and driver `ViInt32`
//! parameters as `sint32`.

/// `nidevice_grpc.Session`
#[derive(Clone, PartialEq, prost::Message)]
pub struct Session {
    #[prost(string, tag = "1")]
    pub name: String,
}

impl Session {
    pub fn named(name: &str) -> Option<Self> {
        Some(Self {
            name: name.to_string(),
        })
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct InitializeWithIndependentChannelsRequest {
    #[prost(string, tag = "1")]
    pub session_name: String,
    #[prost(string, tag = "2")]
    pub resource_name: String,
    #[prost(bool, tag = "3")]
    pub reset: bool,
    #[prost(string, tag = "4")]
    pub option_string: String,
    #[prost(int32, tag = "5")]
    pub initialization_behavior: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct InitializeWithIndependentChannelsResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub vi: Option<Session>,
    #[prost(string, tag = "3")]
    pub error_message: String,
    #[prost(bool, tag = "4")]
    pub new_session_initialized: bool,
}

/// Request carrying only a session, shared by `Close` and `Commit`
#[derive(Clone, PartialEq, prost::Message)]
pub struct SessionRequest {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
}

/// Request carrying a session and channel string, shared by
/// `InitiateWithChannels` and `AbortWithChannels`
#[derive(Clone, PartialEq, prost::Message)]
pub struct ChannelsRequest {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(string, tag = "2")]
    pub channel_name: String,
}

/// Reply carrying only a driver status code
#[derive(Clone, PartialEq, prost::Message)]
pub struct StatusResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetAttributeViInt32Request {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(string, tag = "2")]
    pub channel_name: String,
    #[prost(int32, tag = "3")]
    pub attribute_id: i32,
    #[prost(sint32, tag = "5")]
    pub value_raw: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetAttributeViReal64Request {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(string, tag = "2")]
    pub channel_name: String,
    #[prost(int32, tag = "3")]
    pub attribute_id: i32,
    #[prost(double, tag = "5")]
    pub value_raw: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetAttributeViBooleanRequest {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(string, tag = "2")]
    pub channel_name: String,
    #[prost(int32, tag = "3")]
    pub attribute_id: i32,
    #[prost(bool, tag = "4")]
    pub value: bool,
}

/// Shared by every `GetAttributeVi*` call
#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAttributeRequest {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(string, tag = "2")]
    pub channel_name: String,
    #[prost(int32, tag = "3")]
    pub attribute_id: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAttributeViInt32Response {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(sint32, tag = "2")]
    pub value: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAttributeViReal64Response {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(double, tag = "2")]
    pub value: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAttributeViBooleanResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(bool, tag = "2")]
    pub value: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetChannelNameFromStringRequest {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(string, tag = "2")]
    pub indices: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetChannelNameFromStringResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub channel_name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FetchMultipleRequest {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(string, tag = "2")]
    pub channel_name: String,
    #[prost(double, tag = "3")]
    pub timeout: f64,
    #[prost(sint32, tag = "4")]
    pub count: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FetchMultipleResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(double, repeated, tag = "2")]
    pub voltage_measurements: Vec<f64>,
    #[prost(double, repeated, tag = "3")]
    pub current_measurements: Vec<f64>,
    #[prost(bool, repeated, tag = "4")]
    pub in_compliance: Vec<bool>,
    #[prost(sint32, tag = "5")]
    pub actual_count: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ErrorMessageRequest {
    #[prost(message, optional, tag = "1")]
    pub vi: Option<Session>,
    #[prost(sint32, tag = "2")]
    pub error_code: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ErrorMessageResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_fetch_response_decodes_packed_arrays() {
        let reply = FetchMultipleResponse {
            status: 0,
            voltage_measurements: vec![5.0, 4.999],
            current_measurements: vec![1e-6, 2e-6],
            in_compliance: vec![false, true],
            actual_count: 2,
        };
        let bytes = reply.encode_to_vec();
        let decoded = FetchMultipleResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.actual_count, 2);
        assert_eq!(decoded.in_compliance, vec![false, true]);
    }
}
