//! Unary stubs for the `nidcpower_grpc.NiDCPower` service.

use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Status};

use super::proto::*;

const INITIALIZE_WITH_INDEPENDENT_CHANNELS: &str =
    "/nidcpower_grpc.NiDCPower/InitializeWithIndependentChannels";
const CLOSE: &str = "/nidcpower_grpc.NiDCPower/Close";
const SET_ATTRIBUTE_VI_INT32: &str = "/nidcpower_grpc.NiDCPower/SetAttributeViInt32";
const SET_ATTRIBUTE_VI_REAL64: &str = "/nidcpower_grpc.NiDCPower/SetAttributeViReal64";
const SET_ATTRIBUTE_VI_BOOLEAN: &str = "/nidcpower_grpc.NiDCPower/SetAttributeViBoolean";
const GET_ATTRIBUTE_VI_INT32: &str = "/nidcpower_grpc.NiDCPower/GetAttributeViInt32";
const GET_ATTRIBUTE_VI_REAL64: &str = "/nidcpower_grpc.NiDCPower/GetAttributeViReal64";
const GET_ATTRIBUTE_VI_BOOLEAN: &str = "/nidcpower_grpc.NiDCPower/GetAttributeViBoolean";
const COMMIT: &str = "/nidcpower_grpc.NiDCPower/Commit";
const INITIATE_WITH_CHANNELS: &str = "/nidcpower_grpc.NiDCPower/InitiateWithChannels";
const ABORT_WITH_CHANNELS: &str = "/nidcpower_grpc.NiDCPower/AbortWithChannels";
const GET_CHANNEL_NAME_FROM_STRING: &str = "/nidcpower_grpc.NiDCPower/GetChannelNameFromString";
const FETCH_MULTIPLE: &str = "/nidcpower_grpc.NiDCPower/FetchMultiple";
const ERROR_MESSAGE: &str = "/nidcpower_grpc.NiDCPower/ErrorMessage";

#[derive(Debug, Clone)]
pub struct NiDcPowerServiceClient {
    inner: Grpc<Channel>,
}

impl NiDcPowerServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    async fn unary<Req, Resp>(&mut self, path: &'static str, request: Req) -> Result<Resp, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {e}")))?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = self
            .inner
            .unary(Request::new(request), PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }

    pub async fn initialize_with_independent_channels(
        &mut self,
        request: InitializeWithIndependentChannelsRequest,
    ) -> Result<InitializeWithIndependentChannelsResponse, Status> {
        self.unary(INITIALIZE_WITH_INDEPENDENT_CHANNELS, request).await
    }

    pub async fn close(&mut self, request: SessionRequest) -> Result<StatusResponse, Status> {
        self.unary(CLOSE, request).await
    }

    pub async fn set_attribute_vi_int32(
        &mut self,
        request: SetAttributeViInt32Request,
    ) -> Result<StatusResponse, Status> {
        self.unary(SET_ATTRIBUTE_VI_INT32, request).await
    }

    pub async fn set_attribute_vi_real64(
        &mut self,
        request: SetAttributeViReal64Request,
    ) -> Result<StatusResponse, Status> {
        self.unary(SET_ATTRIBUTE_VI_REAL64, request).await
    }

    pub async fn set_attribute_vi_boolean(
        &mut self,
        request: SetAttributeViBooleanRequest,
    ) -> Result<StatusResponse, Status> {
        self.unary(SET_ATTRIBUTE_VI_BOOLEAN, request).await
    }

    pub async fn get_attribute_vi_int32(
        &mut self,
        request: GetAttributeRequest,
    ) -> Result<GetAttributeViInt32Response, Status> {
        self.unary(GET_ATTRIBUTE_VI_INT32, request).await
    }

    pub async fn get_attribute_vi_real64(
        &mut self,
        request: GetAttributeRequest,
    ) -> Result<GetAttributeViReal64Response, Status> {
        self.unary(GET_ATTRIBUTE_VI_REAL64, request).await
    }

    pub async fn get_attribute_vi_boolean(
        &mut self,
        request: GetAttributeRequest,
    ) -> Result<GetAttributeViBooleanResponse, Status> {
        self.unary(GET_ATTRIBUTE_VI_BOOLEAN, request).await
    }

    pub async fn commit(&mut self, request: SessionRequest) -> Result<StatusResponse, Status> {
        self.unary(COMMIT, request).await
    }

    pub async fn initiate_with_channels(
        &mut self,
        request: ChannelsRequest,
    ) -> Result<StatusResponse, Status> {
        self.unary(INITIATE_WITH_CHANNELS, request).await
    }

    pub async fn abort_with_channels(
        &mut self,
        request: ChannelsRequest,
    ) -> Result<StatusResponse, Status> {
        self.unary(ABORT_WITH_CHANNELS, request).await
    }

    pub async fn get_channel_name_from_string(
        &mut self,
        request: GetChannelNameFromStringRequest,
    ) -> Result<GetChannelNameFromStringResponse, Status> {
        self.unary(GET_CHANNEL_NAME_FROM_STRING, request).await
    }

    pub async fn fetch_multiple(
        &mut self,
        request: FetchMultipleRequest,
    ) -> Result<FetchMultipleResponse, Status> {
        self.unary(FETCH_MULTIPLE, request).await
    }

    pub async fn error_message(
        &mut self,
        request: ErrorMessageRequest,
    ) -> Result<ErrorMessageResponse, Status> {
        self.unary(ERROR_MESSAGE, request).await
    }
}
