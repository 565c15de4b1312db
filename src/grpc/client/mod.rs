use super::proto::{ErrorMessageRequest, Session};
use super::service::NiDcPowerServiceClient;
use crate::error::DcPowerError;
use crate::types::SessionHandle;
use log::{debug, warn};
use std::time::Duration;
use tokio::runtime::Runtime;
use tonic::transport::Channel;

pub mod acquisition;
pub mod attributes;
pub mod driver_impl;
pub mod session;

/// Metadata key under which the device server reports the driver status code
const NI_ERROR_METADATA: &str = "ni-error";

/// Connection configuration for the gRPC device server client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rusty_dcpower::ConnectionConfig;
///
/// let config = ConnectionConfig {
///     connect_timeout: Duration::from_secs(30),
///     ..Default::default()
/// };
/// assert!(config.request_timeout.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Timeout for establishing the HTTP/2 channel
    pub connect_timeout: Duration,
    /// Deadline applied to every call; `None` leaves it to the server
    pub request_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: None,
        }
    }
}

/// Builder for [`GrpcClient`].
///
/// ```no_run
/// use rusty_dcpower::GrpcClient;
///
/// let client = GrpcClient::builder()
///     .address("localhost")
///     .port("31763")
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct GrpcClientBuilder {
    address: Option<String>,
    port: Option<String>,
    config: ConnectionConfig,
}

impl GrpcClientBuilder {
    pub fn address(mut self, addr: &str) -> Self {
        self.address = Some(addr.to_string());
        self
    }

    pub fn port(mut self, port: &str) -> Self {
        self.port = Some(port.to_string());
        self
    }

    /// Set the full connection configuration
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Connect to the device server.
    ///
    /// # Errors
    /// [`DcPowerError::InvalidAddress`] if address or port cannot form a URI,
    /// [`DcPowerError::Connection`] if the channel cannot be established.
    pub fn build(self) -> Result<GrpcClient, DcPowerError> {
        let address = self
            .address
            .ok_or_else(|| DcPowerError::Usage("Address must be specified".to_string()))?;
        let port = self
            .port
            .ok_or_else(|| DcPowerError::Usage("Port must be specified".to_string()))?;

        let uri = endpoint_uri(&address, &port)?;

        let mut endpoint = Channel::from_shared(uri.clone())
            .map_err(|_| DcPowerError::InvalidAddress(uri.clone()))?
            .connect_timeout(self.config.connect_timeout);
        if let Some(timeout) = self.config.request_timeout {
            endpoint = endpoint.timeout(timeout);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| DcPowerError::Io {
                source,
                context: "Creating gRPC runtime".to_string(),
            })?;

        debug!("Connecting to device server at {uri}");

        let channel = runtime.block_on(endpoint.connect()).map_err(|e| {
            warn!("Failed to connect to {uri}: {e}");
            DcPowerError::Connection(format!("Failed to connect to {uri}: {e}"))
        })?;

        debug!("Channel to {uri} established");

        Ok(GrpcClient {
            service: NiDcPowerServiceClient::new(channel),
            runtime,
            config: self.config,
        })
    }
}

/// Build the `http://host:port` endpoint URI, validating the port.
fn endpoint_uri(address: &str, port: &str) -> Result<String, DcPowerError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(DcPowerError::InvalidAddress("empty address".to_string()));
    }
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|_| DcPowerError::InvalidAddress(format!("invalid port '{port}'")))?;

    let host = address
        .strip_prefix("http://")
        .or_else(|| address.strip_prefix("https://"))
        .unwrap_or(address);
    Ok(format!("http://{host}:{port}"))
}

/// Blocking client for the NI-DCPower service of the NI gRPC Device Server.
///
/// Each call blocks the calling thread on a private current-thread runtime
/// until the server replies. Driver status codes in replies are checked:
/// negative codes become [`DcPowerError::Driver`] with the server's error
/// text, positive codes are logged as warnings.
pub struct GrpcClient {
    service: NiDcPowerServiceClient,
    runtime: Runtime,
    config: ConnectionConfig,
}

impl GrpcClient {
    /// Connect with default timeouts
    pub fn new(addr: &str, port: &str) -> Result<Self, DcPowerError> {
        Self::builder().address(addr).port(port).build()
    }

    pub fn builder() -> GrpcClientBuilder {
        GrpcClientBuilder::default()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Turn a reply status into a result, looking up the error text on failure.
    fn check_status(
        &mut self,
        session: Option<&SessionHandle>,
        status: i32,
        call: &str,
    ) -> Result<(), DcPowerError> {
        if status == 0 {
            return Ok(());
        }

        let message = self.error_message(session, status);
        status_outcome(status, message, call)
    }

    fn error_message(&mut self, session: Option<&SessionHandle>, code: i32) -> String {
        let request = ErrorMessageRequest {
            vi: session.and_then(|s| Session::named(s.name())),
            error_code: code,
        };
        match self.runtime.block_on(self.service.error_message(request)) {
            Ok(reply) if !reply.error_message.is_empty() => reply.error_message,
            Ok(_) => format!("driver status {code}"),
            Err(e) => {
                debug!("ErrorMessage lookup for {code} failed: {e}");
                format!("driver status {code}")
            }
        }
    }
}

/// Negative driver status is an error, positive is a logged warning.
fn status_outcome(status: i32, message: String, call: &str) -> Result<(), DcPowerError> {
    if status >= 0 {
        if status > 0 {
            warn!("{call} completed with warning {status}: {message}");
        }
        return Ok(());
    }

    debug!("{call} failed with status {status}: {message}");
    Err(DcPowerError::Driver {
        code: status,
        message,
    })
}

/// Map a failed call to the error taxonomy.
///
/// The device server attaches the driver status to failed calls as
/// `ni-error` metadata; those become [`DcPowerError::Driver`].
pub(crate) fn map_status(status: tonic::Status) -> DcPowerError {
    let code = status
        .metadata()
        .get(NI_ERROR_METADATA)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i32>().ok());

    match code {
        Some(code) => DcPowerError::Driver {
            code,
            message: status.message().to_string(),
        },
        None if status.code() == tonic::Code::Unavailable => {
            DcPowerError::Connection(status.message().to_string())
        }
        None => DcPowerError::Rpc(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uri_adds_scheme() {
        assert_eq!(endpoint_uri("localhost", "31763").unwrap(), "http://localhost:31763");
        assert_eq!(
            endpoint_uri("http://10.0.0.2", " 31763 ").unwrap(),
            "http://10.0.0.2:31763"
        );
    }

    #[test]
    fn test_endpoint_uri_rejects_bad_port() {
        assert!(matches!(
            endpoint_uri("localhost", "grpc"),
            Err(DcPowerError::InvalidAddress(_))
        ));
        assert!(matches!(
            endpoint_uri("localhost", "70000"),
            Err(DcPowerError::InvalidAddress(_))
        ));
        assert!(matches!(
            endpoint_uri("  ", "31763"),
            Err(DcPowerError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_builder_requires_address() {
        let result = GrpcClient::builder().port("31763").build();
        assert!(matches!(result, Err(DcPowerError::Usage(_))));
    }

    #[test]
    fn test_map_status_reads_driver_code() {
        let mut status = tonic::Status::unknown("Maximum voltage exceeded");
        status
            .metadata_mut()
            .insert(NI_ERROR_METADATA, "-1074118504".parse().unwrap());

        match map_status(status) {
            DcPowerError::Driver { code, message } => {
                assert_eq!(code, -1074118504);
                assert_eq!(message, "Maximum voltage exceeded");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_negative_status_is_driver_error() {
        let result = status_outcome(-1074118504, "Maximum voltage exceeded".to_string(), "Commit");
        match result {
            Err(DcPowerError::Driver { code, message }) => {
                assert_eq!(code, -1074118504);
                assert_eq!(message, "Maximum voltage exceeded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_positive_status_is_warning_only() {
        assert!(status_outcome(1074135040, "Output clamped".to_string(), "Initiate").is_ok());
        assert!(status_outcome(0, String::new(), "Initiate").is_ok());
    }

    #[test]
    fn test_map_status_unavailable_is_connection() {
        let err = map_status(tonic::Status::unavailable("connection refused"));
        assert!(matches!(err, DcPowerError::Connection(_)));

        let err = map_status(tonic::Status::internal("boom"));
        assert!(matches!(err, DcPowerError::Rpc(_)));
    }
}
