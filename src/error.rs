use thiserror::Error;

#[derive(Error, Debug)]
pub enum DcPowerError {
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },
    #[error("Usage error: {0}")]
    Usage(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Configuration rejected: {0}")]
    Configuration(String),
    #[error("Driver error {code}: {message}")]
    Driver { code: i32, message: String },
    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),
    #[error("Type error: {0}")]
    Type(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Interrupted by user")]
    Interrupted,
}

impl DcPowerError {
    /// Re-tag a failure raised while applying configuration.
    ///
    /// Driver and RPC failures become [`DcPowerError::Configuration`] so the
    /// caller can tell a rejected setting apart from a mid-acquisition fault.
    /// Transport-level errors keep their original variant.
    pub fn rejected(self, step: &str) -> Self {
        match self {
            DcPowerError::Driver { code, message } => {
                DcPowerError::Configuration(format!("{step}: {message} (code {code})"))
            }
            DcPowerError::Rpc(status) => {
                DcPowerError::Configuration(format!("{step}: {}", status.message()))
            }
            DcPowerError::Type(msg) => DcPowerError::Configuration(format!("{step}: {msg}")),
            other => other,
        }
    }
}

impl From<std::io::Error> for DcPowerError {
    fn from(source: std::io::Error) -> Self {
        DcPowerError::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}
