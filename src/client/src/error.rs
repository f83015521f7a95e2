use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForwarderError {
    /// The destination can never be reached as configured.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// Mapping or sending a single sample failed.
    #[error("delivery failure: {0}")]
    DeliveryFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode server response: {0}")]
    Decode(#[from] prost::DecodeError),
}

impl ForwarderError {
    pub fn invalid_configuration(detail: impl Into<String>) -> Self {
        ForwarderError::InvalidConfiguration(detail.into())
    }

    pub fn delivery(detail: impl Into<String>) -> Self {
        ForwarderError::DeliveryFailure(detail.into())
    }
}

pub type Result<T> = std::result::Result<T, ForwarderError>;
