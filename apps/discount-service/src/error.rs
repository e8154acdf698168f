//! Error types for the discount service.
//!
//! Nothing here is produced by `ApplyDiscount`: business outcomes travel in
//! the response body. These cover startup, transport, and health lookups.

use std::net::SocketAddr;

use tonic::Status;

use crate::config::ConfigError;

/// Discount service errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Failed to build reflection service: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),

    #[error("Unknown service: {0}")]
    UnknownService(String),
}

impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::UnknownService(name) => {
                Status::not_found(format!("Unknown service: {}", name))
            }
            other => Status::internal(other.to_string()),
        }
    }
}
