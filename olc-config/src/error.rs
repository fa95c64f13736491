//! Error types for the config client and session.

use crate::transport::TransportError;
use olc_model::ModelError;
use thiserror::Error;

/// Errors raised while reading or committing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The client was built without a transport.
    #[error("no connection to the directory server")]
    NotConnected,

    /// The server rejected a request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An entry could not be modelled.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An LDIF document could not be read.
    #[error("invalid LDIF: {0}")]
    Ldif(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A database description is not valid JSON.
    #[error("invalid database description: {0}")]
    Description(#[from] serde_json::Error),
}

/// Result type for client and session operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
