//! Error types for Sui blockchain operations.

use client_blockchain_core::TransportError;
use thiserror::Error;

/// Errors that can occur during Sui blockchain operations.
#[derive(Debug, Error)]
pub enum SuiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid object data: {0}")]
    InvalidObject(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] sui_sdk::error::Error),
}

pub type Result<T> = std::result::Result<T, SuiError>;

impl From<SuiError> for TransportError {
    fn from(error: SuiError) -> Self {
        match error {
            SuiError::Network(msg) => TransportError::NetworkError(msg),
            SuiError::InvalidConfig(msg) => TransportError::ConfigError(msg),
            SuiError::InvalidObject(msg) => TransportError::InvalidResponse(msg),
            SuiError::Serialization(msg) => TransportError::SerializationError(msg),
            SuiError::Rpc(err) => TransportError::NetworkError(err.to_string()),
        }
    }
}
