//! Blockchain collaborator traits.
//!
//! The stores only ever talk to the chain through these request/response
//! contracts:
//! - ChainRpc: normalized modules and balance reads
//! - KioskReader: owned-kiosk pages and kiosk snapshots
//! - ChainClientFactory: builds both, bound to one chain endpoint

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::ChainDescriptor;
use crate::types::{GetKioskOptions, Kiosk, NormalizedModules, ObjectId, OwnedKiosks, OwnedKiosksRequest};

// ============================================================================
// Error Types
// ============================================================================

/// Transport layer errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Backend-specific error: {0}")]
    BackendError(String),
}

// ============================================================================
// Collaborators
// ============================================================================

/// Read-only JSON-RPC surface used by the stores.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Endpoint this client is bound to.
    fn rpc_url(&self) -> &str;

    /// Normalized module metadata of every module in `package`.
    async fn get_normalized_move_modules_by_package(
        &self,
        package: &str,
    ) -> Result<NormalizedModules, TransportError>;

    /// Total balance of `coin_type` owned by `owner`, in the coin's base unit.
    async fn get_coin_balance(&self, owner: &str, coin_type: &str) -> Result<u128, TransportError>;
}

/// Kiosk queries.
#[async_trait]
pub trait KioskReader: Send + Sync {
    /// One page of kiosks owned by an address.
    async fn get_owned_kiosks(
        &self,
        request: OwnedKiosksRequest,
    ) -> Result<OwnedKiosks, TransportError>;

    /// Resolve a kiosk; `Ok(None)` when no such kiosk exists.
    async fn get_kiosk(
        &self,
        id: &ObjectId,
        options: GetKioskOptions,
    ) -> Result<Option<Kiosk>, TransportError>;
}

/// RPC and kiosk clients bound to the same chain endpoint.
#[derive(Clone)]
pub struct ChainClients {
    pub rpc: Arc<dyn ChainRpc>,
    pub kiosk: Arc<dyn KioskReader>,
}

impl fmt::Debug for ChainClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainClients")
            .field("rpc_url", &self.rpc.rpc_url())
            .finish_non_exhaustive()
    }
}

/// Builds clients for a chain; called again whenever the wallet switches chain.
#[async_trait]
pub trait ChainClientFactory: Send + Sync {
    async fn connect(&self, chain: &ChainDescriptor) -> Result<ChainClients, TransportError>;
}
