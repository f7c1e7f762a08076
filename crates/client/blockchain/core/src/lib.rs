//! Blockchain abstraction layer for the kiosk dApp client.
//!
//! This crate provides the chain-facing contracts that the wallet stores are
//! written against, without binding them to a particular SDK.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: ChainClientFactory (builds clients bound to one chain endpoint)
//!          ├── ChainRpc      (object / module / balance reads)
//!          └── KioskReader   (owned kiosk pages, kiosk snapshots)
//!
//! Layer 0: Data model (chains, objects, kiosks, transaction blocks)
//! ```
//!
//! # Design Philosophy
//!
//! - **Layer 0 (Data)**: Plain serde types, no I/O
//! - **Layer 1 (Collaborators)**: Async traits consumed only through request/response
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{ChainClientFactory, OwnedKiosksRequest, default_chains};
//!
//! async fn list(factory: &dyn ChainClientFactory, owner: String) {
//!     let chain = &default_chains()[1];
//!     let clients = factory.connect(chain).await?;
//!     let page = clients.kiosk.get_owned_kiosks(OwnedKiosksRequest::new(owner)).await?;
//! }
//! ```

pub mod chain;
pub mod traits;
pub mod transaction;
pub mod types;

pub use chain::{ChainDescriptor, SuiNetwork, UNKNOWN_CHAIN_ID, default_chains};

pub use traits::{ChainClientFactory, ChainClients, ChainRpc, KioskReader, TransportError};

pub use transaction::{
    Command, ExecuteOptions, ObjectChange, ObjectChangeKind, TransactionArgument,
    TransactionBlock, TransactionResponse,
};

pub use types::{
    GetKioskOptions, Kiosk, KioskData, KioskItem, KioskOwnerCap, NormalizedModules, ObjectId,
    OwnedKiosks, OwnedKiosksRequest, SUI_TYPE_ARG, normalize_type,
};
