//! Sui blockchain integration for the kiosk dApp client.
//!
//! This crate backs the `client-blockchain-core` collaborator traits with the
//! Sui JSON-RPC SDK:
//! - Normalized module and coin balance reads
//! - Owned kiosk pagination through `KioskOwnerCap` objects
//! - Kiosk snapshots built from the kiosk object and its dynamic fields
//!
//! # Architecture
//!
//! ```text
//! client-wallet stores → ChainClientFactory ──→ SuiClientFactory
//!                                                 ├─ SuiRpcClient
//!                                                 └─ SuiKioskReader
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_sui::{SuiClientFactory, SuiConfig};
//! use client_blockchain_core::ChainClientFactory;
//!
//! let config = SuiConfig::from_env()?;
//! let factory = SuiClientFactory::new(config);
//! let clients = factory.connect(&chain).await?;
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod kiosk;
pub mod utils;

pub use client::{SuiClientFactory, SuiRpcClient};
pub use config::SuiConfig;
pub use core::{Result, SuiError};
pub use kiosk::SuiKioskReader;
