//! Utility modules for Sui blockchain integration.
//!
//! ## Modules
//!
//! - [`conversion`]: identifier conversions and Move field parsing

pub mod conversion;
