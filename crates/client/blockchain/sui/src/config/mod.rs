//! Sui client configuration.

pub mod network;

// Re-export commonly used items
pub use network::SuiConfig;
