//! Kiosk store: paginated kiosk cache and kiosk creation.

pub mod store;
pub mod transactions;

pub use store::{KioskResponse, KioskState, KioskStore};
pub use transactions::{
    ItemDefinition, KIOSK_MODULE, KIOSK_TYPE, TRANSFER_MODULE, create_kiosk_transaction,
};
