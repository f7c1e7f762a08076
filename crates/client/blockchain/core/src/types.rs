//! Common types for kiosk and object reads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Coin type of the native SUI token.
pub const SUI_TYPE_ARG: &str = "0x2::sui::SUI";

/// Normalized module metadata keyed by module name.
///
/// Values are kept as JSON so the stores stay independent of the SDK's
/// normalized-module representation.
pub type NormalizedModules = BTreeMap<String, serde_json::Value>;

// ============================================================================
// Identifiers
// ============================================================================

/// On-chain object identifier (hex string, `0x`-prefixed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Expand the leading address of a Move type to its full 32-byte form.
///
/// RPC responses report `0x2::kiosk::Kiosk` as
/// `0x0000…0002::kiosk::Kiosk`; comparing normalized forms makes both match.
pub fn normalize_type(type_tag: &str) -> String {
    let Some((address, rest)) = type_tag.split_once("::") else {
        return type_tag.to_string();
    };
    let Some(hex) = address.strip_prefix("0x") else {
        return type_tag.to_string();
    };
    if hex.is_empty() || hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return type_tag.to_string();
    }

    format!("0x{:0>64}::{}", hex.to_ascii_lowercase(), rest)
}

// ============================================================================
// Kiosk
// ============================================================================

/// Fields of the on-chain `0x2::kiosk::Kiosk` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskData {
    pub id: ObjectId,
    pub allow_extensions: bool,
    pub item_count: u32,
    pub owner: String,

    /// Accumulated profits in MIST, kept as the decimal string the RPC returns
    pub profits: String,
}

/// An item placed in a kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskItem {
    pub object_id: ObjectId,
    pub object_type: String,
    pub is_locked: bool,

    /// Listing price in MIST when the item is listed
    pub listing_price: Option<String>,
}

/// Snapshot of a kiosk and its derived content.
///
/// Replaced wholesale on every refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kiosk {
    pub kiosk: KioskData,
    pub items: Vec<KioskItem>,
    pub item_ids: Vec<ObjectId>,
    pub listing_ids: Vec<ObjectId>,
    pub extensions: Vec<String>,
}

impl Kiosk {
    /// Kiosk with fields only and no derived content.
    pub fn from_data(kiosk: KioskData) -> Self {
        Self {
            kiosk,
            items: Vec::new(),
            item_ids: Vec::new(),
            listing_ids: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.kiosk.id
    }
}

/// Owner capability pointing at a kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskOwnerCap {
    pub object_id: ObjectId,
    pub kiosk_id: ObjectId,
    pub is_personal: bool,
}

/// One page request of kiosks owned by an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedKiosksRequest {
    pub address: String,

    /// Opaque cursor from the previous page; `None` on the first call
    pub cursor: Option<String>,
}

impl OwnedKiosksRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// One page of kiosks owned by an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedKiosks {
    pub kiosk_ids: Vec<ObjectId>,
    pub kiosk_owner_caps: Vec<KioskOwnerCap>,
    pub has_next_page: bool,
    pub next_cursor: Option<String>,
}

/// Which parts of a kiosk to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetKioskOptions {
    /// Resolve the kiosk object's own fields in addition to its content
    pub with_kiosk_fields: bool,
}

impl Default for GetKioskOptions {
    fn default() -> Self {
        Self {
            with_kiosk_fields: true,
        }
    }
}
