//! Type conversion utilities for Sui blockchain.
//!
//! This module provides conversions between domain types and Sui-specific types.
//!
//! ## Conversion Categories
//!
//! 1. **Identifiers**: ObjectId ↔ Sui ObjectID, owner strings ↔ SuiAddress
//! 2. **Move fields**: JSON rendering of Move structs → kiosk domain types
//! 3. **Dynamic fields**: kiosk dynamic field names → item / listing / lock / extension

use std::str::FromStr;

use client_blockchain_core::{KioskData, KioskOwnerCap, ObjectId, normalize_type};
use serde_json::Value;
use sui_types::base_types::{ObjectID, SuiAddress};

use crate::core::error::{Result, SuiError};

// ============================================================================
// Identifier Conversions
// ============================================================================

/// Convert domain ObjectId to Sui ObjectID.
pub fn to_sui_object_id(id: &ObjectId) -> Result<ObjectID> {
    ObjectID::from_str(id.as_str())
        .map_err(|e| SuiError::InvalidObject(format!("invalid object id {}: {}", id, e)))
}

/// Convert Sui ObjectID to domain ObjectId.
pub fn from_sui_object_id(id: ObjectID) -> ObjectId {
    ObjectId::new(id.to_string())
}

/// Parse an owner address string.
pub fn to_sui_address(address: &str) -> Result<SuiAddress> {
    SuiAddress::from_str(address)
        .map_err(|e| SuiError::InvalidObject(format!("invalid address {}: {}", address, e)))
}

// ============================================================================
// Move Field Parsing
// ============================================================================

/// Parse a `UID`/`ID` field, rendered either as `{"id": "0x.."}` or `"0x.."`.
pub fn parse_id_field(fields: &Value, field_name: &str) -> Result<ObjectId> {
    let value = fields.get(field_name).ok_or_else(|| missing(field_name))?;

    value
        .as_str()
        .or_else(|| value.get("id")?.as_str())
        .map(ObjectId::new)
        .ok_or_else(|| missing(field_name))
}

/// Parse string field from Move object JSON.
pub fn parse_string_field(fields: &Value, field_name: &str) -> Result<String> {
    fields
        .get(field_name)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| missing(field_name))
}

/// Parse u64 field from Move object JSON.
pub fn parse_u64_field(fields: &Value, field_name: &str) -> Result<u64> {
    fields
        .get(field_name)
        .and_then(|v| {
            // Sui JSON can represent u64 as either number or string
            v.as_u64().or_else(|| v.as_str()?.parse().ok())
        })
        .ok_or_else(|| missing(field_name))
}

/// Parse bool field from Move object JSON.
pub fn parse_bool_field(fields: &Value, field_name: &str) -> Result<bool> {
    fields
        .get(field_name)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| missing(field_name))
}

/// Parse a `Balance<T>` field into its decimal string.
///
/// The RPC renders balances as a string, but older nodes emit the struct form
/// `{"value": ".."}`.
pub fn parse_balance_field(fields: &Value, field_name: &str) -> Result<String> {
    let value = fields.get(field_name).ok_or_else(|| missing(field_name))?;
    let inner = value.get("value").unwrap_or(value);

    match inner {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(missing(field_name)),
    }
}

/// Build kiosk fields from the JSON rendering of a `0x2::kiosk::Kiosk`.
pub fn kiosk_data_from_fields(fields: &Value) -> Result<KioskData> {
    let item_count = parse_u64_field(fields, "item_count")?;

    Ok(KioskData {
        id: parse_id_field(fields, "id")?,
        allow_extensions: parse_bool_field(fields, "allow_extensions")?,
        item_count: u32::try_from(item_count)
            .map_err(|_| SuiError::InvalidObject(format!("item_count {} overflows", item_count)))?,
        owner: parse_string_field(fields, "owner")?,
        profits: parse_balance_field(fields, "profits")?,
    })
}

/// Build an owner cap from the JSON rendering of a `0x2::kiosk::KioskOwnerCap`.
pub fn owner_cap_from_fields(object_id: ObjectId, fields: &Value) -> Result<KioskOwnerCap> {
    Ok(KioskOwnerCap {
        object_id,
        kiosk_id: parse_id_field(fields, "for")?,
        is_personal: false,
    })
}

fn missing(field_name: &str) -> SuiError {
    SuiError::InvalidObject(format!("Missing or invalid '{}' field", field_name))
}

// ============================================================================
// Kiosk Dynamic Fields
// ============================================================================

/// What a kiosk dynamic field stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskFieldKind {
    /// `0x2::kiosk::Item` - an item placed in the kiosk
    Item,
    /// `0x2::kiosk::Listing` - a listing for an item
    Listing { is_exclusive: bool },
    /// `0x2::kiosk::Lock` - an item lock marker
    Lock,
    /// `0x2::kiosk_extension::ExtensionKey<Ext>` - an installed extension
    Extension(String),
    Other,
}

/// Classify a dynamic field by its name type and value.
pub fn classify_kiosk_field(name_type: &str, name_value: &Value) -> KioskFieldKind {
    let normalized = normalize_type(name_type);
    let kiosk = normalize_type("0x2::kiosk::Item");
    let Some(prefix) = kiosk.strip_suffix("Item") else {
        return KioskFieldKind::Other;
    };
    let extension_key = normalize_type("0x2::kiosk_extension::ExtensionKey");

    if normalized == format!("{prefix}Item") {
        KioskFieldKind::Item
    } else if normalized == format!("{prefix}Listing") {
        let is_exclusive = name_value
            .get("is_exclusive")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        KioskFieldKind::Listing { is_exclusive }
    } else if normalized == format!("{prefix}Lock") {
        KioskFieldKind::Lock
    } else if let Some(rest) = normalized.strip_prefix(&extension_key) {
        let ext = rest
            .strip_prefix('<')
            .and_then(|r| r.strip_suffix('>'))
            .unwrap_or(rest);
        KioskFieldKind::Extension(ext.to_string())
    } else {
        KioskFieldKind::Other
    }
}

/// Item id carried in the value of an Item / Listing / Lock field name.
pub fn field_item_id(name_value: &Value) -> Option<ObjectId> {
    name_value.get("id")?.as_str().map(ObjectId::new)
}
