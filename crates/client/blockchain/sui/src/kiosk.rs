//! Kiosk reads over the Sui JSON-RPC API.
//!
//! ## Move Object Reference
//!
//! ```move
//! module sui::kiosk {
//!     public struct Kiosk has key, store {
//!         id: UID,
//!         profits: Balance<SUI>,
//!         owner: address,
//!         item_count: u32,
//!         allow_extensions: bool,
//!     }
//!
//!     public struct KioskOwnerCap has key, store {
//!         id: UID,
//!         `for`: ID,
//!     }
//!
//!     // Dynamic field keys
//!     public struct Item has store, copy, drop { id: ID }
//!     public struct Listing has store, copy, drop { id: ID, is_exclusive: bool }
//!     public struct Lock has store, copy, drop { id: ID }
//! }
//! ```
//!
//! Owned kiosks are discovered through the `KioskOwnerCap` objects an address
//! holds; a kiosk's content is read from its dynamic fields.

use std::collections::HashMap;

use async_trait::async_trait;
use sui_json_rpc_types::{
    SuiObjectDataFilter, SuiObjectDataOptions, SuiObjectResponse, SuiObjectResponseQuery,
    SuiParsedData,
};
use sui_sdk::SuiClient;
use sui_types::base_types::ObjectID;
use sui_types::dynamic_field::DynamicFieldInfo;
use sui_types::parse_sui_struct_tag;

use client_blockchain_core::{
    GetKioskOptions, Kiosk, KioskData, KioskItem, KioskReader, ObjectId, OwnedKiosks,
    OwnedKiosksRequest, TransportError,
};

use crate::core::error::{Result, SuiError};
use crate::utils::conversion::{
    KioskFieldKind, classify_kiosk_field, field_item_id, from_sui_object_id,
    kiosk_data_from_fields, owner_cap_from_fields, parse_balance_field, to_sui_address,
    to_sui_object_id,
};

/// Struct type of the capability proving kiosk ownership.
pub const KIOSK_OWNER_CAP_TYPE: &str = "0x2::kiosk::KioskOwnerCap";

/// Kiosk reader backed by a [`SuiClient`].
#[derive(Clone)]
pub struct SuiKioskReader {
    client: SuiClient,
    page_size: usize,
}

impl SuiKioskReader {
    pub fn new(client: SuiClient, page_size: usize) -> Self {
        Self { client, page_size }
    }

    async fn owned_kiosks(&self, request: OwnedKiosksRequest) -> Result<OwnedKiosks> {
        let owner = to_sui_address(&request.address)?;
        let cursor = request
            .cursor
            .as_deref()
            .map(|c| to_sui_object_id(&c.into()))
            .transpose()?;

        let cap_type = parse_sui_struct_tag(KIOSK_OWNER_CAP_TYPE)
            .map_err(|e| SuiError::InvalidConfig(format!("bad struct tag: {}", e)))?;
        let query = SuiObjectResponseQuery::new(
            Some(SuiObjectDataFilter::StructType(cap_type)),
            Some(SuiObjectDataOptions::new().with_content()),
        );

        let page = self
            .client
            .read_api()
            .get_owned_objects(owner, Some(query), cursor, None)
            .await?;

        let mut kiosk_owner_caps = Vec::with_capacity(page.data.len());
        for response in page.data {
            let Some((object_id, fields)) = move_object_fields(response) else {
                continue;
            };
            match owner_cap_from_fields(from_sui_object_id(object_id), &fields) {
                Ok(cap) => kiosk_owner_caps.push(cap),
                Err(e) => tracing::warn!("Skipping malformed owner cap {}: {}", object_id, e),
            }
        }

        tracing::debug!(
            owner = %request.address,
            count = kiosk_owner_caps.len(),
            has_next_page = page.has_next_page,
            "Fetched owned kiosk page"
        );

        Ok(OwnedKiosks {
            kiosk_ids: kiosk_owner_caps.iter().map(|c| c.kiosk_id.clone()).collect(),
            kiosk_owner_caps,
            has_next_page: page.has_next_page,
            next_cursor: page.next_cursor.map(|c| c.to_string()),
        })
    }

    async fn kiosk(&self, id: &ObjectId, options: GetKioskOptions) -> Result<Option<Kiosk>> {
        let kiosk_id = to_sui_object_id(id)?;

        let data = if options.with_kiosk_fields {
            let response = self
                .client
                .read_api()
                .get_object_with_options(kiosk_id, SuiObjectDataOptions::new().with_content())
                .await?;

            let Some((_, fields)) = move_object_fields(response) else {
                return Ok(None);
            };
            kiosk_data_from_fields(&fields)?
        } else {
            KioskData {
                id: id.clone(),
                allow_extensions: false,
                item_count: 0,
                owner: String::new(),
                profits: "0".to_string(),
            }
        };

        let fields = self.dynamic_fields(kiosk_id).await?;
        let mut kiosk = Kiosk::from_data(data);

        let mut locked = Vec::new();
        let mut listings = HashMap::new();
        for field in &fields {
            let name_type = field.name.type_.to_string();
            let kind = classify_kiosk_field(&name_type, &field.name.value);

            if let KioskFieldKind::Extension(ext) = kind {
                kiosk.extensions.push(ext);
                continue;
            }
            let Some(item_id) = field_item_id(&field.name.value) else {
                continue;
            };

            match kind {
                KioskFieldKind::Item => {
                    kiosk.item_ids.push(item_id.clone());
                    kiosk.items.push(KioskItem {
                        object_id: item_id,
                        object_type: field.object_type.clone(),
                        is_locked: false,
                        listing_price: None,
                    });
                }
                KioskFieldKind::Listing { .. } => {
                    let price = self.listing_price(kiosk_id, field).await;
                    kiosk.listing_ids.push(item_id.clone());
                    listings.insert(item_id, price);
                }
                KioskFieldKind::Lock => locked.push(item_id),
                KioskFieldKind::Extension(_) | KioskFieldKind::Other => {}
            }
        }

        for item in &mut kiosk.items {
            item.is_locked = locked.contains(&item.object_id);
            item.listing_price = listings.get(&item.object_id).cloned().flatten();
        }

        Ok(Some(kiosk))
    }

    /// Walk every page of a kiosk's dynamic fields.
    async fn dynamic_fields(&self, kiosk_id: ObjectID) -> Result<Vec<DynamicFieldInfo>> {
        let mut fields = Vec::new();
        let mut cursor = None;

        loop {
            let page = self
                .client
                .read_api()
                .get_dynamic_fields(kiosk_id, cursor, Some(self.page_size))
                .await?;

            fields.extend(page.data);

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        Ok(fields)
    }

    /// Price stored under a listing key; `None` when it cannot be read.
    async fn listing_price(&self, kiosk_id: ObjectID, field: &DynamicFieldInfo) -> Option<String> {
        let response = self
            .client
            .read_api()
            .get_dynamic_field_object(kiosk_id, field.name.clone())
            .await;

        match response {
            Ok(response) => {
                let (_, fields) = move_object_fields(response)?;
                parse_balance_field(&fields, "value").ok()
            }
            Err(e) => {
                tracing::warn!("Failed to read listing {}: {}", field.object_id, e);
                None
            }
        }
    }
}

/// Object id and JSON fields of a Move object response.
fn move_object_fields(response: SuiObjectResponse) -> Option<(ObjectID, serde_json::Value)> {
    let data = response.data?;
    match data.content? {
        SuiParsedData::MoveObject(move_obj) => Some((data.object_id, move_obj.fields.to_json_value())),
        SuiParsedData::Package(_) => None,
    }
}

#[async_trait]
impl KioskReader for SuiKioskReader {
    async fn get_owned_kiosks(
        &self,
        request: OwnedKiosksRequest,
    ) -> std::result::Result<OwnedKiosks, TransportError> {
        Ok(self.owned_kiosks(request).await?)
    }

    async fn get_kiosk(
        &self,
        id: &ObjectId,
        options: GetKioskOptions,
    ) -> std::result::Result<Option<Kiosk>, TransportError> {
        Ok(self.kiosk(id, options).await?)
    }
}
