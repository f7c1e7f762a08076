//! Transaction blocks submitted by the kiosk store.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use client_blockchain_core::{TransactionArgument, TransactionBlock};

pub const KIOSK_MODULE: &str = "0x2::kiosk";
pub const TRANSFER_MODULE: &str = "0x2::transfer";
pub const KIOSK_TYPE: &str = "0x2::kiosk::Kiosk";

/// Arguments of the item module's `define` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub extension: String,
    /// Hex-encoded SHA-256 of the raw file
    pub hash: String,
    pub name: String,
    pub file_type: String,
}

impl ItemDefinition {
    /// Definition of a file, hashing its contents.
    pub fn from_file(
        name: impl Into<String>,
        extension: impl Into<String>,
        file_type: impl Into<String>,
        contents: &[u8],
    ) -> Self {
        Self {
            extension: extension.into(),
            hash: hex::encode(Sha256::digest(contents)),
            name: name.into(),
            file_type: file_type.into(),
        }
    }
}

fn pure(value: &str) -> TransactionArgument {
    TransactionArgument::Pure(serde_json::Value::String(value.to_string()))
}

/// Create a kiosk, optionally define an item in it, hand the owner cap to
/// `owner` and share the kiosk.
///
/// `item` pairs the item module (`0x…::module`) with the definition.
pub fn create_kiosk_transaction(
    owner: &str,
    item: Option<(&str, &ItemDefinition)>,
) -> TransactionBlock {
    let mut tx = TransactionBlock::new();

    let created = tx.move_call(format!("{}::new", KIOSK_MODULE), vec![], vec![]);
    let kiosk = created.nested(0);
    let owner_cap = created.nested(1);

    if let Some((module, item)) = item {
        tx.move_call(
            format!("{}::define", module),
            vec![],
            vec![
                kiosk.clone(),
                owner_cap.clone(),
                pure(&item.extension),
                pure(&item.hash),
                pure(&item.name),
                pure(&item.file_type),
            ],
        );
    }

    tx.transfer_objects(vec![owner_cap], TransactionArgument::address(owner));

    tx.move_call(
        format!("{}::public_share_object", TRANSFER_MODULE),
        vec![KIOSK_TYPE.to_string()],
        vec![kiosk],
    );

    tx
}

#[cfg(test)]
mod tests {
    use client_blockchain_core::Command;

    use super::*;

    fn target(command: &Command) -> &str {
        match command {
            Command::MoveCall { target, .. } => target,
            Command::TransferObjects { .. } => "transfer",
        }
    }

    #[test]
    fn test_create_kiosk_commands() {
        let tx = create_kiosk_transaction("0xa11ce", None);
        let targets: Vec<_> = tx.commands().iter().map(target).collect();
        assert_eq!(
            targets,
            vec!["0x2::kiosk::new", "transfer", "0x2::transfer::public_share_object"]
        );

        assert_eq!(
            tx.commands()[1],
            Command::TransferObjects {
                objects: vec![TransactionArgument::NestedResult(0, 1)],
                address: TransactionArgument::address("0xa11ce"),
            }
        );
        assert_eq!(
            tx.commands()[2],
            Command::MoveCall {
                target: "0x2::transfer::public_share_object".to_string(),
                type_arguments: vec![KIOSK_TYPE.to_string()],
                arguments: vec![TransactionArgument::NestedResult(0, 0)],
            }
        );
    }

    #[test]
    fn test_item_definition_runs_against_new_kiosk() {
        let item = ItemDefinition::from_file("notes", "txt", "text/plain", b"hello");
        let tx = create_kiosk_transaction("0xa11ce", Some(("0xbeef::item", &item)));

        let Command::MoveCall { target, arguments, .. } = &tx.commands()[1] else {
            panic!("expected the define call");
        };
        assert_eq!(target, "0xbeef::item::define");
        assert_eq!(arguments[0], TransactionArgument::NestedResult(0, 0));
        assert_eq!(arguments[1], TransactionArgument::NestedResult(0, 1));
        assert_eq!(arguments[3], pure(&item.hash));
        assert_eq!(tx.commands().len(), 4);
    }

    #[test]
    fn test_item_hash_is_sha256_hex() {
        let item = ItemDefinition::from_file("notes", "txt", "text/plain", b"hello");
        assert_eq!(
            item.hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
