//! Programmable transaction block description.
//!
//! Transactions are built here as a plain command list and handed to a wallet
//! extension, which serializes, signs and executes them. Nothing in this
//! module talks to the network.

use serde::{Deserialize, Serialize};

use crate::types::{ObjectId, normalize_type};

/// Argument of a transaction command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum TransactionArgument {
    /// Pure BCS-able value (address, number, string, bytes)
    Pure(serde_json::Value),

    /// Existing on-chain object
    Object(ObjectId),

    /// Whole result of command `n`
    Result(u16),

    /// Element `i` of the tuple result of command `n`
    NestedResult(u16, u16),
}

impl TransactionArgument {
    /// Address-typed pure argument.
    pub fn address(address: impl Into<String>) -> Self {
        Self::Pure(serde_json::Value::String(address.into()))
    }

    /// Element `index` of this command result.
    ///
    /// Only meaningful on [`TransactionArgument::Result`]; any other argument
    /// is returned unchanged.
    pub fn nested(&self, index: u16) -> Self {
        match self {
            Self::Result(command) => Self::NestedResult(*command, index),
            other => other.clone(),
        }
    }
}

/// A single step of the transaction block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    MoveCall {
        /// `package::module::function`
        target: String,
        type_arguments: Vec<String>,
        arguments: Vec<TransactionArgument>,
    },
    TransferObjects {
        objects: Vec<TransactionArgument>,
        address: TransactionArgument,
    },
}

/// Ordered list of commands forming one programmable transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionBlock {
    commands: Vec<Command>,
}

impl TransactionBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a Move call; returns a handle to its result.
    pub fn move_call(
        &mut self,
        target: impl Into<String>,
        type_arguments: Vec<String>,
        arguments: Vec<TransactionArgument>,
    ) -> TransactionArgument {
        self.push(Command::MoveCall {
            target: target.into(),
            type_arguments,
            arguments,
        })
    }

    /// Append a transfer of `objects` to `address`.
    pub fn transfer_objects(
        &mut self,
        objects: Vec<TransactionArgument>,
        address: TransactionArgument,
    ) -> TransactionArgument {
        self.push(Command::TransferObjects { objects, address })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, command: Command) -> TransactionArgument {
        let index = self.commands.len() as u16;
        self.commands.push(command);
        TransactionArgument::Result(index)
    }
}

/// Response fields to request from the wallet when executing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOptions {
    pub show_effects: bool,
    pub show_object_changes: bool,
}

/// How an object was touched by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectChangeKind {
    Created,
    Mutated,
    Transferred,
    Deleted,
    Wrapped,
    Published,
}

/// One entry of a transaction's object-change list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectChange {
    pub kind: ObjectChangeKind,
    pub object_id: ObjectId,
    pub object_type: Option<String>,
}

impl ObjectChange {
    /// Whether this change concerns an object of `type_tag`.
    pub fn is_of_type(&self, type_tag: &str) -> bool {
        self.object_type
            .as_deref()
            .is_some_and(|t| normalize_type(t) == normalize_type(type_tag))
    }
}

/// Executed transaction as reported back by the wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub digest: String,
    pub object_changes: Vec<ObjectChange>,
    pub effects: Option<serde_json::Value>,
}

impl TransactionResponse {
    /// First object of `type_tag` created by the transaction.
    pub fn find_created(&self, type_tag: &str) -> Option<&ObjectChange> {
        self.object_changes
            .iter()
            .find(|c| c.kind == ObjectChangeKind::Created && c.is_of_type(type_tag))
    }
}
