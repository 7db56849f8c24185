//! State changes produced outside this crate and passed through as-is.
//!
//! Only the set of contracts with storage writes is ever consulted.

use crate::parser::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDiff {
    #[serde(default)]
    pub storage_changes: Vec<StorageChange>,

    #[serde(default)]
    pub balance_changes: Vec<BalanceChange>,

    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    pub address: Address,
    pub slot: String,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    pub address: Address,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: String,
    /// Token contract; absent for native transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
}

impl StateDiff {
    /// Contracts that recorded at least one storage write
    pub fn storage_changed_contracts(&self) -> BTreeSet<Address> {
        self.storage_changes
            .iter()
            .map(|change| change.address.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.storage_changes.is_empty() && self.balance_changes.is_empty() && self.transfers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_changed_contracts_dedup() {
        let diff: StateDiff = serde_json::from_value(serde_json::json!({
            "storageChanges": [
                { "address": "0xAAAA", "slot": "0x0" },
                { "address": "0xaaaa", "slot": "0x1" },
                { "address": "0xbbbb", "slot": "0x0" }
            ]
        }))
        .unwrap();

        let contracts = diff.storage_changed_contracts();
        assert_eq!(contracts.len(), 2);
        assert!(contracts.contains(&Address::new("0xaaaa")));
        assert!(!diff.is_empty());
    }

    #[test]
    fn test_empty_state_diff() {
        let diff: StateDiff = serde_json::from_str("{}").unwrap();
        assert!(diff.is_empty());
        assert!(diff.storage_changed_contracts().is_empty());
    }
}
