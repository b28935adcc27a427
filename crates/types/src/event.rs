//! Notifications emitted by the contract.

use crate::{serde_hex, Address, Settings};
use serde::{Deserialize, Serialize};

/// Event handed to the host after a successful state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractEvent {
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        amount: u64,
    },
    NodeRegistered {
        wallet: Address,
        volume: u64,
        pledge: u64,
    },
    NodeUpdated {
        wallet: Address,
        volume: u64,
        pledge: u64,
    },
    NodeCancelled {
        wallet: Address,
        refund: u64,
    },
    ProfitWithdrawn {
        wallet: Address,
        amount: u64,
    },
    FileStored {
        #[serde(with = "serde_hex")]
        file_hash: Vec<u8>,
        owner: Address,
        deposit: u64,
    },
    FileDeleted {
        #[serde(with = "serde_hex")]
        file_hash: Vec<u8>,
        owner: Address,
        refund: u64,
    },
    ProofAccepted {
        #[serde(with = "serde_hex")]
        file_hash: Vec<u8>,
        wallet: Address,
        prove_times: u64,
        profit: u64,
    },
    ProofSettled {
        #[serde(with = "serde_hex")]
        file_hash: Vec<u8>,
        wallet: Address,
        prove_times: u64,
    },
    ReadPledged {
        #[serde(with = "serde_hex")]
        file_hash: Vec<u8>,
        downloader: Address,
        total_money: u64,
    },
    ReadSettled {
        #[serde(with = "serde_hex")]
        file_hash: Vec<u8>,
        pay_from: Address,
        pay_to: Address,
        slice_id: u64,
        fee: u64,
    },
    SettingsUpdated {
        settings: Settings,
    },
}

impl ContractEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
