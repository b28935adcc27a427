//! Storage node registration records.

use crate::{read_list, serde_hex, write_list, Address};
use custodia_codec::{Decode, Encode, ZeroCopySink, ZeroCopySource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Collateral currently held by the contract.
    pub pledge: u64,
    /// Earned and not yet withdrawn.
    pub profit: u64,
    /// Declared capacity in KB.
    pub volume: u64,
    /// Capacity not reserved by active file proofs.
    pub rest_volume: u64,
    pub service_time: u64,
    pub wallet_addr: Address,
    /// Network endpoint of the node.
    #[serde(with = "serde_hex")]
    pub node_addr: Vec<u8>,
}

impl NodeInfo {
    /// Capacity currently reserved by proofs in progress.
    pub fn reserved_volume(&self) -> u64 {
        self.volume.saturating_sub(self.rest_volume)
    }
}

impl Encode for NodeInfo {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_uint(self.pledge);
        sink.write_var_uint(self.profit);
        sink.write_var_uint(self.volume);
        sink.write_var_uint(self.rest_volume);
        sink.write_var_uint(self.service_time);
        self.wallet_addr.encode(sink);
        sink.write_var_bytes(&self.node_addr);
    }
}

impl Decode for NodeInfo {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            pledge: source.next_var_uint()?,
            profit: source.next_var_uint()?,
            volume: source.next_var_uint()?,
            rest_volume: source.next_var_uint()?,
            service_time: source.next_var_uint()?,
            wallet_addr: Address::decode(source)?,
            node_addr: source.next_var_vec()?,
        })
    }
}

/// Result of enumerating every registered node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfoList {
    pub nodes: Vec<NodeInfo>,
}

impl Encode for NodeInfoList {
    fn encode(&self, sink: &mut ZeroCopySink) {
        write_list(sink, &self.nodes);
    }
}

impl Decode for NodeInfoList {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            nodes: read_list(source)?,
        })
    }
}

/// Wallet addresses of every registered node, kept in address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet(pub BTreeSet<Address>);

impl NodeSet {
    pub fn insert(&mut self, wallet: Address) -> bool {
        self.0.insert(wallet)
    }

    pub fn remove(&mut self, wallet: &Address) -> bool {
        self.0.remove(wallet)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Encode for NodeSet {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_uint(self.0.len() as u64);
        for wallet in &self.0 {
            wallet.encode(sink);
        }
    }
}

impl Decode for NodeSet {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        let count = source.next_var_uint()?;
        let mut set = BTreeSet::new();
        for _ in 0..count {
            if !set.insert(Address::decode(source)?) {
                return Err(custodia_codec::DecodeError::Malformed(
                    "duplicate node in node set",
                ));
            }
        }
        Ok(NodeSet(set))
    }
}
