//! Read escrow and incremental slice payments.

use crate::{read_list, serde_hex, write_list, Address};
use custodia_codec::{Decode, Encode, ZeroCopySink, ZeroCopySource};
use serde::{Deserialize, Serialize};

/// Blocks a downloader may fetch from one node, and how many were paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadPlan {
    pub node_addr: Address,
    pub max_read_block_num: u64,
    pub have_read_block_num: u64,
}

impl Encode for ReadPlan {
    fn encode(&self, sink: &mut ZeroCopySink) {
        self.node_addr.encode(sink);
        sink.write_var_uint(self.max_read_block_num);
        sink.write_var_uint(self.have_read_block_num);
    }
}

impl Decode for ReadPlan {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            node_addr: Address::decode(source)?,
            max_read_block_num: source.next_var_uint()?,
            have_read_block_num: source.next_var_uint()?,
        })
    }
}

/// Escrow a downloader locks for reading one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadPledge {
    #[serde(with = "serde_hex")]
    pub file_hash: Vec<u8>,
    pub downloader: Address,
    /// Height the pledge was made at; slices must quote it.
    pub block_height: u64,
    pub total_money: u64,
    pub rest_money: u64,
    /// Gas per block fixed when the pledge was made.
    pub block_price: u64,
    pub read_plans: Vec<ReadPlan>,
}

impl ReadPledge {
    pub fn plan_mut(&mut self, node: &Address) -> Option<&mut ReadPlan> {
        self.read_plans.iter_mut().find(|p| &p.node_addr == node)
    }
}

impl Encode for ReadPledge {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_bytes(&self.file_hash);
        self.downloader.encode(sink);
        sink.write_var_uint(self.block_height);
        sink.write_var_uint(self.total_money);
        sink.write_var_uint(self.rest_money);
        sink.write_var_uint(self.block_price);
        write_list(sink, &self.read_plans);
    }
}

impl Decode for ReadPledge {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            file_hash: source.next_var_vec()?,
            downloader: Address::decode(source)?,
            block_height: source.next_var_uint()?,
            total_money: source.next_var_uint()?,
            rest_money: source.next_var_uint()?,
            block_price: source.next_var_uint()?,
            read_plans: read_list(source)?,
        })
    }
}

/// Lookup key for a read pledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadPledgeQuery {
    pub downloader: Address,
    #[serde(with = "serde_hex")]
    pub file_hash: Vec<u8>,
}

impl Encode for ReadPledgeQuery {
    fn encode(&self, sink: &mut ZeroCopySink) {
        self.downloader.encode(sink);
        sink.write_var_bytes(&self.file_hash);
    }
}

impl Decode for ReadPledgeQuery {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            downloader: Address::decode(source)?,
            file_hash: source.next_var_vec()?,
        })
    }
}

/// Downloader-signed voucher authorising payment up to `slice_id` blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadSettleSlice {
    #[serde(with = "serde_hex")]
    pub file_hash: Vec<u8>,
    pub pay_from: Address,
    pub pay_to: Address,
    /// Payer's running total; informational only.
    pub slice_pay: u64,
    pub slice_id: u64,
    pub pledge_height: u64,
    #[serde(with = "serde_hex")]
    pub signature: Vec<u8>,
    #[serde(with = "serde_hex")]
    pub pubkey: Vec<u8>,
}

impl ReadSettleSlice {
    /// Canonical bytes covered by the payer's signature.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut sink = ZeroCopySink::new();
        sink.write_var_bytes(&self.file_hash);
        self.pay_from.encode(&mut sink);
        self.pay_to.encode(&mut sink);
        sink.write_var_uint(self.slice_id);
        sink.write_var_uint(self.pledge_height);
        sink.into_bytes()
    }
}

impl Encode for ReadSettleSlice {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_bytes(&self.file_hash);
        self.pay_from.encode(sink);
        self.pay_to.encode(sink);
        sink.write_var_uint(self.slice_pay);
        sink.write_var_uint(self.slice_id);
        sink.write_var_uint(self.pledge_height);
        sink.write_var_bytes(&self.signature);
        sink.write_var_bytes(&self.pubkey);
    }
}

impl Decode for ReadSettleSlice {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            file_hash: source.next_var_vec()?,
            pay_from: Address::decode(source)?,
            pay_to: Address::decode(source)?,
            slice_pay: source.next_var_uint()?,
            slice_id: source.next_var_uint()?,
            pledge_height: source.next_var_uint()?,
            signature: source.next_var_vec()?,
            pubkey: source.next_var_vec()?,
        })
    }
}
