//! Per-file proof progress of every storing node.

use crate::{read_list, serde_hex, write_list, Address};
use custodia_codec::{Decode, DecodeError, Encode, ZeroCopySink, ZeroCopySource};
use serde::{Deserialize, Serialize};

/// Progress of one node on one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProveDetail {
    #[serde(with = "serde_hex")]
    pub node_addr: Vec<u8>,
    pub wallet_addr: Address,
    /// Accepted rounds so far.
    pub prove_times: u64,
    /// Set once the node has finished (or the file expired) and capacity was released.
    pub settle_flag: bool,
}

impl Encode for ProveDetail {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_bytes(&self.node_addr);
        self.wallet_addr.encode(sink);
        sink.write_var_uint(self.prove_times);
        sink.write_bool(self.settle_flag);
    }
}

impl Decode for ProveDetail {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            node_addr: source.next_var_vec()?,
            wallet_addr: Address::decode(source)?,
            prove_times: source.next_var_uint()?,
            settle_flag: source.next_bool()?,
        })
    }
}

/// All proof records for a file, at most `copy_num` of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProveDetails {
    pub copy_num: u64,
    pub details: Vec<ProveDetail>,
}

impl ProveDetails {
    pub fn new(copy_num: u64) -> Self {
        Self {
            copy_num,
            details: Vec::new(),
        }
    }

    pub fn prove_detail_num(&self) -> u64 {
        self.details.len() as u64
    }

    pub fn is_full(&self) -> bool {
        self.prove_detail_num() >= self.copy_num
    }

    pub fn find(&self, wallet: &Address) -> Option<&ProveDetail> {
        self.details.iter().find(|d| &d.wallet_addr == wallet)
    }

    pub fn find_mut(&mut self, wallet: &Address) -> Option<&mut ProveDetail> {
        self.details.iter_mut().find(|d| &d.wallet_addr == wallet)
    }
}

impl Encode for ProveDetails {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_uint(self.copy_num);
        // prove_detail_num and the list count are the same number on the wire.
        write_list(sink, &self.details);
    }
}

impl Decode for ProveDetails {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        let copy_num = source.next_var_uint()?;
        let details: Vec<ProveDetail> = read_list(source)?;
        if details.len() as u64 > copy_num {
            return Err(DecodeError::Malformed("more prove records than copies"));
        }
        Ok(Self { copy_num, details })
    }
}
