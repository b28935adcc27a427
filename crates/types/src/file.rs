//! File deals.

use crate::{serde_hex, Address};
use custodia_codec::{Decode, DecodeError, Encode, ZeroCopySink, ZeroCopySource};
use serde::{Deserialize, Serialize};

/// How a deal is priced. Only per-file deals are accepted by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    BySpace,
    ByFile,
}

impl StorageType {
    pub fn tag(self) -> u64 {
        match self {
            StorageType::BySpace => 0,
            StorageType::ByFile => 1,
        }
    }
}

impl TryFrom<u64> for StorageType {
    type Error = DecodeError;

    fn try_from(tag: u64) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(StorageType::BySpace),
            1 => Ok(StorageType::ByFile),
            _ => Err(DecodeError::Malformed("unknown storage type")),
        }
    }
}

/// An owner's storage deal for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(with = "serde_hex")]
    pub file_hash: Vec<u8>,
    pub owner: Address,
    #[serde(with = "serde_hex")]
    pub file_desc: Vec<u8>,
    pub block_count: u64,
    /// Block size in KB.
    pub block_size: u64,
    pub copy_number: u64,
    /// Blocks between two proof rounds.
    pub challenge_rate: u64,
    /// Number of rounds each copy must prove.
    pub challenge_times: u64,
    pub deposit: u64,
    pub rest_deposit: u64,
    #[serde(with = "serde_hex")]
    pub pdp_param: Vec<u8>,
    /// Blocks challenged per round; zero asks for the contract default.
    pub prove_block_num: u64,
    /// Height the deal was stored at.
    pub block_height: u64,
    pub time_start: u64,
    pub valid_flag: bool,
    pub storage_type: StorageType,
}

impl FileInfo {
    /// Last height at which a proof round may still be paid.
    pub fn expiry_height(&self) -> Option<u64> {
        self.challenge_rate
            .checked_mul(self.challenge_times)?
            .checked_add(self.block_height)
    }

    pub fn is_expired_at(&self, height: u64) -> bool {
        match self.expiry_height() {
            Some(expiry) => height > expiry,
            None => false,
        }
    }

    /// Capacity in KB a node reserves while proving this file.
    pub fn required_volume(&self) -> Option<u64> {
        self.block_count.checked_mul(self.block_size)
    }

    /// Height window `[start, end]` for round `k` (zero-based).
    pub fn prove_window(&self, k: u64) -> Option<(u64, u64)> {
        let start = k
            .checked_mul(self.challenge_rate)?
            .checked_add(self.block_height)?;
        let end = start.checked_add(self.challenge_rate)?;
        Some((start, end))
    }
}

impl Encode for FileInfo {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_bytes(&self.file_hash);
        self.owner.encode(sink);
        sink.write_var_bytes(&self.file_desc);
        sink.write_var_uint(self.block_count);
        sink.write_var_uint(self.block_size);
        sink.write_var_uint(self.copy_number);
        sink.write_var_uint(self.challenge_rate);
        sink.write_var_uint(self.challenge_times);
        sink.write_var_uint(self.deposit);
        sink.write_var_uint(self.rest_deposit);
        sink.write_var_bytes(&self.pdp_param);
        sink.write_var_uint(self.prove_block_num);
        sink.write_var_uint(self.block_height);
        sink.write_var_uint(self.time_start);
        sink.write_bool(self.valid_flag);
        sink.write_var_uint(self.storage_type.tag());
    }
}

impl Decode for FileInfo {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            file_hash: source.next_var_vec()?,
            owner: Address::decode(source)?,
            file_desc: source.next_var_vec()?,
            block_count: source.next_var_uint()?,
            block_size: source.next_var_uint()?,
            copy_number: source.next_var_uint()?,
            challenge_rate: source.next_var_uint()?,
            challenge_times: source.next_var_uint()?,
            deposit: source.next_var_uint()?,
            rest_deposit: source.next_var_uint()?,
            pdp_param: source.next_var_vec()?,
            prove_block_num: source.next_var_uint()?,
            block_height: source.next_var_uint()?,
            time_start: source.next_var_uint()?,
            valid_flag: source.next_bool()?,
            storage_type: StorageType::try_from(source.next_var_uint()?)?,
        })
    }
}
