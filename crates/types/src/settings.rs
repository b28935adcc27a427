//! Contract-wide economic parameters.

use crate::Address;
use custodia_codec::{Decode, Encode, ZeroCopySink, ZeroCopySource};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GAS_PRICE: u64 = 2000;
pub const DEFAULT_STORAGE_RATE: u64 = 1;
pub const DEFAULT_READ_RATE: u64 = 1;
pub const DEFAULT_CHALLENGE_OVERHEAD: u64 = 1;
pub const DEFAULT_MAX_PROVE_BLOCK_NUM: u64 = 32;

/// Singleton pricing record.
///
/// `storage_rate` is gas per KB per block and `read_rate` is gas per KB read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gas_price: u64,
    pub storage_rate: u64,
    pub read_rate: u64,
    pub challenge_overhead: u64,
    pub max_prove_block_num: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gas_price: DEFAULT_GAS_PRICE,
            storage_rate: DEFAULT_STORAGE_RATE,
            read_rate: DEFAULT_READ_RATE,
            challenge_overhead: DEFAULT_CHALLENGE_OVERHEAD,
            max_prove_block_num: DEFAULT_MAX_PROVE_BLOCK_NUM,
        }
    }
}

impl Settings {
    /// Collateral owed for `volume` KB of declared capacity.
    pub fn pledge_for(&self, volume: u64) -> Option<u64> {
        self.gas_price
            .checked_mul(self.storage_rate)?
            .checked_mul(volume)
    }

    /// Escrow owed by an owner storing a file.
    pub fn deposit_for(
        &self,
        block_count: u64,
        block_size: u64,
        copy_number: u64,
        challenge_rate: u64,
        challenge_times: u64,
    ) -> Option<u64> {
        let storage = block_count
            .checked_mul(block_size)?
            .checked_mul(self.storage_rate)?;
        let challenges = challenge_rate
            .checked_mul(challenge_times)?
            .checked_mul(self.challenge_overhead)?;
        storage
            .checked_add(challenges)?
            .checked_mul(copy_number)?
            .checked_mul(self.gas_price)
    }

    /// Amount paid to a node for one accepted proof round.
    pub fn profit_per_round(&self, challenge_rate: u64) -> Option<u64> {
        self.storage_rate
            .checked_mul(challenge_rate)?
            .checked_add(self.challenge_overhead)?
            .checked_mul(self.gas_price)
    }

    /// Fee for reading `blocks` blocks of `block_size` KB.
    pub fn read_fee(&self, blocks: u64, block_size: u64) -> Option<u64> {
        blocks.checked_mul(block_size)?.checked_mul(self.read_rate)
    }
}

impl Encode for Settings {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_uint(self.gas_price);
        sink.write_var_uint(self.storage_rate);
        sink.write_var_uint(self.read_rate);
        sink.write_var_uint(self.challenge_overhead);
        sink.write_var_uint(self.max_prove_block_num);
    }
}

impl Decode for Settings {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            gas_price: source.next_var_uint()?,
            storage_rate: source.next_var_uint()?,
            read_rate: source.next_var_uint()?,
            challenge_overhead: source.next_var_uint()?,
            max_prove_block_num: source.next_var_uint()?,
        })
    }
}

/// Payload of `FsSettingInit`: the governing admin plus the genesis settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsInit {
    pub admin: Address,
    pub settings: Settings,
}

impl Encode for SettingsInit {
    fn encode(&self, sink: &mut ZeroCopySink) {
        self.admin.encode(sink);
        self.settings.encode(sink);
    }
}

impl Decode for SettingsInit {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            admin: Address::decode(source)?,
            settings: Settings::decode(source)?,
        })
    }
}
