//! The execution environment the contract runs inside.

use custodia_types::{Address, ContractEvent};
use thiserror::Error;

/// Native token every pledge, deposit and payment is denominated in.
pub const GAS_TOKEN: Address = Address(*b"custodia-gas-token\0\0");

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("{holder} holds {available}, needs {needed}")]
    InsufficientBalance {
        holder: Address,
        needed: u64,
        available: u64,
    },
    #[error("transfer from {0} is not authorized")]
    NotAuthorized(Address),
    #[error("balance overflow")]
    Overflow,
}

/// Services a host chain provides to the contract during one call.
///
/// Writes made through a host are part of the current call and must be
/// discarded by the host if the call returns an error.
pub trait Host {
    fn contract_address(&self) -> Address;
    fn current_height(&self) -> u64;
    fn current_time(&self) -> u64;
    fn header_hash(&self, height: u64) -> Option<[u8; 32]>;
    fn check_witness(&self, addr: &Address) -> bool;

    fn kv_get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>>;
    fn kv_put(&mut self, key: &[u8], value: &[u8]) -> anyhow::Result<()>;
    fn kv_delete(&mut self, key: &[u8]) -> anyhow::Result<()>;

    fn value_transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TransferError>;

    fn emit_notification(&mut self, event: ContractEvent);
}
