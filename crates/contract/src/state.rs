//! Typed access to contract records through a [`Host`].

use crate::error::{ContractError, Result, StateError};
use crate::host::{Host, TransferError, GAS_TOKEN};
use custodia_codec::{decode_exact, encode_to_vec, Decode, Encode};
use custodia_storage::keys;
use custodia_types::{
    Address, ContractEvent, FileInfo, NodeInfo, NodeSet, ProveDetails, ReadPledge, Settings,
};

/// Record store and value mover for one call.
pub struct ContractState<'h, H: Host> {
    host: &'h mut H,
    contract: Address,
}

impl<'h, H: Host> ContractState<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        let contract = host.contract_address();
        Self { host, contract }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn height(&self) -> u64 {
        self.host.current_height()
    }

    pub fn time(&self) -> u64 {
        self.host.current_time()
    }

    pub fn header_hash(&self, height: u64) -> Option<[u8; 32]> {
        self.host.header_hash(height)
    }

    pub fn require_witness(&self, addr: &Address) -> Result<()> {
        if self.host.check_witness(addr) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized(*addr))
        }
    }

    pub fn emit(&mut self, event: ContractEvent) {
        self.host.emit_notification(event);
    }

    /// Move gas tokens and record the transfer. Zero amounts are skipped.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.host
            .value_transfer(&GAS_TOKEN, from, to, amount)
            .map_err(|err| match err {
                TransferError::InsufficientBalance { .. } => {
                    ContractError::InsufficientFunds(err.to_string())
                }
                other => ContractError::State(StateError::TransferFailed(other.to_string())),
            })?;
        self.emit(ContractEvent::Transfer {
            token: GAS_TOKEN,
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn load<T: Decode>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.host.kv_get(key)? {
            Some(bytes) => Ok(Some(decode_exact(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save<T: Encode>(&mut self, key: &[u8], value: &T) -> Result<()> {
        self.host.kv_put(key, &encode_to_vec(value))?;
        Ok(())
    }

    fn remove(&mut self, key: &[u8]) -> Result<()> {
        self.host.kv_delete(key)?;
        Ok(())
    }

    pub fn stored_settings(&self) -> Result<Option<Settings>> {
        self.load(&keys::settings_key(&self.contract))
    }

    /// Stored settings, or the defaults when never initialised.
    pub fn settings(&self) -> Result<Settings> {
        Ok(self.stored_settings()?.unwrap_or_default())
    }

    pub fn put_settings(&mut self, settings: &Settings) -> Result<()> {
        let key = keys::settings_key(&self.contract);
        self.save(&key, settings)
    }

    pub fn admin(&self) -> Result<Option<Address>> {
        self.load(&keys::admin_key(&self.contract))
    }

    pub fn put_admin(&mut self, admin: &Address) -> Result<()> {
        let key = keys::admin_key(&self.contract);
        self.save(&key, admin)
    }

    pub fn node(&self, wallet: &Address) -> Result<Option<NodeInfo>> {
        self.load(&keys::node_info_key(&self.contract, wallet))
    }

    pub fn require_node(&self, wallet: &Address) -> Result<NodeInfo> {
        self.node(wallet)?.ok_or(ContractError::NotFound("node"))
    }

    pub fn put_node(&mut self, node: &NodeInfo) -> Result<()> {
        let key = keys::node_info_key(&self.contract, &node.wallet_addr);
        self.save(&key, node)
    }

    pub fn delete_node(&mut self, wallet: &Address) -> Result<()> {
        let key = keys::node_info_key(&self.contract, wallet);
        self.remove(&key)
    }

    pub fn node_set(&self) -> Result<NodeSet> {
        Ok(self
            .load(&keys::node_set_key(&self.contract))?
            .unwrap_or_default())
    }

    pub fn put_node_set(&mut self, set: &NodeSet) -> Result<()> {
        let key = keys::node_set_key(&self.contract);
        self.save(&key, set)
    }

    pub fn file(&self, file_hash: &[u8]) -> Result<Option<FileInfo>> {
        self.load(&keys::file_info_key(&self.contract, file_hash))
    }

    pub fn require_file(&self, file_hash: &[u8]) -> Result<FileInfo> {
        self.file(file_hash)?.ok_or(ContractError::NotFound("file"))
    }

    pub fn put_file(&mut self, file: &FileInfo) -> Result<()> {
        let key = keys::file_info_key(&self.contract, &file.file_hash);
        self.save(&key, file)
    }

    pub fn delete_file(&mut self, file_hash: &[u8]) -> Result<()> {
        let key = keys::file_info_key(&self.contract, file_hash);
        self.remove(&key)
    }

    pub fn prove_details(&self, file_hash: &[u8]) -> Result<Option<ProveDetails>> {
        self.load(&keys::file_prove_key(&self.contract, file_hash))
    }

    pub fn put_prove_details(&mut self, file_hash: &[u8], details: &ProveDetails) -> Result<()> {
        let key = keys::file_prove_key(&self.contract, file_hash);
        self.save(&key, details)
    }

    pub fn delete_prove_details(&mut self, file_hash: &[u8]) -> Result<()> {
        let key = keys::file_prove_key(&self.contract, file_hash);
        self.remove(&key)
    }

    pub fn read_pledge(
        &self,
        downloader: &Address,
        file_hash: &[u8],
    ) -> Result<Option<ReadPledge>> {
        self.load(&keys::read_pledge_key(&self.contract, downloader, file_hash))
    }

    pub fn put_read_pledge(&mut self, pledge: &ReadPledge) -> Result<()> {
        let key = keys::read_pledge_key(&self.contract, &pledge.downloader, &pledge.file_hash);
        self.save(&key, pledge)
    }
}
