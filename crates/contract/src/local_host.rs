//! In-process host used by tests, tooling and single-node deployments.
//!
//! Every call runs against a [`CallContext`]: storage writes go to a
//! [`CacheDb`] overlay, transfers to a scratch copy of the balances and
//! notifications to a buffer. All three are committed only when the call
//! succeeds.

use crate::error::{ContractError, Result};
use crate::host::{Host, TransferError};
use crate::StorageContract;
use custodia_storage::{CacheDb, KvStore, MemoryKvStore};
use custodia_types::{Address, ContractEvent};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Seconds between two blocks of the simulated chain.
pub const BLOCK_INTERVAL_SECS: u64 = 5;

/// Token balances keyed by `(token, holder)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceLedger {
    balances: BTreeMap<(Address, Address), u64>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, token: &Address, holder: &Address) -> u64 {
        self.balances.get(&(*token, *holder)).copied().unwrap_or(0)
    }

    pub fn mint(
        &mut self,
        token: &Address,
        holder: &Address,
        amount: u64,
    ) -> std::result::Result<(), TransferError> {
        let entry = self.balances.entry((*token, *holder)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    pub fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> std::result::Result<(), TransferError> {
        let available = self.balance(token, from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                holder: *from,
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(token, to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.balances.insert((*token, *from), available - amount);
        self.balances.insert((*token, *to), credited);
        Ok(())
    }

    /// Sum of every balance of `token`.
    pub fn total(&self, token: &Address) -> u128 {
        self.balances
            .iter()
            .filter(|((t, _), _)| t == token)
            .map(|(_, amount)| u128::from(*amount))
            .sum()
    }
}

fn header_for(height: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"custodia-local-header");
    hasher.update(&height.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Single-process chain simulation backed by any [`KvStore`].
pub struct LocalHost<S: KvStore = MemoryKvStore> {
    contract: Address,
    store: S,
    ledger: BalanceLedger,
    height: u64,
    time: u64,
    headers: BTreeMap<u64, [u8; 32]>,
    signers: BTreeSet<Address>,
    events: Vec<ContractEvent>,
}

impl LocalHost<MemoryKvStore> {
    pub fn in_memory(contract: Address) -> Self {
        Self::new(contract, MemoryKvStore::new())
    }
}

impl<S: KvStore> LocalHost<S> {
    pub fn new(contract: Address, store: S) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(0, header_for(0));
        Self {
            contract,
            store,
            ledger: BalanceLedger::new(),
            height: 0,
            time: 0,
            headers,
            signers: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shut the host down, handing back its backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Move the chain forward, producing a header for every new height.
    pub fn advance_to(&mut self, height: u64) {
        if height <= self.height {
            return;
        }
        for h in self.height + 1..=height {
            self.headers.entry(h).or_insert_with(|| header_for(h));
        }
        self.time = self
            .time
            .saturating_add((height - self.height).saturating_mul(BLOCK_INTERVAL_SECS));
        self.height = height;
    }

    pub fn header(&self, height: u64) -> Option<[u8; 32]> {
        self.headers.get(&height).copied()
    }

    /// Replace the set of addresses that signed the next calls.
    pub fn set_signers<I: IntoIterator<Item = Address>>(&mut self, signers: I) {
        self.signers = signers.into_iter().collect();
    }

    pub fn clear_signers(&mut self) {
        self.signers.clear();
    }

    pub fn sign_as(&mut self, signer: Address) {
        self.set_signers([signer]);
    }

    pub fn mint(&mut self, token: &Address, holder: &Address, amount: u64) -> Result<()> {
        self.ledger
            .mint(token, holder, amount)
            .map_err(|err| {
                ContractError::State(crate::error::StateError::TransferFailed(err.to_string()))
            })
    }

    pub fn balance(&self, token: &Address, holder: &Address) -> u64 {
        self.ledger.balance(token, holder)
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run `call` as one transaction.
    pub fn execute<T, F>(&mut self, call: F) -> Result<T>
    where
        F: FnOnce(&mut CallContext<'_, S>) -> Result<T>,
    {
        let mut ctx = CallContext {
            contract: self.contract,
            height: self.height,
            time: self.time,
            headers: &self.headers,
            signers: &self.signers,
            cache: CacheDb::new(&self.store),
            ledger: self.ledger.clone(),
            events: Vec::new(),
        };

        match call(&mut ctx) {
            Ok(value) => {
                let CallContext {
                    cache,
                    ledger,
                    events,
                    ..
                } = ctx;
                let writes = cache.dirty_len();
                cache.commit()?;
                debug!(writes, events = events.len(), "Committed call");
                self.ledger = ledger;
                self.events.extend(events);
                Ok(value)
            }
            Err(err) => {
                warn!(height = self.height, error = %err, "Call rolled back");
                Err(err)
            }
        }
    }

    /// Dispatch `method` through `contract` as one transaction.
    pub fn invoke(
        &mut self,
        contract: &StorageContract,
        method: &str,
        input: &[u8],
    ) -> Result<Vec<u8>> {
        self.execute(|ctx| contract.invoke(ctx, method, input))
    }
}

/// Host view handed to the contract for a single call.
pub struct CallContext<'a, S: KvStore> {
    contract: Address,
    height: u64,
    time: u64,
    headers: &'a BTreeMap<u64, [u8; 32]>,
    signers: &'a BTreeSet<Address>,
    cache: CacheDb<'a, S>,
    ledger: BalanceLedger,
    events: Vec<ContractEvent>,
}

impl<S: KvStore> Host for CallContext<'_, S> {
    fn contract_address(&self) -> Address {
        self.contract
    }

    fn current_height(&self) -> u64 {
        self.height
    }

    fn current_time(&self) -> u64 {
        self.time
    }

    fn header_hash(&self, height: u64) -> Option<[u8; 32]> {
        self.headers.get(&height).copied()
    }

    fn check_witness(&self, addr: &Address) -> bool {
        self.signers.contains(addr)
    }

    fn kv_get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        self.cache.get(key)
    }

    fn kv_put(&mut self, key: &[u8], value: &[u8]) -> anyhow::Result<()> {
        self.cache.put(key, value);
        Ok(())
    }

    fn kv_delete(&mut self, key: &[u8]) -> anyhow::Result<()> {
        self.cache.delete(key);
        Ok(())
    }

    fn value_transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> std::result::Result<(), TransferError> {
        if *from != self.contract && !self.signers.contains(from) {
            return Err(TransferError::NotAuthorized(*from));
        }
        self.ledger.transfer(token, from, to, amount)
    }

    fn emit_notification(&mut self, event: ContractEvent) {
        self.events.push(event);
    }
}
