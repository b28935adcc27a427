//! Custodia storage-proof contract.
//!
//! Storage nodes pledge collateral for their declared capacity, file owners
//! escrow a deposit that pays nodes round by round as proofs are accepted,
//! and downloaders pay serving nodes through signed read slices. Every
//! operation runs against an injected [`Host`]; [`LocalHost`] is the
//! in-process reference host with all-or-nothing call semantics.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod file;
pub mod host;
pub mod local_host;
pub mod node;
pub mod prove;
pub mod read;
pub mod settings;
pub mod state;

pub use config::ContractConfig;
pub use dispatch::{Method, StorageContract};
pub use error::{ContractError, ProveError, Result, SettleError, StateError};
pub use host::{Host, TransferError, GAS_TOKEN};
pub use local_host::{BalanceLedger, CallContext, LocalHost};
pub use state::ContractState;
