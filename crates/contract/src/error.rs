//! Error types for the storage-proof contract

use custodia_codec::DecodeError;
use custodia_types::Address;
use thiserror::Error;

/// Failures specific to the proof state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProveError {
    #[error("all challenge rounds have already been proven")]
    ProveExhausted,

    #[error("height {height} is outside the proof window [{start}, {end}]")]
    ProveOutOfWindow { height: u64, start: u64, end: u64 },

    #[error("proof rejected for block {index}")]
    ProofInvalid { index: u64 },

    #[error("file pdp parameters are unusable: {0}")]
    BadPdpParams(String),

    #[error("file deposit {available} cannot cover round profit {needed}")]
    InsufficientDeposit { needed: u64, available: u64 },

    #[error("node has {available} KB free, file needs {needed} KB")]
    InsufficientCapacity { needed: u64, available: u64 },

    #[error("every copy of the file already has a storing node")]
    CopiesExhausted,

    #[error("node has already settled this file")]
    AlreadySettled,

    #[error("file is no longer valid")]
    FileInvalid,
}

/// Failures specific to read-slice settlement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettleError {
    #[error("slice signature rejected: {0}")]
    BadSignature(String),

    #[error("read escrow {available} cannot cover fee {needed}")]
    InsufficientEscrow { needed: u64, available: u64 },

    #[error("slice {slice_id} outside ({have}, {max}]")]
    SliceOutOfRange { slice_id: u64, have: u64, max: u64 },

    #[error("slice quotes pledge height {got}, pledge was made at {expected}")]
    PledgeMismatch { expected: u64, got: u64 },

    #[error("node {0} is not part of the read plan")]
    PayeeNotInPlan(Address),
}

/// Record-level invariants and economic rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("value transfer failed: {0}")]
    TransferFailed(String),

    #[error("volume {requested} KB is below the {reserved} KB in use")]
    CapacityInUse { requested: u64, reserved: u64 },

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error("storage by space is not supported")]
    UnsupportedStorageType,

    #[error("invalid file parameters: {0}")]
    InvalidFileParams(&'static str),

    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    #[error("settings are already initialized")]
    AlreadyInitialized,

    #[error("invalid read plan: {0}")]
    InvalidReadPlan(String),
}

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unauthorized: missing witness of {0}")]
    Unauthorized(Address),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Prove error: {0}")]
    Prove(#[from] ProveError),

    #[error("Settle error: {0}")]
    Settle(#[from] SettleError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ContractError>;
