//! Cryptographic pieces of the Custodia storage-proof contract.
//!
//! * [`challenge`] samples which file blocks a node must prove in a round.
//! * [`verifier`] checks a submitted proof against the owner's parameters
//!   through a pluggable [`ProofScheme`].
//! * [`signature`] signs and verifies read-settlement slices.

pub mod challenge;
pub mod signature;
pub mod verifier;

pub use challenge::{challenge_seed, generate_challenge, ChallengeEntry, SEED_BYTES};
pub use signature::{sign_slice, verify_slice, SignatureError};
pub use verifier::{
    verify, AcceptAllScheme, ProofScheme, RejectAllScheme, RejectIndexScheme, VerifyError,
};
