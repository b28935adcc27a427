//! Adapter between the contract and the opaque PDP primitive.

use crate::challenge::{challenge_seed, generate_challenge, ChallengeEntry, SEED_BYTES};
use custodia_codec::decode_exact;
use custodia_types::{Address, PdpParams};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("bad pdp parameters: {0}")]
    BadParams(String),
    #[error("proof rejected for block {index}")]
    ProofInvalid { index: u64 },
}

/// Per-block verification of an aggregate proof.
///
/// Implementations must be deterministic: every replica evaluating the same
/// inputs has to reach the same answer.
pub trait ProofScheme: Send + Sync {
    fn verify_block(
        &self,
        verification_key: &[u8],
        proof: &[u8],
        seed: &[u8; SEED_BYTES],
        challenge: &ChallengeEntry,
        commitment: &[u8],
    ) -> bool;
}

/// Verify `proof` for the blocks `node` is challenged on at `block_hash`.
pub fn verify(
    node: &Address,
    block_hash: &[u8; SEED_BYTES],
    block_count: u64,
    rounds: u64,
    pdp_params: &[u8],
    proof: &[u8],
    scheme: &dyn ProofScheme,
) -> Result<(), VerifyError> {
    let params: PdpParams =
        decode_exact(pdp_params).map_err(|err| VerifyError::BadParams(err.to_string()))?;
    if (params.block_commitments.len() as u64) < block_count {
        return Err(VerifyError::BadParams(format!(
            "{} commitments for {} blocks",
            params.block_commitments.len(),
            block_count
        )));
    }

    let seed = challenge_seed(node, block_hash);
    for entry in generate_challenge(&seed, block_count, rounds) {
        let commitment = params.commitment(entry.index).ok_or_else(|| {
            VerifyError::BadParams(format!("no commitment for block {}", entry.index))
        })?;
        if !scheme.verify_block(&params.verification_key, proof, &seed, &entry, commitment) {
            return Err(VerifyError::ProofInvalid { index: entry.index });
        }
    }
    Ok(())
}

/// Accepts every proof.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAllScheme;

impl ProofScheme for AcceptAllScheme {
    fn verify_block(
        &self,
        _: &[u8],
        _: &[u8],
        _: &[u8; SEED_BYTES],
        _: &ChallengeEntry,
        _: &[u8],
    ) -> bool {
        true
    }
}

/// Rejects every proof.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAllScheme;

impl ProofScheme for RejectAllScheme {
    fn verify_block(
        &self,
        _: &[u8],
        _: &[u8],
        _: &[u8; SEED_BYTES],
        _: &ChallengeEntry,
        _: &[u8],
    ) -> bool {
        false
    }
}

/// Rejects the proof of a single block index and accepts the rest.
#[derive(Debug, Clone, Copy)]
pub struct RejectIndexScheme(pub u64);

impl ProofScheme for RejectIndexScheme {
    fn verify_block(
        &self,
        _: &[u8],
        _: &[u8],
        _: &[u8; SEED_BYTES],
        challenge: &ChallengeEntry,
        _: &[u8],
    ) -> bool {
        challenge.index != self.0
    }
}
