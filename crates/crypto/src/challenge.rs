//! Deterministic block sampling for proof rounds.

use custodia_types::Address;
use sha2::{Digest, Sha256};

pub const SEED_BYTES: usize = 32;

/// Files this small are audited block by block.
const FULL_AUDIT_BLOCKS: u64 = 3;

/// One challenged block and its nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeEntry {
    /// 1-based block index.
    pub index: u64,
    pub rand: u64,
}

/// Per-node, per-round seed: `sha256(wallet || block_hash)`.
pub fn challenge_seed(wallet: &Address, block_hash: &[u8; SEED_BYTES]) -> [u8; SEED_BYTES] {
    let mut hasher = Sha256::new();
    hasher.update(wallet.as_bytes());
    hasher.update(block_hash);
    hasher.finalize().into()
}

/// Sample the blocks to audit.
///
/// The file is split into `rounds` parts of `count / rounds` blocks (the
/// remainder goes to the last part) and one block is picked from each part.
/// Offsets are read as little-endian u32 from a window rolling over
/// `seed || seed[..4]`.
pub fn generate_challenge(
    seed: &[u8; SEED_BYTES],
    file_block_count: u64,
    requested_rounds: u64,
) -> Vec<ChallengeEntry> {
    if file_block_count == 0 {
        return Vec::new();
    }

    let rounds = if file_block_count <= FULL_AUDIT_BLOCKS {
        file_block_count
    } else {
        requested_rounds
            .max(1)
            .min(file_block_count.div_ceil(FULL_AUDIT_BLOCKS))
    };
    let per_part = file_block_count / rounds;
    let last_part = per_part + file_block_count % rounds;

    let mut window = [0u8; SEED_BYTES + 4];
    window[..SEED_BYTES].copy_from_slice(seed);
    window[SEED_BYTES..].copy_from_slice(&seed[..4]);

    let mut entries = Vec::with_capacity(rounds as usize);
    let mut pos = 0usize;
    for i in 1..=rounds {
        let part_len = if i == rounds { last_part } else { per_part };
        let offset = u32::from_le_bytes([
            window[pos],
            window[pos + 1],
            window[pos + 2],
            window[pos + 3],
        ]);
        entries.push(ChallengeEntry {
            index: u64::from(offset) % part_len + (i - 1) * per_part + 1,
            rand: u64::from(seed[pos]) + 1,
        });
        pos = (pos + 1) % SEED_BYTES;
    }
    entries
}
