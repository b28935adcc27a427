//! Proof submissions and the per-file parameters they are checked against.

use crate::{serde_hex, Address};
use custodia_codec::{Decode, DecodeError, Encode, ZeroCopySink, ZeroCopySource};
use serde::{Deserialize, Serialize};

/// A node's answer to the challenge of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdpData {
    pub version: u64,
    #[serde(with = "serde_hex")]
    pub file_hash: Vec<u8>,
    pub wallet_addr: Address,
    #[serde(with = "serde_hex")]
    pub proof: Vec<u8>,
    /// Height whose header hash seeds the challenge.
    pub challenge_height: u64,
}

impl Encode for PdpData {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_uint(self.version);
        sink.write_var_bytes(&self.file_hash);
        self.wallet_addr.encode(sink);
        sink.write_var_bytes(&self.proof);
        sink.write_var_uint(self.challenge_height);
    }
}

impl Decode for PdpData {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        Ok(Self {
            version: source.next_var_uint()?,
            file_hash: source.next_var_vec()?,
            wallet_addr: Address::decode(source)?,
            proof: source.next_var_vec()?,
            challenge_height: source.next_var_uint()?,
        })
    }
}

/// Verification material the owner publishes with the file.
///
/// `block_commitments[i - 1]` commits to block `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdpParams {
    pub version: u64,
    #[serde(with = "serde_hex")]
    pub verification_key: Vec<u8>,
    #[serde(with = "serde_hex")]
    pub file_id: Vec<u8>,
    pub block_commitments: Vec<Vec<u8>>,
}

impl PdpParams {
    pub fn commitment(&self, index: u64) -> Option<&[u8]> {
        let slot = usize::try_from(index.checked_sub(1)?).ok()?;
        self.block_commitments.get(slot).map(Vec::as_slice)
    }
}

impl Encode for PdpParams {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_uint(self.version);
        sink.write_var_bytes(&self.verification_key);
        sink.write_var_bytes(&self.file_id);
        sink.write_var_uint(self.block_commitments.len() as u64);
        for commitment in &self.block_commitments {
            sink.write_var_bytes(commitment);
        }
    }
}

impl Decode for PdpParams {
    fn decode(source: &mut ZeroCopySource<'_>) -> custodia_codec::Result<Self> {
        let version = source.next_var_uint()?;
        let verification_key = source.next_var_vec()?;
        let file_id = source.next_var_vec()?;
        let count = source.next_var_uint()?;
        if count > source.remaining() as u64 {
            return Err(DecodeError::Malformed("commitment count exceeds input"));
        }
        let mut block_commitments = Vec::with_capacity(count as usize);
        for _ in 0..count {
            block_commitments.push(source.next_var_vec()?);
        }
        Ok(Self {
            version,
            verification_key,
            file_id,
            block_commitments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custodia_codec::{decode_exact, encode_to_vec};

    #[test]
    fn commitments_are_one_based() {
        let params = PdpParams {
            block_commitments: vec![vec![1], vec![2]],
            ..PdpParams::default()
        };
        assert_eq!(params.commitment(0), None);
        assert_eq!(params.commitment(1), Some(&[1u8][..]));
        assert_eq!(params.commitment(2), Some(&[2u8][..]));
        assert_eq!(params.commitment(3), None);
    }

    #[test]
    fn inflated_commitment_count_is_malformed() {
        let params = PdpParams::default();
        let mut bytes = encode_to_vec(&params);
        let last = bytes.len() - 1;
        bytes[last] = 50;
        assert!(decode_exact::<PdpParams>(&bytes).is_err());
    }
}
