//! Payer signatures on read-settlement slices.

use custodia_types::{Address, ReadSettleSlice};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("public key is not a valid ed25519 key")]
    InvalidPublicKey,
    #[error("signature has the wrong length")]
    MalformedSignature,
    #[error("public key belongs to {actual}, slice is paid by {expected}")]
    AddressMismatch { expected: Address, actual: Address },
    #[error("signature does not match the slice")]
    VerificationFailed,
}

/// Fill in `pubkey` and `signature` of a slice as its payer.
pub fn sign_slice(slice: &mut ReadSettleSlice, signing_key: &SigningKey) {
    let signature = signing_key.sign(&slice.signing_bytes());
    slice.pubkey = signing_key.verifying_key().to_bytes().to_vec();
    slice.signature = signature.to_bytes().to_vec();
}

/// Check that the slice was signed by the key controlling `pay_from`.
pub fn verify_slice(slice: &ReadSettleSlice) -> Result<(), SignatureError> {
    let key_bytes: [u8; 32] = slice
        .pubkey
        .as_slice()
        .try_into()
        .map_err(|_| SignatureError::InvalidPublicKey)?;
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return Err(SignatureError::InvalidPublicKey);
    };

    let signer = Address::from_public_key(&key_bytes);
    if signer != slice.pay_from {
        return Err(SignatureError::AddressMismatch {
            expected: slice.pay_from,
            actual: signer,
        });
    }

    let Ok(signature) = Signature::from_slice(&slice.signature) else {
        return Err(SignatureError::MalformedSignature);
    };
    verifying_key
        .verify(&slice.signing_bytes(), &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn slice_for(key: &SigningKey) -> ReadSettleSlice {
        ReadSettleSlice {
            file_hash: b"QmFile".to_vec(),
            pay_from: Address::from_public_key(&key.verifying_key().to_bytes()),
            pay_to: Address([2; 20]),
            slice_pay: 0,
            slice_id: 1,
            pledge_height: 10,
            signature: Vec::new(),
            pubkey: Vec::new(),
        }
    }

    #[test]
    fn signed_slice_verifies() {
        let key = SigningKey::generate(&mut OsRng);
        let mut slice = slice_for(&key);
        sign_slice(&mut slice, &key);
        assert_eq!(verify_slice(&slice), Ok(()));
    }

    #[test]
    fn tampered_slice_fails() {
        let key = SigningKey::from_bytes(&[7; 32]);
        let mut slice = slice_for(&key);
        sign_slice(&mut slice, &key);
        slice.slice_id = 2;
        assert_eq!(verify_slice(&slice), Err(SignatureError::VerificationFailed));
    }

    #[test]
    fn advisory_pay_is_not_signed() {
        let key = SigningKey::from_bytes(&[7; 32]);
        let mut slice = slice_for(&key);
        sign_slice(&mut slice, &key);
        slice.slice_pay = 12345;
        assert_eq!(verify_slice(&slice), Ok(()));
    }

    #[test]
    fn key_of_another_payer_is_rejected() {
        let payer = SigningKey::from_bytes(&[7; 32]);
        let other = SigningKey::from_bytes(&[8; 32]);
        let mut slice = slice_for(&payer);
        sign_slice(&mut slice, &other);
        assert!(matches!(
            verify_slice(&slice),
            Err(SignatureError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn malformed_material_is_rejected() {
        let key = SigningKey::from_bytes(&[7; 32]);
        let mut slice = slice_for(&key);
        sign_slice(&mut slice, &key);

        let mut short_key = slice.clone();
        short_key.pubkey.truncate(31);
        assert_eq!(verify_slice(&short_key), Err(SignatureError::InvalidPublicKey));

        let mut short_sig = slice.clone();
        short_sig.signature.truncate(10);
        assert_eq!(verify_slice(&short_sig), Err(SignatureError::MalformedSignature));
    }
}
