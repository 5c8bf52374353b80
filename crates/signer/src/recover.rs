use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

use primitives::Address;

use crate::error::SignerError;
use crate::key_pair::public_key_to_address;
use crate::v_value::normalize_v;

/// Recovers the signer address from a pre-hashed digest and a signature
/// whose `v` is already in legacy 27/28 form.
pub fn recover_from_prehash(
    hash: &[u8],
    r: &[u8; 32],
    s: &[u8; 32],
    v_legacy: u8,
) -> Result<Address, SignerError> {
    let signature = Signature::from_scalars(*r, *s)
        .map_err(|e| SignerError::RecoveryFailed(e.to_string()))?;
    let recovery_id = RecoveryId::from_byte(v_legacy - 27)
        .ok_or(SignerError::InvalidVValue)?;

    let verifying_key = VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
        .map_err(|e| SignerError::RecoveryFailed(e.to_string()))?;

    Ok(public_key_to_address(&verifying_key))
}

/// Recovers the signer address from an arbitrary message and a `v` in any
/// of the accepted wire encodings, normalizing it against `chain_id`
/// first.
pub fn recover(
    message: &[u8],
    r: &[u8; 32],
    s: &[u8; 32],
    v_raw: u64,
    chain_id: u64,
) -> Result<Address, SignerError> {
    let v_legacy = normalize_v(v_raw, chain_id)?;
    let hash = Keccak256::digest(message);
    recover_from_prehash(hash.as_slice(), r, s, v_legacy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_pair::KeyPair;

    fn key_with_last_byte(b: u8) -> KeyPair {
        let mut bytes = [0u8; 32];
        bytes[31] = b;
        KeyPair::from_bytes(bytes).unwrap()
    }

    #[test]
    fn recover_matches_signer_address() {
        let kp = key_with_last_byte(7);
        let message = b"gateway transaction payload";
        let sig = kp.sign(message).unwrap();

        let recovered = recover(message, &sig.r, &sig.s, sig.v as u64, 1).unwrap();
        assert_eq!(recovered, kp.address());
    }

    #[test]
    fn recover_through_eip155_encoding() {
        let kp = key_with_last_byte(7);
        let message = b"some prehash payload";
        let hash = Keccak256::digest(message);
        let sig = kp.sign_prehashed(hash.as_slice()).unwrap();

        let chain_id = 42;
        let eip155_v = crate::v_value::to_eip155(sig.v, chain_id);

        let recovered = recover(message, &sig.r, &sig.s, eip155_v, chain_id).unwrap();
        assert_eq!(recovered, kp.address());
    }

    #[test]
    fn invalid_v_value_is_rejected() {
        let kp = key_with_last_byte(7);
        let message = b"payload";
        let sig = kp.sign(message).unwrap();

        let result = recover(message, &sig.r, &sig.s, 12345, 1);
        assert!(result.is_err());
    }
}
