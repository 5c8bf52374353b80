use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand_core::OsRng;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use primitives::Address;

use crate::error::SignerError;

/// A raw ECDSA signature: `(v, r, s)` in the legacy 27/28 parity form.
/// Callers transform `v` into the wire encoding appropriate to their
/// transaction type via [`crate::v_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSignature {
    pub v: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

/// A secp256k1 key pair capable of signing Keccak-256 digests.
///
/// The private key material is zeroized when the pair is dropped.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn from_bytes(mut bytes: [u8; 32]) -> Result<Self, SignerError> {
        let signing_key = SigningKey::from_bytes((&bytes).into())
            .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))?;
        bytes.zeroize();
        Ok(KeyPair { signing_key })
    }

    pub fn random() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        KeyPair { signing_key }
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        *self.signing_key.verifying_key()
    }

    /// Derives the Ethereum address for this key pair.
    pub fn address(&self) -> Address {
        public_key_to_address(&self.verifying_key())
    }

    /// Signs an arbitrary message: hashes it with Keccak-256, then signs
    /// the digest. `v` is returned in the legacy 27/28 form.
    pub fn sign(&self, message: &[u8]) -> Result<RawSignature, SignerError> {
        let hash = Keccak256::digest(message);
        self.sign_prehashed(hash.as_slice())
    }

    /// Signs a pre-hashed 32-byte digest directly, without re-hashing.
    /// Used for EIP-1559 payloads, which already embed the type byte in
    /// the hashed pre-image.
    pub fn sign_prehashed(&self, hash: &[u8]) -> Result<RawSignature, SignerError> {
        let (signature, recovery_id): (Signature, RecoveryId) = self
            .signing_key
            .sign_prehash(hash)
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&signature.r().to_bytes());
        s.copy_from_slice(&signature.s().to_bytes());

        let v = 27 + recovery_id.is_y_odd() as u8;
        Ok(RawSignature { v, r, s })
    }
}

/// Derives the Ethereum address from a secp256k1 public key: Keccak-256
/// of the 64-byte uncompressed point (sans the `0x04` prefix), last 20
/// bytes.
pub fn public_key_to_address(verifying_key: &VerifyingKey) -> Address {
    let encoded = verifying_key.to_encoded_point(false);
    let uncompressed = encoded.as_bytes();
    debug_assert_eq!(uncompressed[0], 0x04);
    let hash = Keccak256::digest(&uncompressed[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_with_last_byte(b: u8) -> KeyPair {
        let mut bytes = [0u8; 32];
        bytes[31] = b;
        KeyPair::from_bytes(bytes).unwrap()
    }

    #[test]
    fn known_private_key_one_derives_known_address() {
        let kp = key_with_last_byte(1);
        assert_eq!(
            kp.address().to_checksum(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn sign_produces_legacy_parity_v() {
        let kp = key_with_last_byte(1);
        let sig = kp.sign(b"hello").unwrap();
        assert!(sig.v == 27 || sig.v == 28);
    }

    #[test]
    fn random_keys_are_distinct() {
        let a = KeyPair::random();
        let b = KeyPair::random();
        assert_ne!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn to_bytes_roundtrips_through_from_bytes() {
        let kp = key_with_last_byte(42);
        let bytes = kp.to_bytes();
        let kp2 = KeyPair::from_bytes(bytes).unwrap();
        assert_eq!(kp.address(), kp2.address());
    }
}
