use rlp_codec::{encode, Element};
use sha3::{Digest, Keccak256};
use signer::{v_value, KeyPair};

use crate::codec::{eip155_preimage_elements, eip1559_payload_elements, legacy6_elements, minimal_uint_element};
use crate::error::TransactionError;
use crate::model::{SignedTransaction, Transaction, TxKind};

const EIP1559_TYPE: u8 = 0x02;

/// Signs a transaction, selecting EIP-1559 or legacy EIP-155 per
/// [`Transaction::classify`]. Legacy-original and EIP-2930 are never
/// selected here.
pub fn sign(tx: &Transaction, key_pair: &KeyPair, chain_id: u64) -> Result<SignedTransaction, TransactionError> {
    match tx.classify() {
        TxKind::Eip1559 => sign_eip1559(tx, key_pair, chain_id),
        _ => sign_legacy_eip155(tx, key_pair, chain_id),
    }
}

pub fn sign_eip1559(tx: &Transaction, key_pair: &KeyPair, chain_id: u64) -> Result<SignedTransaction, TransactionError> {
    let payload_elements = eip1559_payload_elements(tx, chain_id);
    let payload_rlp = encode(&Element::list(payload_elements.clone()));

    let mut preimage = Vec::with_capacity(1 + payload_rlp.len());
    preimage.push(EIP1559_TYPE);
    preimage.extend_from_slice(&payload_rlp);

    let hash = Keccak256::digest(&preimage);
    let sig = key_pair.sign_prehashed(hash.as_slice())?;
    let y_parity = v_value::to_y_parity(sig.v);

    let mut signed_elements = payload_elements;
    signed_elements.push(rlp_codec::encode_uint(u128::from(y_parity)));
    signed_elements.push(minimal_uint_element(&sig.r));
    signed_elements.push(minimal_uint_element(&sig.s));

    let signed_rlp = encode(&Element::list(signed_elements));

    let mut raw = Vec::with_capacity(1 + signed_rlp.len());
    raw.push(EIP1559_TYPE);
    raw.extend_from_slice(&signed_rlp);

    let tx_hash = Keccak256::digest(&raw);
    Ok(SignedTransaction {
        raw,
        tx_hash: tx_hash.into(),
    })
}

pub fn sign_legacy_eip155(tx: &Transaction, key_pair: &KeyPair, chain_id: u64) -> Result<SignedTransaction, TransactionError> {
    let preimage_elements = eip155_preimage_elements(tx, chain_id);
    let preimage = encode(&Element::list(preimage_elements));

    let hash = Keccak256::digest(&preimage);
    let sig = key_pair.sign_prehashed(hash.as_slice())?;
    let v_eip155 = v_value::to_eip155(sig.v, chain_id);

    let mut signed_elements = legacy6_elements(tx);
    signed_elements.push(rlp_codec::encode_uint(u128::from(v_eip155)));
    signed_elements.push(minimal_uint_element(&sig.r));
    signed_elements.push(minimal_uint_element(&sig.s));

    let raw = encode(&Element::list(signed_elements));
    let tx_hash = Keccak256::digest(&raw);
    Ok(SignedTransaction {
        raw,
        tx_hash: tx_hash.into(),
    })
}

/// Signs a legacy transaction without EIP-155 replay protection: `v` is
/// plain 27/28 and the chain id never enters the pre-image.
pub fn sign_legacy_original(tx: &Transaction, key_pair: &KeyPair) -> Result<SignedTransaction, TransactionError> {
    let preimage_elements = legacy6_elements(tx);
    let preimage = encode(&Element::list(preimage_elements));

    let hash = Keccak256::digest(&preimage);
    let sig = key_pair.sign_prehashed(hash.as_slice())?;

    let mut signed_elements = legacy6_elements(tx);
    signed_elements.push(rlp_codec::encode_uint(u128::from(sig.v)));
    signed_elements.push(minimal_uint_element(&sig.r));
    signed_elements.push(minimal_uint_element(&sig.s));

    let raw = encode(&Element::list(signed_elements));
    let tx_hash = Keccak256::digest(&raw);
    Ok(SignedTransaction {
        raw,
        tx_hash: tx_hash.into(),
    })
}
