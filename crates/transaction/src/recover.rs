use rlp_codec::{decode_list, encode, Element};
use sha3::{Digest, Keccak256};
use signer::v_value::normalize_v;
use signer::recover_from_prehash;

use crate::error::TransactionError;
use crate::model::RecoveredTransaction;

const EIP1559_TYPE: u8 = 0x02;
const LEGACY_LIST_THRESHOLD: u8 = 0xc7;

/// Recovers the signer address from a raw transaction, given the chain id
/// the gateway expects. For EIP-1559 transactions the encoded `chainId`
/// field must match `expected_chain_id`; for legacy EIP-155 transactions
/// the chain id is implied by `v` and validated during normalization.
pub fn recover(raw: &[u8], expected_chain_id: u64) -> Result<RecoveredTransaction, TransactionError> {
    let first_byte = *raw.first().ok_or(TransactionError::UnsupportedType)?;

    if first_byte == EIP1559_TYPE {
        recover_eip1559(raw, expected_chain_id)
    } else if first_byte >= LEGACY_LIST_THRESHOLD {
        recover_legacy(raw, expected_chain_id)
    } else {
        Err(TransactionError::UnsupportedType)
    }
}

fn recover_eip1559(raw: &[u8], expected_chain_id: u64) -> Result<RecoveredTransaction, TransactionError> {
    let elements = decode_list(&raw[1..])?;
    if elements.len() != 12 {
        return Err(TransactionError::WrongElementCount {
            expected: 12,
            got: elements.len(),
        });
    }

    let encoded_chain_id = elements[0].to_u64()?;
    if encoded_chain_id != expected_chain_id {
        return Err(TransactionError::ChainIdMismatch {
            expected: expected_chain_id,
            got: encoded_chain_id,
        });
    }

    let payload_elements = elements[0..9].to_vec();
    let payload_rlp = encode(&Element::list(payload_elements));
    let mut preimage = Vec::with_capacity(1 + payload_rlp.len());
    preimage.push(EIP1559_TYPE);
    preimage.extend_from_slice(&payload_rlp);
    let hash = Keccak256::digest(&preimage);

    let y_parity = elements[9].to_u64()? as u8;
    let v_legacy = 27 + y_parity;

    let r = fixed_32(&elements[10])?;
    let s = fixed_32(&elements[11])?;

    let signer = recover_from_prehash(hash.as_slice(), &r, &s, v_legacy)?;
    Ok(RecoveredTransaction {
        signer,
        raw: raw.to_vec(),
    })
}

/// `v ∈ {27, 28}` on the wire is never a legal EIP-155 encoding for any
/// `chain_id` (the smallest possible EIP-155 `v`, at `chain_id = 0`, is
/// 35), so it unambiguously means the transaction was signed without
/// replay protection and its pre-image carries no chain id suffix at
/// all. Any other `v` is inverted against `expected_chain_id` and the
/// suffix is appended as usual.
fn recover_legacy(raw: &[u8], expected_chain_id: u64) -> Result<RecoveredTransaction, TransactionError> {
    let elements = decode_list(raw)?;
    if elements.len() != 9 {
        return Err(TransactionError::WrongElementCount {
            expected: 9,
            got: elements.len(),
        });
    }

    let v = elements[6].to_u64()?;
    let (preimage_elements, v_legacy) = if v == 27 || v == 28 {
        (elements[0..6].to_vec(), v as u8)
    } else {
        let v_legacy = normalize_v(v, expected_chain_id)?;
        let mut preimage_elements = elements[0..6].to_vec();
        preimage_elements.push(rlp_codec::encode_uint(u128::from(expected_chain_id)));
        preimage_elements.push(rlp_codec::encode_uint(0));
        preimage_elements.push(rlp_codec::encode_uint(0));
        (preimage_elements, v_legacy)
    };

    let preimage = encode(&Element::list(preimage_elements));
    let hash = Keccak256::digest(&preimage);

    let r = fixed_32(&elements[7])?;
    let s = fixed_32(&elements[8])?;

    let signer = recover_from_prehash(hash.as_slice(), &r, &s, v_legacy)?;
    Ok(RecoveredTransaction {
        signer,
        raw: raw.to_vec(),
    })
}

fn fixed_32(element: &Element) -> Result<[u8; 32], TransactionError> {
    let data = element
        .as_data()
        .ok_or(TransactionError::InvalidRlp(rlp_codec::RlpError::NotData))?;
    if data.len() > 32 {
        return Err(TransactionError::IntegerTooWide);
    }
    let mut out = [0u8; 32];
    out[32 - data.len()..].copy_from_slice(data);
    Ok(out)
}
