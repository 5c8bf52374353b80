//! Transformations between the legacy 27/28 `v` parity byte and the
//! wire encodings used by EIP-155 and EIP-2930/1559 transactions.

use crate::error::SignerError;

/// Encodes a legacy 27/28 parity byte as an EIP-155 `v`: `v' = v - 27 +
/// 2*chain_id + 35`.
pub fn to_eip155(v_legacy: u8, chain_id: u64) -> u64 {
    let parity = u64::from(v_legacy - 27);
    parity + 2 * chain_id + 35
}

/// Encodes a legacy 27/28 parity byte as an EIP-2930/1559 Y-parity bit
/// (`0` or `1`).
pub fn to_y_parity(v_legacy: u8) -> u8 {
    v_legacy - 27
}

/// Normalizes any accepted `v` encoding back to legacy 27/28.
///
/// `v ∈ {0, 1, 27, 28}` is treated directly (Y-parity or already-legacy);
/// any other value is assumed to be an EIP-155-encoded `v` and inverted
/// against `chain_id`. The result must land on 27 or 28, else the V value
/// is rejected.
pub fn normalize_v(v: u64, chain_id: u64) -> Result<u8, SignerError> {
    match v {
        0 => return Ok(27),
        1 => return Ok(28),
        27 => return Ok(27),
        28 => return Ok(28),
        _ => {}
    }

    let inverse = (v as i128) - 2 * (chain_id as i128) - 8;
    if inverse == 27 || inverse == 28 {
        Ok(inverse as u8)
    } else {
        Err(SignerError::InvalidVValue)
    }
}
