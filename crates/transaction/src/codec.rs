use primitives::Address;
use rlp_codec::{encode_uint, Element};

use crate::model::Transaction;

pub fn address_element(to: &Option<Address>) -> Element {
    match to {
        Some(addr) => Element::data(addr.as_bytes().to_vec()),
        None => Element::data(Vec::new()),
    }
}

pub fn data_element(bytes: &[u8]) -> Element {
    Element::data(bytes.to_vec())
}

/// Encodes a fixed-width big-endian integer (signature `r`/`s` components)
/// as a canonical RLP string: leading zero bytes stripped, zero itself
/// becomes the empty string.
pub fn minimal_uint_element(bytes: &[u8]) -> Element {
    let mut idx = 0;
    while idx < bytes.len() && bytes[idx] == 0 {
        idx += 1;
    }
    Element::data(bytes[idx..].to_vec())
}

/// The 6 legacy transaction fields: `[nonce, gasPrice, gasLimit, to, value, data]`.
pub fn legacy6_elements(tx: &Transaction) -> Vec<Element> {
    vec![
        Element::data(tx.nonce.as_be_bytes().to_vec()),
        Element::data(tx.gas_price.as_be_bytes().to_vec()),
        Element::data(tx.gas_limit.as_be_bytes().to_vec()),
        address_element(&tx.to),
        Element::data(tx.value.as_be_bytes().to_vec()),
        data_element(tx.data.as_slice()),
    ]
}

/// Legacy EIP-155 signing pre-image elements: legacy6 ++ `[chainId, 0, 0]`.
pub fn eip155_preimage_elements(tx: &Transaction, chain_id: u64) -> Vec<Element> {
    let mut elements = legacy6_elements(tx);
    elements.push(encode_uint(u128::from(chain_id)));
    elements.push(encode_uint(0));
    elements.push(encode_uint(0));
    elements
}

/// EIP-1559 payload elements (9 total), ending in an always-empty access
/// list.
pub fn eip1559_payload_elements(tx: &Transaction, chain_id: u64) -> Vec<Element> {
    vec![
        encode_uint(u128::from(chain_id)),
        Element::data(tx.nonce.as_be_bytes().to_vec()),
        Element::data(tx.max_priority_fee_per_gas.as_be_bytes().to_vec()),
        Element::data(tx.max_fee_per_gas.as_be_bytes().to_vec()),
        Element::data(tx.gas_limit.as_be_bytes().to_vec()),
        address_element(&tx.to),
        Element::data(tx.value.as_be_bytes().to_vec()),
        data_element(tx.data.as_slice()),
        Element::list(Vec::new()),
    ]
}
