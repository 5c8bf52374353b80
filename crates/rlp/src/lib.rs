//! Canonical Recursive Length Prefix (RLP) encode/decode.
//!
//! This is the wire encoding Ethereum uses for transactions and most other
//! consensus-critical structures. Encoding is always canonical (shortest
//! form); decoding rejects non-canonical input.

mod element;
mod error;

pub use element::{decode, decode_list, encode, encode_uint, Element, MAX_RLP_LENGTH};
pub use error::RlpError;
