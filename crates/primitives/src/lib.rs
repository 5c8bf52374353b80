//! Value types shared by the signer, transaction, wallet, and gateway
//! crates: addresses, hex-encoded integers and byte strings, and the
//! JSON-RPC 2.0 envelope both the upstream client and gateway server speak.

mod address;
mod error;
mod hex_bytes;
mod hex_integer;
pub mod jsonrpc;

pub use address::Address;
pub use error::PrimitivesError;
pub use hex_bytes::HexBytes;
pub use hex_integer::HexInteger;
