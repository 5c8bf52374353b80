//! secp256k1 key pairs, signing, and address/signature recovery over
//! Keccak-256 digests.

mod error;
mod key_pair;
mod message;
mod recover;
pub mod v_value;

pub use error::SignerError;
pub use key_pair::{public_key_to_address, KeyPair, RawSignature};
pub use message::{eip191_hash, sign_personal_message};
pub use recover::{recover, recover_from_prehash};
