//! Transaction construction, RLP serialisation, signing, and signer
//! recovery for legacy, legacy-EIP-155, and EIP-1559 (type-2) Ethereum
//! transactions.

mod codec;
mod error;
mod model;
mod recover;
mod sign;

pub use error::TransactionError;
pub use model::{RecoveredTransaction, SignedTransaction, Transaction, TxKind};
pub use recover::recover;
pub use sign::{sign, sign_eip1559, sign_legacy_eip155, sign_legacy_original};
