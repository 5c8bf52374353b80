use primitives::{Address, HexBytes, HexInteger};

/// An unsigned transaction, prior to type classification.
///
/// `gas_price` drives the legacy/legacy-EIP-155 path; `max_priority_fee_per_gas`
/// and `max_fee_per_gas` drive the EIP-1559 path. Classification looks only
/// at the latter two.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub nonce: HexInteger,
    pub gas_price: HexInteger,
    pub max_priority_fee_per_gas: HexInteger,
    pub max_fee_per_gas: HexInteger,
    pub gas_limit: HexInteger,
    pub to: Option<Address>,
    pub value: HexInteger,
    pub data: HexBytes,
}

/// Which envelope a transaction signs and serialises as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Legacy,
    LegacyEip155,
    Eip1559,
}

impl Transaction {
    /// EIP-1559 is selected whenever either fee field is positive;
    /// legacy EIP-155 otherwise. Legacy-original and EIP-2930 are never
    /// selected automatically — callers reach for the dedicated helpers.
    pub fn classify(&self) -> TxKind {
        if !self.max_priority_fee_per_gas.is_zero() || !self.max_fee_per_gas.is_zero() {
            TxKind::Eip1559
        } else {
            TxKind::LegacyEip155
        }
    }
}

/// A transaction after signing: the wire-ready raw bytes plus its hash.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub tx_hash: [u8; 32],
}

/// The result of recovering a signer from a raw transaction.
#[derive(Debug, Clone)]
pub struct RecoveredTransaction {
    pub signer: Address,
    pub raw: Vec<u8>,
}
