use std::fmt;

use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::error::PrimitivesError;

/// A 20-byte Ethereum address.
///
/// The internal representation is always the raw 20 bytes; `0x`-prefixed,
/// bare-hex, and EIP-55 checksummed strings are just presentations of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parses an address from any of the four presentation variants:
    /// `0x`-prefixed checksum/lowercase/uppercase hex, or bare hex without a
    /// prefix. Case is irrelevant to acceptance; only [`to_checksum`] cares
    /// about case on output.
    ///
    /// [`to_checksum`]: Address::to_checksum
    pub fn parse(input: &str) -> Result<Self, PrimitivesError> {
        let hex_part = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
        if hex_part.len() != 40 {
            return Err(PrimitivesError::InvalidAddress(format!(
                "expected 40 hex characters, got {}",
                hex_part.len()
            )));
        }
        let bytes = hex::decode(hex_part)
            .map_err(|e| PrimitivesError::InvalidAddress(format!("invalid hex: {e}")))?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Address(out))
    }

    /// Renders the address with the EIP-55 mixed-case checksum.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let hash_hex = hex::encode(hash);

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            if c.is_ascii_digit() {
                out.push(c);
                continue;
            }
            let nibble = u8::from_str_radix(&hash_hex[i..i + 1], 16).unwrap_or(0);
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Renders the address as lowercase hex without a `0x` prefix.
    pub fn to_hex_bare(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for Address {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AddressVisitor;

        impl Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 20-byte hex-encoded Ethereum address")
            }

            fn visit_str<E>(self, v: &str) -> Result<Address, E>
            where
                E: DeError,
            {
                Address::parse(v).map_err(DeError::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn parse_checksummed_and_reproduce_checksum() {
        let addr = Address::parse(CHECKSUMMED).unwrap();
        assert_eq!(addr.to_checksum(), CHECKSUMMED);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        let lower = Address::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        let upper = Address::parse(&CHECKSUMMED.to_uppercase().replace("0X", "0x")).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.to_checksum(), CHECKSUMMED);
    }

    #[test]
    fn parsing_tolerates_bare_hex_without_prefix() {
        let bare = &CHECKSUMMED[2..];
        let addr = Address::parse(bare).unwrap();
        assert_eq!(addr.to_checksum(), CHECKSUMMED);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(Address::parse("0xdead").is_err());
    }

    #[test]
    fn non_hex_characters_rejected() {
        assert!(Address::parse("0xzzzzb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn display_is_lowercase_with_prefix() {
        let addr = Address::parse(CHECKSUMMED).unwrap();
        assert_eq!(addr.to_string(), CHECKSUMMED.to_lowercase());
    }

    #[test]
    fn serde_roundtrip_via_lowercase() {
        let addr = Address::parse(CHECKSUMMED).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn deserialize_accepts_checksummed_input() {
        let json = format!("\"{CHECKSUMMED}\"");
        let addr: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr.to_checksum(), CHECKSUMMED);
    }
}
