use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PrimitivesError;

/// An arbitrary-length byte string presented on the wire as `0x`-prefixed
/// hex, used for calldata, signatures, and raw transaction payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        HexBytes(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn parse(input: &str) -> Result<Self, PrimitivesError> {
        let hex_part = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
        let padded = if hex_part.len() % 2 == 1 {
            format!("0{hex_part}")
        } else {
            hex_part.to_string()
        };
        let bytes = hex::decode(&padded)
            .map_err(|e| PrimitivesError::InvalidHex(format!("invalid hex bytes: {e}")))?;
        Ok(HexBytes(bytes))
    }
}

impl fmt::Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(bytes: Vec<u8>) -> Self {
        HexBytes(bytes)
    }
}

impl From<HexBytes> for Vec<u8> {
    fn from(value: HexBytes) -> Self {
        value.0
    }
}

impl Serialize for HexBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HexBytes::parse(&s).map_err(DeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_roundtrip() {
        let bytes = HexBytes::parse("0xdeadbeef").unwrap();
        assert_eq!(bytes.to_string(), "0xdeadbeef");
    }

    #[test]
    fn tolerates_odd_length_input() {
        let bytes = HexBytes::parse("0xabc").unwrap();
        assert_eq!(bytes.as_slice(), &[0x0a, 0xbc]);
    }

    #[test]
    fn empty_input_is_empty_bytes() {
        let bytes = HexBytes::parse("0x").unwrap();
        assert!(bytes.as_slice().is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let bytes = HexBytes::parse("0x0102030405").unwrap();
        let json = serde_json::to_string(&bytes).unwrap();
        let back: HexBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(bytes, back);
    }
}
