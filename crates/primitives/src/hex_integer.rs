use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PrimitivesError;

/// An arbitrary-precision unsigned integer, stored as minimal big-endian
/// bytes (an empty vector represents zero). This is the same convention RLP
/// uses for integers, which keeps conversion between the two free of
/// special-casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HexInteger(Vec<u8>);

impl HexInteger {
    pub const ZERO: HexInteger = HexInteger(Vec::new());

    pub fn from_be_bytes(bytes: Vec<u8>) -> Self {
        let trimmed = trim_leading_zeros(&bytes).to_vec();
        HexInteger(trimmed)
    }

    pub fn from_u64(value: u64) -> Self {
        HexInteger::from_be_bytes(value.to_be_bytes().to_vec())
    }

    pub fn from_u128(value: u128) -> Self {
        HexInteger::from_be_bytes(value.to_be_bytes().to_vec())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_be_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_u64(&self) -> Result<u64, PrimitivesError> {
        if self.0.len() > 8 {
            return Err(PrimitivesError::IntegerOverflow);
        }
        let mut buf = [0u8; 8];
        buf[8 - self.0.len()..].copy_from_slice(&self.0);
        Ok(u64::from_be_bytes(buf))
    }

    pub fn to_u128(&self) -> Result<u128, PrimitivesError> {
        if self.0.len() > 16 {
            return Err(PrimitivesError::IntegerOverflow);
        }
        let mut buf = [0u8; 16];
        buf[16 - self.0.len()..].copy_from_slice(&self.0);
        Ok(u128::from_be_bytes(buf))
    }

    /// Parses either a `0x`-prefixed hex string or a base-10 decimal string.
    pub fn parse(input: &str) -> Result<Self, PrimitivesError> {
        if let Some(hex_part) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
            let hex_part = if hex_part.is_empty() { "0" } else { hex_part };
            let padded = if hex_part.len() % 2 == 1 {
                format!("0{hex_part}")
            } else {
                hex_part.to_string()
            };
            let bytes = hex::decode(&padded)
                .map_err(|e| PrimitivesError::InvalidHex(format!("invalid hex integer: {e}")))?;
            Ok(HexInteger::from_be_bytes(bytes))
        } else {
            let bytes = decimal_str_to_be_bytes(input)?;
            Ok(HexInteger::from_be_bytes(bytes))
        }
    }

    /// Renders as `0x`-prefixed lowercase hex with no leading zeros; zero
    /// renders as `0x0`.
    pub fn to_hex_string(&self) -> String {
        if self.0.is_empty() {
            return "0x0".to_string();
        }
        let mut hex_str = hex::encode(&self.0);
        while hex_str.len() > 1 && hex_str.starts_with('0') {
            hex_str.remove(0);
        }
        format!("0x{hex_str}")
    }
}

/// Converts a base-10 digit string of unbounded size into minimal
/// big-endian bytes by repeated divmod-by-256, avoiding any fixed-width
/// integer type so values beyond `u128::MAX` still parse.
fn decimal_str_to_be_bytes(input: &str) -> Result<Vec<u8>, PrimitivesError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrimitivesError::NoIntegerValue);
    }

    let mut digits: Vec<u8> = input.bytes().map(|b| b - b'0').collect();
    let mut out = Vec::new();

    while !(digits.len() == 1 && digits[0] == 0) {
        let mut remainder: u32 = 0;
        let mut quotient = Vec::with_capacity(digits.len());
        for &digit in &digits {
            let acc = remainder * 10 + u32::from(digit);
            quotient.push((acc / 256) as u8);
            remainder = acc % 256;
        }

        let first_nonzero = quotient.iter().position(|&d| d != 0).unwrap_or(quotient.len());
        digits = quotient[first_nonzero..].to_vec();
        if digits.is_empty() {
            digits.push(0);
        }
        out.push(remainder as u8);
    }

    out.reverse();
    Ok(out)
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let mut idx = 0;
    while idx < bytes.len() && bytes[idx] == 0 {
        idx += 1;
    }
    &bytes[idx..]
}

impl fmt::Display for HexInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl From<u64> for HexInteger {
    fn from(value: u64) -> Self {
        HexInteger::from_u64(value)
    }
}

impl From<u128> for HexInteger {
    fn from(value: u128) -> Self {
        HexInteger::from_u128(value)
    }
}

impl Serialize for HexInteger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for HexInteger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // serde_json's arbitrary-precision feature represents numbers as a
        // string internally, so a plain Value round-trip preserves integers
        // wider than u64/i64 instead of silently truncating them.
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => {
                HexInteger::parse(&s).map_err(DeError::custom)
            }
            serde_json::Value::Number(n) => {
                let repr = n.to_string();
                if repr.starts_with('-') {
                    return Err(DeError::custom(PrimitivesError::NegativeInteger));
                }
                if repr.contains('.') || repr.contains('e') || repr.contains('E') {
                    return Err(DeError::custom(PrimitivesError::PrecisionLoss));
                }
                let bytes = decimal_str_to_be_bytes(&repr).map_err(DeError::custom)?;
                Ok(HexInteger::from_be_bytes(bytes))
            }
            _ => Err(DeError::custom(PrimitivesError::NoIntegerValue)),
        }
    }
}
