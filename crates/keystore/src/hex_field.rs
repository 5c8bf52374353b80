//! Bare (no `0x` prefix) hex string, the convention Keystore V3 JSON uses
//! for `ciphertext`, `mac`, `salt`, and `iv`. Distinct from
//! [`primitives::HexBytes`], whose `0x`-prefixed form is the JSON-RPC wire
//! convention instead.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexField(pub Vec<u8>);

impl HexField {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for HexField {
    fn from(bytes: Vec<u8>) -> Self {
        HexField(bytes)
    }
}

impl Serialize for HexField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for HexField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(&s);
        let bytes = hex::decode(stripped).map_err(DeError::custom)?;
        Ok(HexField(bytes))
    }
}
