use serde::{Deserialize, Serialize};

use crate::hex_field::HexField;

/// `scrypt` KDF parameters, per the Keystore V3 `kdfparams` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryptParams {
    pub dklen: usize,
    pub n: u32,
    pub p: u32,
    pub r: u32,
    pub salt: HexField,
}

/// `pbkdf2` KDF parameters. `prf` is always `"hmac-sha256"`; any other
/// value is rejected on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pbkdf2Params {
    pub dklen: usize,
    pub c: u32,
    pub prf: String,
    pub salt: HexField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kdf", content = "kdfparams", rename_all = "lowercase")]
pub enum KdfParams {
    Scrypt(ScryptParams),
    Pbkdf2(Pbkdf2Params),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: HexField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoSection {
    pub cipher: String,
    pub cipherparams: CipherParams,
    pub ciphertext: HexField,
    #[serde(flatten)]
    pub kdf: KdfParams,
    pub mac: HexField,
}

/// A Keystore V3 JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub crypto: CryptoSection,
}

/// The canonical cipher name. Writers always emit this; readers also
/// tolerate the historical `es-128-ctr` typo found in some legacy data.
pub const CIPHER_AES_128_CTR: &str = "aes-128-ctr";
pub const CIPHER_AES_128_CTR_TYPO: &str = "es-128-ctr";
pub const KEYSTORE_VERSION: u32 = 3;
pub const PRF_HMAC_SHA256: &str = "hmac-sha256";
