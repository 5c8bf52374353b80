use rand_core::{OsRng, RngCore};
use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::cipher::aes_128_ctr_apply;
use crate::error::KeystoreError;
use crate::kdf::{derive_pbkdf2, derive_scrypt};
use crate::model::{
    CipherParams, CryptoSection, KdfParams, KeystoreFile, Pbkdf2Params, ScryptParams,
    CIPHER_AES_128_CTR, CIPHER_AES_128_CTR_TYPO, KEYSTORE_VERSION, PRF_HMAC_SHA256,
};

/// The KDF an encrypting caller asks for; salt is generated internally.
#[derive(Debug, Clone)]
pub enum KdfRequest {
    Scrypt { n: u32, p: u32, r: u32 },
    Pbkdf2 { c: u32 },
}

/// Encrypts a private key into a fresh Keystore V3 document.
///
/// `address` and any distinguishing metadata the caller wants alongside
/// `id`/`version`/`crypto` may be set; those three core fields are always
/// derived here and never overridden.
pub fn write(
    password: &[u8],
    private_key: &[u8; 32],
    kdf_request: KdfRequest,
    address: Option<String>,
) -> Result<KeystoreFile, KeystoreError> {
    let mut salt = vec![0u8; 32];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut iv);

    let (derived, kdf_params) = match kdf_request {
        KdfRequest::Scrypt { n, p, r } => {
            let params = ScryptParams {
                dklen: 32,
                n,
                p,
                r,
                salt: salt.clone().into(),
            };
            let derived = derive_scrypt(password, &params)?;
            (derived, KdfParams::Scrypt(params))
        }
        KdfRequest::Pbkdf2 { c } => {
            let params = Pbkdf2Params {
                dklen: 32,
                c,
                prf: PRF_HMAC_SHA256.to_string(),
                salt: salt.clone().into(),
            };
            let derived = derive_pbkdf2(password, &params)?;
            (derived, KdfParams::Pbkdf2(params))
        }
    };

    if derived.len() != 32 {
        return Err(KeystoreError::DerivedKeyLength(derived.len()));
    }

    let mut key16 = [0u8; 16];
    key16.copy_from_slice(&derived[0..16]);

    let mut ciphertext = private_key.to_vec();
    aes_128_ctr_apply(&key16, &iv, &mut ciphertext)?;

    let mut mac_input = Vec::with_capacity(16 + ciphertext.len());
    mac_input.extend_from_slice(&derived[16..32]);
    mac_input.extend_from_slice(&ciphertext);
    let mac = Keccak256::digest(&mac_input).to_vec();

    let crypto = CryptoSection {
        cipher: CIPHER_AES_128_CTR.to_string(),
        cipherparams: CipherParams { iv: iv.to_vec().into() },
        ciphertext: ciphertext.into(),
        kdf: kdf_params,
        mac: mac.into(),
    };

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        id: Uuid::new_v4().to_string(),
        address,
        crypto,
    })
}

/// Parses a Keystore V3 JSON document without decrypting it.
pub fn read(json: &str) -> Result<KeystoreFile, KeystoreError> {
    #[derive(serde::Deserialize)]
    struct RawFile {
        version: Option<u32>,
        id: Option<String>,
        address: Option<String>,
        crypto: serde_json::Value,
    }

    let mut raw: RawFile =
        serde_json::from_str(json).map_err(|e| KeystoreError::MalformedJson(e.to_string()))?;

    let id = raw.id.take().ok_or(KeystoreError::MissingId)?;
    let version = raw.version.unwrap_or(0);
    if version != KEYSTORE_VERSION {
        return Err(KeystoreError::UnsupportedVersion(version));
    }

    if let Some(cipher) = raw.crypto.get("cipher").and_then(|v| v.as_str()) {
        if cipher == CIPHER_AES_128_CTR_TYPO {
            raw.crypto["cipher"] = serde_json::Value::String(CIPHER_AES_128_CTR.to_string());
        } else if cipher != CIPHER_AES_128_CTR {
            return Err(KeystoreError::UnsupportedCipher(cipher.to_string()));
        }
    }

    let kdf_name = raw
        .crypto
        .get("kdf")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let crypto: CryptoSection = serde_json::from_value(raw.crypto).map_err(|e| match kdf_name.as_deref() {
        Some("scrypt") | Some("pbkdf2") => KeystoreError::MalformedJson(e.to_string()),
        Some(other) => KeystoreError::UnsupportedKdf(other.to_string()),
        None => KeystoreError::MalformedJson(e.to_string()),
    })?;

    Ok(KeystoreFile {
        version,
        id,
        address: raw.address,
        crypto,
    })
}

/// Decrypts a parsed Keystore V3 document, returning the raw private key.
pub fn decrypt(file: &KeystoreFile, password: &[u8]) -> Result<[u8; 32], KeystoreError> {
    let derived = match &file.crypto.kdf {
        KdfParams::Scrypt(params) => derive_scrypt(password, params)?,
        KdfParams::Pbkdf2(params) => derive_pbkdf2(password, params)?,
    };

    if derived.len() != 32 {
        return Err(KeystoreError::DerivedKeyLength(derived.len()));
    }

    let ciphertext = file.crypto.ciphertext.as_slice();
    let mut mac_input = Vec::with_capacity(16 + ciphertext.len());
    mac_input.extend_from_slice(&derived[16..32]);
    mac_input.extend_from_slice(ciphertext);
    let expected_mac = Keccak256::digest(&mac_input);

    if expected_mac.as_slice().ct_eq(file.crypto.mac.as_slice()).unwrap_u8() != 1 {
        return Err(KeystoreError::MacMismatch);
    }

    if file.crypto.cipher != CIPHER_AES_128_CTR {
        return Err(KeystoreError::UnsupportedCipher(file.crypto.cipher.clone()));
    }

    let mut key16 = [0u8; 16];
    key16.copy_from_slice(&derived[0..16]);

    let iv_bytes = file.crypto.cipherparams.iv.as_slice();
    let mut iv = [0u8; 16];
    if iv_bytes.len() != 16 {
        return Err(KeystoreError::CipherFailed("IV must be 16 bytes".into()));
    }
    iv.copy_from_slice(iv_bytes);

    let mut plaintext = ciphertext.to_vec();
    aes_128_ctr_apply(&key16, &iv, &mut plaintext)?;

    if plaintext.len() != 32 {
        return Err(KeystoreError::CipherFailed(format!(
            "decrypted private key has wrong length: {}",
            plaintext.len()
        )));
    }

    let mut out = [0u8; 32];
    out.copy_from_slice(&plaintext);
    Ok(out)
}
