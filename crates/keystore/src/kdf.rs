use sha2::Sha256;

use crate::error::KeystoreError;
use crate::model::{Pbkdf2Params, ScryptParams, PRF_HMAC_SHA256};

pub fn derive_scrypt(password: &[u8], params: &ScryptParams) -> Result<Vec<u8>, KeystoreError> {
    let log_n = params
        .n
        .checked_ilog2()
        .filter(|&log_n| 1u32 << log_n == params.n)
        .ok_or_else(|| KeystoreError::KdfFailed(format!("scrypt N={} is not a power of two", params.n)))?;

    let scrypt_params = scrypt::Params::new(log_n as u8, params.r, params.p, params.dklen)
        .map_err(|e| KeystoreError::KdfFailed(e.to_string()))?;

    let mut output = vec![0u8; params.dklen];
    scrypt::scrypt(password, params.salt.as_slice(), &scrypt_params, &mut output)
        .map_err(|e| KeystoreError::KdfFailed(e.to_string()))?;
    Ok(output)
}

pub fn derive_pbkdf2(password: &[u8], params: &Pbkdf2Params) -> Result<Vec<u8>, KeystoreError> {
    if params.prf != PRF_HMAC_SHA256 {
        return Err(KeystoreError::UnsupportedPrf(params.prf.clone()));
    }

    let mut output = vec![0u8; params.dklen];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, params.salt.as_slice(), params.c, &mut output);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrypt_derives_32_bytes() {
        let params = ScryptParams {
            dklen: 32,
            n: 4096,
            p: 1,
            r: 8,
            salt: vec![1u8; 32].into(),
        };
        let key = derive_scrypt(b"correcthorsebatterystaple", &params).unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn scrypt_rejects_non_power_of_two_n() {
        let params = ScryptParams {
            dklen: 32,
            n: 1000,
            p: 1,
            r: 8,
            salt: vec![1u8; 32].into(),
        };
        assert!(derive_scrypt(b"pw", &params).is_err());
    }

    #[test]
    fn pbkdf2_derives_32_bytes() {
        let params = Pbkdf2Params {
            dklen: 32,
            c: 262144,
            prf: PRF_HMAC_SHA256.to_string(),
            salt: vec![2u8; 32].into(),
        };
        let key = derive_pbkdf2(b"correcthorsebatterystaple", &params).unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn pbkdf2_rejects_unknown_prf() {
        let params = Pbkdf2Params {
            dklen: 32,
            c: 1000,
            prf: "hmac-sha512".to_string(),
            salt: vec![2u8; 32].into(),
        };
        assert!(derive_pbkdf2(b"pw", &params).is_err());
    }

    #[test]
    fn derivation_is_deterministic() {
        let params = ScryptParams {
            dklen: 32,
            n: 4096,
            p: 1,
            r: 8,
            salt: vec![3u8; 32].into(),
        };
        let a = derive_scrypt(b"pw", &params).unwrap();
        let b = derive_scrypt(b"pw", &params).unwrap();
        assert_eq!(a, b);
    }
}
