use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use md5::{Digest, Md5};
use tracing::debug;

use crate::config::{ConfigNode, KeyReport};
use crate::errors::DecryptError;

pub const DEFAULT_DECRYPT_KEY: &str = "decrypt_key";

const ENCRYPTED_PREFIX: &str = "ENC(";
const SALT_LEN: usize = 8;
const BLOCK_LEN: usize = 8;

/// Turns the payload of an `ENC(...)` value back into plaintext.
pub trait PasswordCipher {
    fn decrypt(&self, payload: &str, key: &str) -> Result<String, DecryptError>;
}

/// Jasypt `PBEWithMD5AndDES`, the scheme behind the default
/// `BasicTextEncryptor`: base64(salt || DES-CBC(ciphertext)).
#[derive(Debug, Clone)]
pub struct JasyptCipher {
    iterations: usize,
}

impl JasyptCipher {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }
}

impl Default for JasyptCipher {
    fn default() -> Self {
        Self::with_iterations(1000)
    }
}

type DesCbcDecryptor = cbc::Decryptor<des::Des>;

impl PasswordCipher for JasyptCipher {
    fn decrypt(&self, payload: &str, key: &str) -> Result<String, DecryptError> {
        let raw = STANDARD
            .decode(payload.trim())
            .map_err(|err| DecryptError(format!("payload is not valid base64: {err}")))?;
        if raw.len() < SALT_LEN + BLOCK_LEN || (raw.len() - SALT_LEN) % BLOCK_LEN != 0 {
            return Err(DecryptError(format!(
                "payload has invalid length {}",
                raw.len()
            )));
        }
        let (salt, ciphertext) = raw.split_at(SALT_LEN);
        let derived = derive_key_iv(key.as_bytes(), salt, self.iterations);
        let decryptor = DesCbcDecryptor::new_from_slices(&derived[..8], &derived[8..])
            .map_err(|err| DecryptError(format!("invalid key material: {err}")))?;
        let mut buffer = ciphertext.to_vec();
        let plain = decryptor
            .decrypt_padded_mut::<Pkcs7>(&mut buffer)
            .map_err(|_| DecryptError("ciphertext padding is invalid".to_string()))?;
        String::from_utf8(plain.to_vec())
            .map_err(|_| DecryptError("plaintext is not valid utf-8".to_string()))
    }
}

// PBKDF1 with MD5: first half of the digest is the DES key, second half the IV.
fn derive_key_iv(password: &[u8], salt: &[u8], iterations: usize) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update(password);
    hasher.update(salt);
    let mut digest = hasher.finalize();
    for _ in 1..iterations {
        digest = Md5::digest(digest);
    }
    let mut derived = [0u8; 16];
    derived.copy_from_slice(&digest);
    derived
}

/// Replace an `ENC(...)` value at `password_key` with its plaintext, using
/// the sibling `decrypt_key` field as the cipher key.
pub fn decrypt_password(
    config: &mut ConfigNode,
    password_key: &str,
    decrypt_key: &str,
    cipher: &dyn PasswordCipher,
) -> KeyReport {
    let mut report = KeyReport::default();
    let Some(value) = config.get(password_key) else {
        report.warnings.push(format!(
            "Key '{password_key}' was marked to be checked for decrypt, but it's not set"
        ));
        return report;
    };
    let Some(wrapped) = value.as_text().and_then(|text| text.strip_prefix(ENCRYPTED_PREFIX))
    else {
        return report;
    };
    let Some(key) = config.get(decrypt_key).map(ToString::to_string) else {
        report
            .errors
            .push("Provided a encrypted password but not a key to decipher it".to_string());
        return report;
    };

    let decrypted = match wrapped.find(')') {
        Some(end) => cipher.decrypt(&wrapped[..end], &key),
        None => Err(DecryptError("missing closing parenthesis".to_string())),
    };
    match decrypted {
        Ok(plain) => {
            config.insert(password_key, plain);
        }
        Err(err) => {
            debug!(key = password_key, error = %err, "password decryption failed");
            report.errors.push(
                "Could not decrypt password, check password and decryption key to be valid"
                    .to_string(),
            );
        }
    }
    report
}
