//! Symmetric cipher for packed `"user:password"` credentials.
//!
//! Format: `[12-byte nonce][ciphertext][16-byte tag]`, AES-256-GCM with a key
//! derived from the server secret through HKDF-SHA256.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use hkdf::Hkdf;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::error::DomainError;

const NONCE_LEN: usize = 12;
const KEY_INFO: &[u8] = b"registry-auth-credential-cipher";

pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl CredentialCipher {
    /// Derive the encryption key from the server secret.
    ///
    /// # Errors
    ///
    /// `KeyDerivation` if the key cannot be expanded.
    pub fn new(secret: &SecretString) -> Result<Self, DomainError> {
        let hkdf = Hkdf::<Sha256>::new(None, secret.expose_secret().as_bytes());
        let mut key = [0u8; 32];
        hkdf.expand(KEY_INFO, &mut key)
            .map_err(|e| DomainError::KeyDerivation(e.to_string()))?;
        Ok(Self {
            cipher: Aes256Gcm::new(&key.into()),
        })
    }

    /// Encrypt `plaintext` under a fresh random nonce.
    ///
    /// # Errors
    ///
    /// `Encryption` if the cipher rejects the input.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, DomainError> {
        let nonce_bytes: [u8; NONCE_LEN] = rand::random();
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|e| DomainError::Encryption(e.to_string()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt a blob produced by [`Self::encrypt`].
    ///
    /// Any failure yields an empty vector: a corrupt blob is the same as no
    /// credentials at all.
    #[must_use]
    pub fn decrypt(&self, blob: &[u8]) -> Vec<u8> {
        if blob.len() <= NONCE_LEN {
            return Vec::new();
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .unwrap_or_default()
    }
}
