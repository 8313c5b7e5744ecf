// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Encryption of stored secret values.
//!
//! # Blob Format
//!
//! ```text
//! base64( IV (16 bytes) || AES-128-CBC(PKCS#7, plaintext) )
//! ```
//!
//! # Key Derivation
//!
//! The 128-bit key is the first 16 bytes of `SHA-256(secret)`. The same
//! secret always yields the same key, so changing the configured secret
//! makes every previously stored blob undecryptable.
//!
//! # Integrity
//!
//! The format carries no authentication tag. A corrupted blob or a wrong
//! key usually fails padding validation, but can occasionally decrypt to
//! garbage. Existing stored blobs depend on this exact layout.
//!
//! # Examples
//!
//! ```
//! use warden_core::cipher::SecretCipher;
//!
//! let cipher = SecretCipher::new("k1");
//! let blob = cipher.encrypt("p@ss1").unwrap();
//! assert_eq!(cipher.decrypt(&blob).unwrap(), "p@ss1");
//! ```

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::CipherError;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

// =============================================================================
// Constants
// =============================================================================

/// The length of the derived key in bytes (128 bits).
pub const KEY_LENGTH: usize = 16;

/// The length of the IV in bytes.
pub const IV_LENGTH: usize = 16;

/// The AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

// =============================================================================
// SecretCipher
// =============================================================================

/// AES-128-CBC cipher keyed from a configured secret.
///
/// Holds only the derived key. Cloning is cheap and every method takes
/// `&self`, so one instance can serve all requests.
#[derive(Clone)]
pub struct SecretCipher {
    key: [u8; KEY_LENGTH],
}

impl SecretCipher {
    /// Creates a cipher whose key is derived from `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            key: derive_key(secret),
        }
    }

    /// Encrypts `plaintext` under a fresh random IV.
    ///
    /// Two calls with the same plaintext produce different blobs.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut iv = [0u8; IV_LENGTH];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| CipherError::RandomSource {
                message: e.to_string(),
            })?;

        let ciphertext = seal(&self.key, &iv, plaintext.as_bytes());

        let mut combined = Vec::with_capacity(IV_LENGTH + ciphertext.len());
        combined.extend_from_slice(&iv);
        combined.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(combined))
    }

    /// Decrypts a blob produced by [`SecretCipher::encrypt`].
    pub fn decrypt(&self, blob: &str) -> Result<String, CipherError> {
        let combined = STANDARD
            .decode(blob.trim())
            .map_err(|e| CipherError::InvalidEncoding {
                message: e.to_string(),
            })?;

        if combined.len() < IV_LENGTH + BLOCK_SIZE {
            return Err(CipherError::TooShort {
                len: combined.len(),
            });
        }

        let (iv, ciphertext) = combined.split_at(IV_LENGTH);
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::Padding);
        }

        let mut iv_block = [0u8; IV_LENGTH];
        iv_block.copy_from_slice(iv);

        let plaintext = open(&self.key, &iv_block, ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
    }
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Encrypts `plaintext` with a key derived from `secret`.
pub fn encrypt(plaintext: &str, secret: &str) -> Result<String, CipherError> {
    SecretCipher::new(secret).encrypt(plaintext)
}

/// Decrypts `blob` with a key derived from `secret`.
pub fn decrypt(blob: &str, secret: &str) -> Result<String, CipherError> {
    SecretCipher::new(secret).decrypt(blob)
}

/// Derives the 128-bit key: the first 16 bytes of `SHA-256(secret)`.
pub fn derive_key(secret: &str) -> [u8; KEY_LENGTH] {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&digest[..KEY_LENGTH]);
    key
}

fn seal(key: &[u8; KEY_LENGTH], iv: &[u8; IV_LENGTH], plaintext: &[u8]) -> Vec<u8> {
    Aes128CbcEnc::new(&(*key).into(), &(*iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

fn open(
    key: &[u8; KEY_LENGTH],
    iv: &[u8; IV_LENGTH],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    Aes128CbcDec::new(&(*key).into(), &(*iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::Padding)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_derive_key_is_sha256_prefix() {
        assert_eq!(derive_key("").to_vec(), hex("e3b0c44298fc1c149afbf4c8996fb924"));
        assert_eq!(derive_key("abc").to_vec(), hex("ba7816bf8f01cfea414140de5dae2223"));
        assert_eq!(derive_key("k1"), derive_key("k1"));
        assert_ne!(derive_key("k1"), derive_key("k2"));
    }

    #[test]
    fn test_cbc_known_answer() {
        // NIST SP 800-38A F.2.1, first block.
        let key: [u8; 16] = hex("2b7e151628aed2a6abf7158809cf4f3c").try_into().unwrap();
        let iv: [u8; 16] = hex("000102030405060708090a0b0c0d0e0f").try_into().unwrap();
        let block = hex("6bc1bee22e409f96e93d7e117393172a");

        let sealed = seal(&key, &iv, &block);

        // A full block of input gains a full block of padding.
        assert_eq!(sealed.len(), 32);
        assert_eq!(sealed[..16].to_vec(), hex("7649abac8119b246cee98e9b12e9197d"));
        assert_eq!(open(&key, &iv, &sealed).unwrap(), block);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = SecretCipher::new("k1");
        for plaintext in ["p@ss1", "", "a", "exactly sixteen!", "비밀번호123 🔐"] {
            let blob = cipher.encrypt(plaintext).unwrap();
            assert_eq!(cipher.decrypt(&blob).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_blob_layout() {
        let cipher = SecretCipher::new("k1");
        for (len, expected) in [(0usize, 32usize), (15, 32), (16, 48), (17, 48)] {
            let blob = cipher.encrypt(&"x".repeat(len)).unwrap();
            assert_eq!(STANDARD.decode(blob).unwrap().len(), expected);
        }
    }

    #[test]
    fn test_encryption_is_randomized() {
        let cipher = SecretCipher::new("k1");
        let first = cipher.encrypt("p@ss1").unwrap();
        let second = cipher.encrypt("p@ss1").unwrap();
        assert_ne!(first, second);

        let iv_a = &STANDARD.decode(&first).unwrap()[..IV_LENGTH];
        let iv_b = &STANDARD.decode(&second).unwrap()[..IV_LENGTH];
        assert_ne!(iv_a, iv_b);
    }

    #[test]
    fn test_wrong_secret_never_recovers_plaintext() {
        let blob = encrypt("p@ss1", "k1").unwrap();
        assert_eq!(decrypt(&blob, "k1").unwrap(), "p@ss1");

        match decrypt(&blob, "k2") {
            Ok(garbage) => assert_ne!(garbage, "p@ss1"),
            Err(e) => assert!(matches!(e, CipherError::Padding | CipherError::InvalidUtf8), "{:?}", e),
        }
    }

    #[test]
    fn test_invalid_base64() {
        let result = SecretCipher::new("k1").decrypt("not base64 at all!");
        assert!(matches!(result, Err(CipherError::InvalidEncoding { .. })));
    }

    #[test]
    fn test_short_blobs() {
        let cipher = SecretCipher::new("k1");
        let short = STANDARD.encode([0u8; 8]);
        assert_eq!(cipher.decrypt(&short), Err(CipherError::TooShort { len: 8 }));

        let iv_only = STANDARD.encode([0u8; IV_LENGTH]);
        assert_eq!(
            cipher.decrypt(&iv_only),
            Err(CipherError::TooShort { len: IV_LENGTH })
        );
    }

    #[test]
    fn test_misaligned_ciphertext() {
        let cipher = SecretCipher::new("k1");
        let blob = STANDARD.encode([7u8; IV_LENGTH + BLOCK_SIZE + 3]);
        assert_eq!(cipher.decrypt(&blob), Err(CipherError::Padding));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let cipher = SecretCipher::new("k1");
        let blob = cipher.encrypt("p@ss1").unwrap();
        let mut bytes = STANDARD.decode(&blob).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last ^= 0xFF;
        }

        match cipher.decrypt(&STANDARD.encode(bytes)) {
            Ok(garbage) => assert_ne!(garbage, "p@ss1"),
            Err(e) => assert!(matches!(e, CipherError::Padding | CipherError::InvalidUtf8), "{:?}", e),
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", SecretCipher::new("k1"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
