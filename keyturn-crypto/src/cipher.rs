//! Key derivation and authenticated encryption.
//!
//! HKDF-SHA256 turns an encoded shared group element into a 256-bit file key,
//! and XChaCha20-Poly1305 encrypts the payload under that key. The 24-byte
//! nonce is wide enough to be sampled at random for every message.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Size of the derived symmetric key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the HKDF extraction salt in bytes.
pub const SALT_SIZE: usize = 32;
/// Size of the XChaCha20 nonce in bytes.
pub const NONCE_SIZE: usize = 24;
/// Size of the Poly1305 authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// HKDF info label binding derived keys to file encryption.
pub const FILE_KEY_LABEL: &[u8] = b"filekey";

/// A symmetric file key. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FileKey([u8; KEY_SIZE]);

impl FileKey {
    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FileKey([REDACTED])")
    }
}

/// Derives a file key from shared secret bytes with HKDF-SHA256.
///
/// `shared_secret` is the input keying material, `salt` the extraction salt
/// and `label` the expansion context.
pub fn derive_key(shared_secret: &[u8], salt: &[u8; SALT_SIZE], label: &[u8]) -> CryptoResult<FileKey> {
    let hk = Hkdf::<Sha256>::new(Some(&salt[..]), shared_secret);
    let mut key = FileKey([0u8; KEY_SIZE]);
    hk.expand(label, &mut key.0)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Encrypts `plaintext` with XChaCha20-Poly1305 and no associated data.
///
/// Returns `ciphertext || tag`.
pub fn seal(key: &FileKey, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .encrypt(XNonce::from_slice(nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Decrypts and authenticates `ciphertext || tag`.
///
/// Any tag mismatch (tampering, wrong key, wrong nonce) yields
/// [`CryptoError::AuthenticationFailure`] and no plaintext at all.
pub fn open(key: &FileKey, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}
