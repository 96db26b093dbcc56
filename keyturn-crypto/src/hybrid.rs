//! Hybrid encryption to a ristretto255 public key.
//!
//! Encryption samples an ephemeral scalar `e`, publishes the capsule `e * G`,
//! and derives the file key from the shared element `e * P` for the
//! recipient's public key `P`. Decryption recomputes the same element as
//! `s * C`.
//!
//! Blob format: `[salt:32][nonce:24][ciphertext][tag:16]`
//!
//! Salt and nonce come from a single 56-byte random draw per message. The
//! ephemeral scalar, the shared element and the derived key are wiped before
//! returning.

use zeroize::Zeroizing;

use crate::capsule::Capsule;
use crate::cipher::{self, FileKey, FILE_KEY_LABEL, NONCE_SIZE, SALT_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::group::{self, Point, Scalar};
use crate::key::{random_nonzero_scalar, PublicKey, SecretKey};

/// Size of the `salt || nonce` header at the start of every blob.
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// Length of the blob produced for a plaintext of `plaintext_len` bytes.
pub const fn blob_len(plaintext_len: usize) -> usize {
    HEADER_SIZE + plaintext_len + TAG_SIZE
}

/// Output of [`encrypt`]: the capsule and the ciphertext blob.
///
/// The two are persisted as separate artifacts.
#[derive(Clone, Debug)]
pub struct Encrypted {
    pub capsule: Capsule,
    pub blob: Vec<u8>,
}

/// Encrypts `plaintext` for the holder of `recipient`'s secret key.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> CryptoResult<Encrypted> {
    let ephemeral = Zeroizing::new(random_nonzero_scalar()?);

    let mut header = [0u8; HEADER_SIZE];
    group::fill_random(&mut header)?;

    encrypt_with(recipient, plaintext, &ephemeral, &header)
}

/// Encryption with caller-chosen ephemeral scalar and header.
///
/// Callers must never reuse either value across messages.
pub(crate) fn encrypt_with(
    recipient: &PublicKey,
    plaintext: &[u8],
    ephemeral: &Scalar,
    header: &[u8; HEADER_SIZE],
) -> CryptoResult<Encrypted> {
    let capsule = Capsule::from_point(group::base_mult(ephemeral));
    let shared = Zeroizing::new(group::scalar_mult(ephemeral, recipient.point()));

    let (salt, nonce) = split_header(header);
    let key = file_key(&shared, &salt)?;
    let body = cipher::seal(&key, &nonce, plaintext)?;

    let mut blob = Vec::with_capacity(HEADER_SIZE + body.len());
    blob.extend_from_slice(header);
    blob.extend_from_slice(&body);

    Ok(Encrypted { capsule, blob })
}

/// Decrypts a blob with the secret key its capsule is aligned to.
///
/// Fails with [`CryptoError::MalformedCiphertext`] if the blob cannot hold a
/// header and with [`CryptoError::AuthenticationFailure`] for anything that
/// does not authenticate, including a capsule aligned to a different key.
pub fn decrypt(secret: &SecretKey, capsule: &Capsule, blob: &[u8]) -> CryptoResult<Vec<u8>> {
    if blob.len() < HEADER_SIZE {
        return Err(CryptoError::MalformedCiphertext {
            len: blob.len(),
            min: HEADER_SIZE,
        });
    }

    let (header, body) = blob.split_at(HEADER_SIZE);
    let mut header_bytes = [0u8; HEADER_SIZE];
    header_bytes.copy_from_slice(header);
    let (salt, nonce) = split_header(&header_bytes);

    let shared = Zeroizing::new(group::scalar_mult(secret.scalar(), capsule.point()));
    let key = file_key(&shared, &salt)?;

    cipher::open(&key, &nonce, body)
}

fn split_header(header: &[u8; HEADER_SIZE]) -> ([u8; SALT_SIZE], [u8; NONCE_SIZE]) {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    salt.copy_from_slice(&header[..SALT_SIZE]);
    nonce.copy_from_slice(&header[SALT_SIZE..]);
    (salt, nonce)
}

fn file_key(shared: &Point, salt: &[u8; SALT_SIZE]) -> CryptoResult<FileKey> {
    let encoded = Zeroizing::new(group::encode_point(shared));
    cipher::derive_key(encoded.as_slice(), salt, FILE_KEY_LABEL)
}
