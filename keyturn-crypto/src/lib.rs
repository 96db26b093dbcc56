//! Rotatable hybrid file encryption for keyturn.
//!
//! Provides recipient-addressed file encryption using:
//! - ristretto255 for key pairs and ephemeral Diffie-Hellman
//! - HKDF-SHA256 to derive a per-file key from the shared group element
//! - XChaCha20-Poly1305 for authenticated encryption of the file body
//!
//! # Architecture
//!
//! Every encrypted file consists of two artifacts:
//!
//! 1. **Capsule**: the ephemeral point `e * G`. Together with the recipient's
//!    secret key it reproduces the shared secret.
//!
//! 2. **Blob**: `salt || nonce || ciphertext || tag`. Never modified after it
//!    is written.
//!
//! When the recipient rotates their secret key, [`rotate`] also yields a
//! [`RotationFactor`]. Applying it to a capsule with [`rekey`] realigns the
//! capsule to the new key, so:
//! - Old blobs stay readable without re-encrypting them
//! - The rekey holder never sees a secret key or any plaintext
//! - Capsules that were not rekeyed stop opening under the new key

pub mod capsule;
pub mod cipher;
mod error;
pub mod group;
pub mod hybrid;
pub mod key;

pub use capsule::{rekey, Capsule};
pub use cipher::{FileKey, FILE_KEY_LABEL, KEY_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use group::{POINT_SIZE, SCALAR_SIZE, SEED_SIZE};
pub use hybrid::{blob_len, decrypt, encrypt, Encrypted, HEADER_SIZE};
pub use key::{rotate, KeyPair, PublicKey, Rotation, RotationFactor, SecretKey, KEY_HEX_LEN};
