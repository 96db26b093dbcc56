//! On-disk encodings of keys, factors and capsules.
//!
//! Keys are stored as lowercase hex without a trailing newline; factors and
//! capsules are stored as their raw 32-byte encodings.

use std::path::Path;

use keyturn_crypto::{Capsule, CryptoError, PublicKey, RotationFactor, SecretKey};
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::StoreResult;
use crate::storage::{Permission, Storage};

pub fn load_secret_key(storage: &dyn Storage, path: &Path) -> StoreResult<SecretKey> {
    let bytes = Zeroizing::new(storage.read(path)?);
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| CryptoError::Decode("secret key file is not text".into()))?;
    SecretKey::from_hex(text).map_err(|e| rejected(path, e))
}

pub fn save_secret_key(storage: &dyn Storage, path: &Path, key: &SecretKey) -> StoreResult<()> {
    storage.write(path, key.to_hex().as_bytes(), Permission::Owner)
}

pub fn load_public_key(storage: &dyn Storage, path: &Path) -> StoreResult<PublicKey> {
    let bytes = storage.read(path)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| CryptoError::Decode("public key file is not text".into()))?;
    PublicKey::from_hex(text).map_err(|e| rejected(path, e))
}

pub fn save_public_key(storage: &dyn Storage, path: &Path, key: &PublicKey) -> StoreResult<()> {
    storage.write(path, key.to_hex().as_bytes(), Permission::Public)
}

pub fn load_factor(storage: &dyn Storage, path: &Path) -> StoreResult<RotationFactor> {
    let bytes = Zeroizing::new(storage.read(path)?);
    RotationFactor::from_bytes(&bytes).map_err(|e| rejected(path, e))
}

pub fn save_factor(storage: &dyn Storage, path: &Path, factor: &RotationFactor) -> StoreResult<()> {
    storage.write(path, factor.to_bytes().as_slice(), Permission::Group)
}

pub fn load_capsule(storage: &dyn Storage, path: &Path) -> StoreResult<Capsule> {
    let bytes = storage.read(path)?;
    Capsule::from_bytes(&bytes).map_err(|e| rejected(path, e))
}

pub fn save_capsule(storage: &dyn Storage, path: &Path, capsule: &Capsule) -> StoreResult<()> {
    storage.write(path, &capsule.to_bytes(), Permission::Public)
}

fn rejected(path: &Path, err: CryptoError) -> crate::error::StoreError {
    warn!(path = %path.display(), error = %err, "rejected stored artifact");
    err.into()
}
