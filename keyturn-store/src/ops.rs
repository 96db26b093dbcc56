//! File-level workflows: keygen, keyrotate, rekey, encrypt, decrypt.
//!
//! Every workflow checks that its input files exist before doing any work,
//! and reports a missing file as [`StoreError::NotFound`].

use std::path::Path;

use keyturn_crypto::{Capsule, KeyPair, PublicKey};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::artifacts;
use crate::config::{DecryptPaths, EncryptPaths, KeyGenPaths, RekeyPaths, RotatePaths};
use crate::error::{StoreError, StoreResult};
use crate::storage::{Permission, Storage};

fn require(storage: &dyn Storage, path: &Path) -> StoreResult<()> {
    if storage.exists(path) {
        Ok(())
    } else {
        Err(StoreError::NotFound(path.to_path_buf()))
    }
}

/// Generates a key pair and writes both halves.
pub fn keygen(storage: &dyn Storage, paths: &KeyGenPaths) -> StoreResult<PublicKey> {
    let keypair = KeyPair::generate()?;

    artifacts::save_secret_key(storage, &paths.secret_key, &keypair.secret)?;
    artifacts::save_public_key(storage, &paths.public_key, &keypair.public)?;

    info!(
        secret_key = %paths.secret_key.display(),
        public_key = %paths.public_key.display(),
        "generated key pair"
    );
    Ok(keypair.public)
}

/// Replaces the secret key with a fresh one and writes the rotation factor
/// that realigns existing capsules.
///
/// The factor is written first, so a failure before the secret key is
/// replaced leaves the old key in place.
pub fn rotate(storage: &dyn Storage, paths: &RotatePaths) -> StoreResult<PublicKey> {
    require(storage, &paths.secret_key)?;

    let old = artifacts::load_secret_key(storage, &paths.secret_key)?;
    let rotation = keyturn_crypto::rotate(&old)?;

    artifacts::save_factor(storage, &paths.factor, &rotation.factor)?;
    artifacts::save_secret_key(storage, &paths.secret_key, &rotation.keypair.secret)?;
    artifacts::save_public_key(storage, &paths.public_key, &rotation.keypair.public)?;

    info!(
        secret_key = %paths.secret_key.display(),
        factor = %paths.factor.display(),
        public_key = %paths.public_key.display(),
        "rotated secret key"
    );
    Ok(rotation.keypair.public)
}

/// Applies a rotation factor to a capsule, rewriting the capsule in place.
///
/// Needs neither key. Applying the same factor twice misaligns the capsule.
pub fn rekey(storage: &dyn Storage, paths: &RekeyPaths) -> StoreResult<Capsule> {
    require(storage, &paths.factor)?;
    require(storage, &paths.capsule)?;

    let factor = artifacts::load_factor(storage, &paths.factor)?;
    let mut capsule = artifacts::load_capsule(storage, &paths.capsule)?;
    capsule.rekey_in_place(&factor);
    artifacts::save_capsule(storage, &paths.capsule, &capsule)?;

    info!(capsule = %paths.capsule.display(), "rekeyed capsule");
    Ok(capsule)
}

/// Encrypts the input file for a recipient, writing the ciphertext and its
/// capsule.
pub fn encrypt(storage: &dyn Storage, paths: &EncryptPaths) -> StoreResult<Capsule> {
    require(storage, &paths.recipient)?;
    require(storage, &paths.input)?;

    let recipient = artifacts::load_public_key(storage, &paths.recipient)?;
    let plaintext = Zeroizing::new(storage.read(&paths.input)?);
    debug!(input = %paths.input.display(), len = plaintext.len(), "read plaintext");

    let encrypted = keyturn_crypto::encrypt(&recipient, &plaintext)?;
    storage.write(&paths.output, &encrypted.blob, Permission::Public)?;
    artifacts::save_capsule(storage, &paths.capsule, &encrypted.capsule)?;

    info!(
        output = %paths.output.display(),
        capsule = %paths.capsule.display(),
        "encrypted file"
    );
    Ok(encrypted.capsule)
}

/// Decrypts the input file. Nothing is written unless the ciphertext
/// authenticates under the secret key and capsule.
pub fn decrypt(storage: &dyn Storage, paths: &DecryptPaths) -> StoreResult<usize> {
    require(storage, &paths.secret_key)?;
    require(storage, &paths.input)?;
    require(storage, &paths.capsule)?;

    let secret = artifacts::load_secret_key(storage, &paths.secret_key)?;
    let capsule = artifacts::load_capsule(storage, &paths.capsule)?;
    let blob = storage.read(&paths.input)?;

    let plaintext = Zeroizing::new(keyturn_crypto::decrypt(&secret, &capsule, &blob)?);
    storage.write(&paths.output, &plaintext, Permission::Owner)?;

    info!(output = %paths.output.display(), len = plaintext.len(), "decrypted file");
    Ok(plaintext.len())
}
