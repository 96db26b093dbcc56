//! Default artifact locations and per-workflow path sets.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

/// Default file names, optionally loaded from a JSON file.
///
/// Relative `factor` and `public_key` entries are resolved next to the secret
/// key by key generation and rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub secret_key: PathBuf,
    pub public_key: PathBuf,
    pub recipient: PathBuf,
    pub factor: PathBuf,
    /// Appended to a ciphertext path to name its capsule.
    pub capsule_suffix: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            secret_key: PathBuf::from("secretkey"),
            public_key: PathBuf::from("publickey"),
            recipient: PathBuf::from("recipient"),
            factor: PathBuf::from("factor"),
            capsule_suffix: ".encap".to_string(),
        }
    }
}

impl Defaults {
    /// Loads defaults from a JSON document. Missing fields keep their
    /// built-in values.
    pub fn load(storage: &dyn Storage, path: &Path) -> StoreResult<Self> {
        if !storage.exists(path) {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let defaults: Self = serde_json::from_slice(&storage.read(path)?)?;
        defaults.validate()?;
        Ok(defaults)
    }

    fn validate(&self) -> StoreResult<()> {
        if self.capsule_suffix.is_empty() {
            return Err(StoreError::Config("capsule_suffix must not be empty".to_string()));
        }
        for (name, path) in [
            ("secret_key", &self.secret_key),
            ("public_key", &self.public_key),
            ("recipient", &self.recipient),
            ("factor", &self.factor),
        ] {
            if path.as_os_str().is_empty() {
                return Err(StoreError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// Capsule path paired with a ciphertext path: `<ciphertext><suffix>`.
    pub fn capsule_for(&self, ciphertext: &Path) -> PathBuf {
        let mut name = OsString::from(ciphertext.as_os_str());
        name.push(&self.capsule_suffix);
        PathBuf::from(name)
    }

    /// Public key file in the directory holding `secret_key`.
    pub fn public_key_beside(&self, secret_key: &Path) -> PathBuf {
        beside(secret_key, &self.public_key)
    }

    /// Factor file in the directory holding `secret_key`.
    pub fn factor_beside(&self, secret_key: &Path) -> PathBuf {
        beside(secret_key, &self.factor)
    }
}

/// Resolves `file` against the directory holding `secret_key`. Absolute
/// `file` paths are returned unchanged.
fn beside(secret_key: &Path, file: &Path) -> PathBuf {
    match secret_key.parent() {
        Some(dir) => dir.join(file),
        None => file.to_path_buf(),
    }
}

/// Files written by key generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenPaths {
    pub secret_key: PathBuf,
    pub public_key: PathBuf,
}

/// Files read and written by key rotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotatePaths {
    /// Read, then replaced with the new secret key.
    pub secret_key: PathBuf,
    pub public_key: PathBuf,
    pub factor: PathBuf,
}

/// Files used by capsule rekeying. The capsule is rewritten in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RekeyPaths {
    pub factor: PathBuf,
    pub capsule: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptPaths {
    pub recipient: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub capsule: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptPaths {
    pub secret_key: PathBuf,
    pub capsule: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Permission};
    use pretty_assertions::assert_eq;

    #[test]
    fn built_in_defaults() {
        let d = Defaults::default();
        assert_eq!(d.secret_key, PathBuf::from("secretkey"));
        assert_eq!(d.public_key, PathBuf::from("publickey"));
        assert_eq!(d.recipient, PathBuf::from("recipient"));
        assert_eq!(d.factor, PathBuf::from("factor"));
        assert_eq!(d.capsule_suffix, ".encap");
    }

    #[test]
    fn capsule_suffix_is_appended() {
        let d = Defaults::default();
        assert_eq!(
            d.capsule_for(Path::new("out/report.bin")),
            PathBuf::from("out/report.bin.encap")
        );
        assert_eq!(d.capsule_for(Path::new("noext")), PathBuf::from("noext.encap"));
    }

    #[test]
    fn beside_uses_secret_key_directory() {
        let d = Defaults::default();
        assert_eq!(
            d.factor_beside(Path::new("/keys/alice/secretkey")),
            PathBuf::from("/keys/alice/factor")
        );
        assert_eq!(
            d.public_key_beside(Path::new("/keys/alice/secretkey")),
            PathBuf::from("/keys/alice/publickey")
        );
        assert_eq!(d.factor_beside(Path::new("secretkey")), PathBuf::from("factor"));
    }

    #[test]
    fn absolute_defaults_ignore_secret_key_directory() {
        let d = Defaults {
            factor: PathBuf::from("/elsewhere/factor"),
            ..Defaults::default()
        };
        assert_eq!(
            d.factor_beside(Path::new("/keys/secretkey")),
            PathBuf::from("/elsewhere/factor")
        );
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let storage = MemoryStorage::new();
        let path = Path::new("keyturn.json");
        let json = br#"{"capsule_suffix": ".cap", "factor": "rot/factor"}"#;
        storage.write(path, json, Permission::Public).unwrap();

        let d = Defaults::load(&storage, path).unwrap();
        assert_eq!(d.capsule_suffix, ".cap");
        assert_eq!(d.factor, PathBuf::from("rot/factor"));
        assert_eq!(d.secret_key, PathBuf::from("secretkey"));
    }

    #[test]
    fn empty_suffix_rejected() {
        let storage = MemoryStorage::new();
        let path = Path::new("keyturn.json");
        storage.write(path, br#"{"capsule_suffix": ""}"#, Permission::Public).unwrap();

        assert!(matches!(Defaults::load(&storage, path), Err(StoreError::Config(_))));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let storage = MemoryStorage::new();
        let path = Path::new("keyturn.json");
        storage.write(path, b"{not json", Permission::Public).unwrap();

        assert!(matches!(Defaults::load(&storage, path), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn missing_config_is_not_found() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            Defaults::load(&storage, Path::new("absent.json")),
            Err(StoreError::NotFound(_))
        ));
    }
}
