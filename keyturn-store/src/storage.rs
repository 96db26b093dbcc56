//! Byte storage behind the file workflows.
//!
//! Workflows only see the [`Storage`] trait, so the same code runs against
//! the filesystem ([`FileStorage`]) and against memory ([`MemoryStorage`]).

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Access class of a written artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    /// Readable by the owner only: secret keys and decrypted plaintext.
    Owner,
    /// Readable by the owner's group: the rotation factor, so a separate
    /// rekey operator can apply it.
    Group,
    /// World readable: public keys, capsules, ciphertexts.
    Public,
}

impl Permission {
    /// Unix mode bits for this class.
    pub const fn mode(self) -> u32 {
        match self {
            Self::Owner => 0o600,
            Self::Group => 0o640,
            Self::Public => 0o644,
        }
    }
}

/// Reads and writes whole artifacts by path.
pub trait Storage {
    /// Reads the full contents at `path`.
    fn read(&self, path: &Path) -> StoreResult<Vec<u8>>;

    /// Replaces the contents at `path`. Readers never observe a partial write.
    fn write(&self, path: &Path, bytes: &[u8], permission: Permission) -> StoreResult<()>;

    /// Whether something is stored at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Filesystem-backed storage.
///
/// Writes land in a temporary file next to the destination, get their mode
/// set, and are then renamed over the destination.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileStorage;

impl FileStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FileStorage {
    fn read(&self, path: &Path) -> StoreResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| StoreError::io(path, e))
    }

    fn write(&self, path: &Path, bytes: &[u8], permission: Permission) -> StoreResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(path, e))?;
        tmp.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
        tmp.as_file().sync_all().map_err(|e| StoreError::io(path, e))?;
        set_mode(tmp.as_file(), permission).map_err(|e| StoreError::io(path, e))?;
        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

        debug!(path = %path.display(), len = bytes.len(), ?permission, "wrote file");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(unix)]
fn set_mode(file: &std::fs::File, permission: Permission) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(permission.mode()))
}

#[cfg(not(unix))]
fn set_mode(_file: &std::fs::File, _permission: Permission) -> std::io::Result<()> {
    Ok(())
}

/// In-memory storage. Paths are compared literally.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<HashMap<PathBuf, (Vec<u8>, Permission)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permission the entry at `path` was last written with.
    pub fn permission(&self, path: &Path) -> Option<Permission> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files.get(path).map(|(_, permission)| *permission)
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &Path) -> StoreResult<Vec<u8>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| StoreError::io(path, std::io::ErrorKind::NotFound.into()))
    }

    fn write(&self, path: &Path, bytes: &[u8], permission: Permission) -> StoreResult<()> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        files.insert(path.to_path_buf(), (bytes.to_vec(), permission));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }
}
