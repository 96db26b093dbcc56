//! Storage and file workflows for keyturn.
//!
//! The crypto core never touches the filesystem. This crate reads and writes
//! its artifacts through a [`Storage`] backend and wires them into the five
//! user-facing workflows in [`ops`]:
//!
//! | workflow | reads | writes |
//! |---|---|---|
//! | keygen | | secret key, public key |
//! | keyrotate | secret key | factor, secret key, public key |
//! | rekey | factor, capsule | capsule |
//! | encrypt | recipient public key, plaintext | ciphertext, capsule |
//! | decrypt | secret key, capsule, ciphertext | plaintext |
//!
//! Callers supply every path explicitly through the `*Paths` structs in
//! [`config`]; [`Defaults`] only helps a front end fill them in.

pub mod artifacts;
pub mod config;
mod error;
pub mod ops;
pub mod storage;

pub use config::{DecryptPaths, Defaults, EncryptPaths, KeyGenPaths, RekeyPaths, RotatePaths};
pub use error::{StoreError, StoreResult};
pub use storage::{FileStorage, MemoryStorage, Permission, Storage};
