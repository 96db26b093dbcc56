//! Capsules and capsule rekeying.
//!
//! A capsule is the group element `C = e * G` published next to a ciphertext.
//! The recipient recovers the shared secret as `s * C`. After the recipient
//! rotates `s` to `s'`, a holder of the rotation factor `f = s * s'^-1`
//! rewrites the capsule to `C' = f * C`, and then `s' * C' == s * C`: the
//! same shared secret, hence the same file key, without touching the
//! ciphertext.
//!
//! Rekeying is pure group arithmetic. It cannot tell whether a factor belongs
//! to the capsule's current key generation; applying a factor twice or out of
//! order produces a capsule that simply fails authentication at decrypt time.

use curve25519_dalek::traits::Identity;

use crate::error::{CryptoError, CryptoResult};
use crate::group::{self, Point, POINT_SIZE};
use crate::key::RotationFactor;

/// Encapsulated ephemeral key material for one ciphertext.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Capsule(Point);

impl Capsule {
    pub(crate) fn from_point(point: Point) -> Self {
        Self(point)
    }

    /// Decodes the raw 32-byte encoding stored in capsule files.
    ///
    /// The identity element is rejected; honest capsules are never the
    /// identity and rekeying with a non-zero factor cannot produce it.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let point = group::decode_point(bytes)?;
        if point == Point::identity() {
            return Err(CryptoError::Decode("capsule is the identity element".to_string()));
        }
        Ok(Self(point))
    }

    /// Returns the raw canonical encoding.
    pub fn to_bytes(&self) -> [u8; POINT_SIZE] {
        group::encode_point(&self.0)
    }

    /// Realigns this capsule to the rotated key in place.
    pub fn rekey_in_place(&mut self, factor: &RotationFactor) {
        *self = rekey(factor, self);
    }

    pub(crate) fn point(&self) -> &Point {
        &self.0
    }
}

impl std::fmt::Debug for Capsule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Capsule({})", hex::encode(self.to_bytes()))
    }
}

/// Returns `f * C`, the capsule aligned to the rotated secret key.
pub fn rekey(factor: &RotationFactor, capsule: &Capsule) -> Capsule {
    Capsule(group::scalar_mult(factor.scalar(), &capsule.0))
}
