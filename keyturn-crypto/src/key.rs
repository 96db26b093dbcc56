//! Key management: key pairs, rotation, and their persisted encodings.
//!
//! A secret key is a non-zero scalar `s`, its public key is `s * G`. Rotating
//! a key samples a fresh `s'` and produces the factor `f = s * s'^-1`, which
//! lets a rekey holder realign existing capsules to `s'` (see
//! [`crate::capsule`]).
//!
//! Secret scalars and rotation factors are wiped on drop and never printed.

use curve25519_dalek::traits::Identity;
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, CryptoResult};
use crate::group::{self, Point, Scalar, POINT_SIZE, SCALAR_SIZE, SEED_SIZE};

/// Length of a hex-encoded key.
pub const KEY_HEX_LEN: usize = 2 * SCALAR_SIZE;

/// Upper bound on resampling when the CSPRNG yields a zero scalar.
const MAX_SAMPLE_ATTEMPTS: usize = 4;

/// Samples a fresh scalar, resampling the (negligible) zero case.
pub(crate) fn random_nonzero_scalar() -> CryptoResult<Scalar> {
    sample_nonzero(group::random_scalar)
}

/// Draws until a non-zero scalar appears. Draw errors are returned as-is.
fn sample_nonzero(mut draw: impl FnMut() -> CryptoResult<Scalar>) -> CryptoResult<Scalar> {
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let s = draw()?;
        if !group::is_zero(&s) {
            return Ok(s);
        }
        warn!("sampled zero scalar, resampling");
    }
    Err(CryptoError::InvalidScalar)
}

/// A recipient's long-term secret scalar.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Scalar);

impl SecretKey {
    /// Generates a new secret key from 64 bytes of OS randomness.
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self(random_nonzero_scalar()?))
    }

    /// Derives a secret key from a 64-byte uniform seed.
    pub fn from_seed(seed: &[u8; SEED_SIZE]) -> CryptoResult<Self> {
        Self::from_scalar(group::scalar_from_seed(seed))
    }

    /// Wraps a scalar, rejecting zero.
    pub fn from_scalar(scalar: Scalar) -> CryptoResult<Self> {
        if group::is_zero(&scalar) {
            return Err(CryptoError::InvalidScalar);
        }
        Ok(Self(scalar))
    }

    /// Decodes a canonical 32-byte scalar encoding.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        Self::from_scalar(group::decode_scalar(bytes)?)
    }

    /// Parses the hex form stored in secret key files.
    ///
    /// Leading and trailing whitespace (e.g. a newline added by an editor)
    /// is ignored.
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        let bytes = Zeroizing::new(hex::decode(hex_str.trim())?);
        Self::from_bytes(&bytes)
    }

    /// Returns the canonical scalar encoding.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_SIZE]> {
        Zeroizing::new(group::encode_scalar(&self.0))
    }

    /// Returns the lowercase hex encoding used for secret key files.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes().as_slice()))
    }

    /// Computes the matching public key `s * G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(group::base_mult(&self.0))
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// A recipient's public group element.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(Point);

impl PublicKey {
    /// Decodes a canonical 32-byte point encoding.
    ///
    /// The identity element is rejected: no secret key maps to it, and
    /// encrypting to it would make the shared secret public.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let point = group::decode_point(bytes)?;
        if point == Point::identity() {
            return Err(CryptoError::Decode("public key is the identity element".to_string()));
        }
        Ok(Self(point))
    }

    /// Parses the hex form stored in public key files.
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        Self::from_bytes(&hex::decode(hex_str.trim())?)
    }

    /// Returns the canonical point encoding.
    pub fn to_bytes(&self) -> [u8; POINT_SIZE] {
        group::encode_point(&self.0)
    }

    /// Returns the lowercase hex encoding used for public key files.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub(crate) fn point(&self) -> &Point {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// A secret key together with its public key.
///
/// Invariant: `public == secret * G`.
pub struct KeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl KeyPair {
    /// Generates a fresh key pair.
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self::from_secret(SecretKey::generate()?))
    }

    /// Rebuilds a key pair from a stored secret key.
    pub fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }
}

/// Scalar `f = s_old * s_new^-1` relating two generations of a secret key.
///
/// Whoever holds it can realign capsules from the old key to the new one,
/// but learns neither key and never sees plaintext.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RotationFactor(Scalar);

impl RotationFactor {
    /// Computes the factor mapping capsules for `old` onto `new`.
    pub fn between(old: &SecretKey, new: &SecretKey) -> CryptoResult<Self> {
        let inverse = Zeroizing::new(group::invert(new.scalar())?);
        Ok(Self(group::scalar_mul(old.scalar(), &inverse)))
    }

    /// Decodes the raw 32-byte encoding stored in factor files, rejecting zero.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let scalar = group::decode_scalar(bytes)?;
        if group::is_zero(&scalar) {
            return Err(CryptoError::InvalidScalar);
        }
        Ok(Self(scalar))
    }

    /// Returns the raw canonical encoding.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_SIZE]> {
        Zeroizing::new(group::encode_scalar(&self.0))
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.0
    }
}

impl std::fmt::Debug for RotationFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RotationFactor([REDACTED])")
    }
}

/// Output of a key rotation: the next key pair and the factor that carries
/// existing capsules over to it.
///
/// The caller persists all three values, replaces the old secret, and is
/// responsible for discarding the old secret key.
pub struct Rotation {
    pub keypair: KeyPair,
    pub factor: RotationFactor,
}

/// Rotates `old` to a freshly sampled secret key.
pub fn rotate(old: &SecretKey) -> CryptoResult<Rotation> {
    let secret = SecretKey::generate()?;
    let factor = RotationFactor::between(old, &secret)?;
    Ok(Rotation {
        keypair: KeyPair::from_secret(secret),
        factor,
    })
}
