//! Group arithmetic over ristretto255.
//!
//! Thin layer over `curve25519-dalek` that fixes the encodings used by every
//! persisted artifact and turns the library's optional results into
//! [`CryptoError`]s. Ristretto gives a prime-order group with canonical,
//! non-malleable 32-byte encodings, so decoding doubles as validation.
//!
//! All arithmetic here is constant time with respect to secret values; that
//! property comes from `curve25519-dalek` and is not re-implemented.

use curve25519_dalek::ristretto::CompressedRistretto;
use rand::TryRngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

pub use curve25519_dalek::{RistrettoPoint as Point, Scalar};

/// Size of a canonical scalar encoding in bytes.
pub const SCALAR_SIZE: usize = 32;
/// Size of a canonical point encoding in bytes.
pub const POINT_SIZE: usize = 32;
/// Size of the uniform seed reduced into a scalar.
pub const SEED_SIZE: usize = 64;

/// Fills `buf` from the operating system CSPRNG.
///
/// Failure is fatal for the calling operation and is never retried.
pub fn fill_random(buf: &mut [u8]) -> CryptoResult<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))
}

/// Samples a fresh 64-byte seed. The buffer is wiped when dropped.
pub fn random_seed() -> CryptoResult<Zeroizing<[u8; SEED_SIZE]>> {
    let mut seed = Zeroizing::new([0u8; SEED_SIZE]);
    fill_random(&mut seed[..])?;
    Ok(seed)
}

/// Reduces a 64-byte uniform seed modulo the group order.
///
/// The wide reduction keeps the result statistically uniform; a 32-byte
/// reduction would be biased.
pub fn scalar_from_seed(seed: &[u8; SEED_SIZE]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(seed)
}

/// Samples a uniformly random scalar from a fresh seed.
pub fn random_scalar() -> CryptoResult<Scalar> {
    let seed = random_seed()?;
    Ok(scalar_from_seed(&seed))
}

/// `s * G` for the ristretto255 generator `G`.
pub fn base_mult(s: &Scalar) -> Point {
    Point::mul_base(s)
}

/// `s * p`.
pub fn scalar_mult(s: &Scalar, p: &Point) -> Point {
    s * p
}

/// `a * b` in the scalar field.
pub fn scalar_mul(a: &Scalar, b: &Scalar) -> Scalar {
    a * b
}

/// Returns true if `s` is the zero scalar. The comparison is constant time.
pub fn is_zero(s: &Scalar) -> bool {
    *s == Scalar::ZERO
}

/// Multiplicative inverse of `s`.
///
/// Zero has no inverse; it is rejected with [`CryptoError::InvalidScalar`]
/// instead of silently mapping to zero.
pub fn invert(s: &Scalar) -> CryptoResult<Scalar> {
    if is_zero(s) {
        return Err(CryptoError::InvalidScalar);
    }
    Ok(s.invert())
}

/// Canonical little-endian encoding of a scalar.
pub fn encode_scalar(s: &Scalar) -> [u8; SCALAR_SIZE] {
    s.to_bytes()
}

/// Decodes a scalar, rejecting wrong lengths and values `>= l`.
pub fn decode_scalar(bytes: &[u8]) -> CryptoResult<Scalar> {
    let arr: [u8; SCALAR_SIZE] = bytes.try_into().map_err(|_| {
        CryptoError::Decode(format!(
            "scalar must be {SCALAR_SIZE} bytes, got {}",
            bytes.len()
        ))
    })?;

    Option::<Scalar>::from(Scalar::from_canonical_bytes(arr))
        .ok_or_else(|| CryptoError::Decode("non-canonical scalar encoding".to_string()))
}

/// Canonical compressed encoding of a point.
pub fn encode_point(p: &Point) -> [u8; POINT_SIZE] {
    p.compress().to_bytes()
}

/// Decodes a point, rejecting wrong lengths and any non-canonical encoding.
pub fn decode_point(bytes: &[u8]) -> CryptoResult<Point> {
    let arr: [u8; POINT_SIZE] = bytes.try_into().map_err(|_| {
        CryptoError::Decode(format!(
            "point must be {POINT_SIZE} bytes, got {}",
            bytes.len()
        ))
    })?;

    CompressedRistretto(arr)
        .decompress()
        .ok_or_else(|| CryptoError::Decode("non-canonical point encoding".to_string()))
}
