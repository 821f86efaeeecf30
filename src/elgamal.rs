//! EC-ElGamal encryption over secp256k1.
//!
//! A message is an integer below the curve's coordinate-field prime. The
//! ciphertext masks it with the y-coordinate of a Diffie-Hellman point, so
//! the matching private key (or a quorum reconstructing it) unmasks it with
//! one modular inverse.

use k256::{
    elliptic_curve::{
        rand_core::{CryptoRng, RngCore},
        sec1::ToEncodedPoint,
        Field,
    },
    AffinePoint, ProjectivePoint, Scalar,
};
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::ThresholdError;

/// Largest payload accepted by [`encode_message`]: one length byte plus the
/// payload must stay below the 32-byte field modulus.
pub const MAX_MESSAGE_LEN: usize = 30;

/// Coordinate-field prime of secp256k1, `2^256 - 2^32 - 977`.
pub(crate) fn base_field_modulus() -> BigUint {
    (BigUint::one() << 256u32) - (BigUint::one() << 32u32) - 977u32
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ciphertext {
    /// Ephemeral point `k * G`.
    pub ephemeral: AffinePoint,
    /// Masked payload `m * y(k * P) mod p`.
    pub mask: BigUint,
}

/// Encrypts `message` under `public_key`.
///
/// A fresh nonce is drawn from `rng` on every call, so two encryptions of
/// the same message never share an ephemeral point.
pub fn encrypt<R: RngCore + CryptoRng>(
    public_key: &ProjectivePoint,
    message: &BigUint,
    rng: &mut R,
) -> Result<Ciphertext, ThresholdError> {
    let modulus = base_field_modulus();
    if *message >= modulus {
        return Err(ThresholdError::MessageOutOfRange);
    }

    let nonce = random_nonzero_scalar(rng);
    let ephemeral = ProjectivePoint::GENERATOR * nonce;
    let mask_point = *public_key * nonce;
    let mask = (message * mask_coordinate(&mask_point)?) % &modulus;

    Ok(Ciphertext {
        ephemeral: ephemeral.to_affine(),
        mask,
    })
}

/// Decrypts `cipher` with the private key matching the public key it was
/// encrypted under.
///
/// The unmasking inverse is computed modulo the field prime by Fermat's
/// little theorem; the arithmetic is exact end to end.
pub fn decrypt(secret_key: &Scalar, cipher: &Ciphertext) -> Result<BigUint, ThresholdError> {
    let modulus = base_field_modulus();
    let mask_point = ProjectivePoint::from(cipher.ephemeral) * *secret_key;
    let y = mask_coordinate(&mask_point)?;
    let y_inv = y.modpow(&(&modulus - 2u32), &modulus);
    Ok((&cipher.mask * y_inv) % &modulus)
}

/// Packs a byte string into an integer below the field modulus: one length
/// byte followed by the payload, interpreted big-endian.
///
/// Unlike raw byte packing this is unambiguous for payloads with leading
/// zero bytes, and it round-trips through [`decode_message`] exactly.
pub fn encode_message(message: &[u8]) -> Result<BigUint, ThresholdError> {
    if message.len() > MAX_MESSAGE_LEN {
        return Err(ThresholdError::MessageTooLong {
            len: message.len(),
            max: MAX_MESSAGE_LEN,
        });
    }
    let mut bytes = Vec::with_capacity(message.len() + 1);
    bytes.push(message.len() as u8);
    bytes.extend_from_slice(message);
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Inverse of [`encode_message`].
pub fn decode_message(value: &BigUint) -> Result<Vec<u8>, ThresholdError> {
    if value.is_zero() {
        // The empty message: its single length byte of zero is stripped by
        // the big-endian integer conversion.
        return Ok(Vec::new());
    }
    let bytes = value.to_bytes_be();
    let declared = usize::from(bytes[0]);
    let payload = &bytes[1..];
    if payload.len() != declared {
        return Err(ThresholdError::Parse(format!(
            "message encoding declares {declared} bytes but carries {}",
            payload.len()
        )));
    }
    Ok(payload.to_vec())
}

fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let k = Scalar::random(&mut *rng);
        if !bool::from(k.is_zero()) {
            return k;
        }
    }
}

/// The y-coordinate of a point as an integer mod p.
///
/// The identity has no affine coordinates and a zero coordinate cannot be
/// inverted, so both surface as a degenerate mask.
fn mask_coordinate(point: &ProjectivePoint) -> Result<BigUint, ThresholdError> {
    let encoded = point.to_affine().to_encoded_point(false);
    let y = encoded.y().ok_or(ThresholdError::DegenerateMask)?;
    let y = BigUint::from_bytes_be(y);
    if y.is_zero() {
        return Err(ThresholdError::DegenerateMask);
    }
    Ok(y)
}
