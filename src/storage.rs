//! Textual persistence of threshold parameters, shares and ciphertexts.
//!
//! Points are stored as comma separated decimal coordinates, one record per
//! line: `public.csv` holds the public key followed by the commitment set,
//! and each share lives in its own `share_<i>.txt`. Loading validates every
//! record; off-curve points, non-canonical scalars and non-numeric text are
//! rejected rather than defaulted.

use std::fs;
use std::path::Path;

use k256::{
    elliptic_curve::{
        sec1::{FromEncodedPoint, ToEncodedPoint},
        PrimeField,
    },
    AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar,
};
use num_bigint::BigUint;

use crate::elgamal::Ciphertext;
use crate::error::ThresholdError;
use crate::keygen::ThresholdSetup;
use crate::shamir::{reconstruct_key, SecretShare};

pub const PUBLIC_FILENAME: &str = "public.csv";

fn share_filename(index: u32) -> String {
    format!("share_{index}.txt")
}

/// The decimal affine coordinates of a point.
pub fn point_coordinates(point: &AffinePoint) -> Result<(String, String), ThresholdError> {
    let encoded = point.to_encoded_point(false);
    match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => Ok((
            BigUint::from_bytes_be(x).to_string(),
            BigUint::from_bytes_be(y).to_string(),
        )),
        // The identity has no affine coordinates and is never persisted.
        _ => Err(ThresholdError::InvalidPoint),
    }
}

/// Formats a point as a decimal `x,y` record.
pub fn point_to_decimal(point: &AffinePoint) -> Result<String, ThresholdError> {
    let (x, y) = point_coordinates(point)?;
    Ok(format!("{x},{y}"))
}

/// Parses a decimal `x,y` record, enforcing curve membership.
pub fn point_from_decimal(record: &str) -> Result<AffinePoint, ThresholdError> {
    let (x, y) = record.trim().split_once(',').ok_or_else(|| {
        ThresholdError::Parse(format!("expected an `x,y` point record, got {record:?}"))
    })?;
    let x = decimal_to_field_bytes(x)?;
    let y = decimal_to_field_bytes(y)?;
    let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
    Option::from(AffinePoint::from_encoded_point(&encoded)).ok_or(ThresholdError::InvalidPoint)
}

pub fn scalar_to_decimal(scalar: &Scalar) -> String {
    BigUint::from_bytes_be(&scalar.to_bytes()).to_string()
}

/// Parses a decimal scalar, enforcing that it is canonical mod the group
/// order.
pub fn scalar_from_decimal(record: &str) -> Result<Scalar, ThresholdError> {
    let bytes = decimal_to_field_bytes(record)?;
    Option::from(Scalar::from_repr(bytes)).ok_or(ThresholdError::InvalidScalar)
}

fn decimal_to_field_bytes(record: &str) -> Result<FieldBytes, ThresholdError> {
    let value = record
        .trim()
        .parse::<BigUint>()
        .map_err(|_| ThresholdError::Parse(format!("non-numeric field element {record:?}")))?;
    let raw = value.to_bytes_be();
    if raw.len() > 32 {
        return Err(ThresholdError::Parse(format!(
            "field element needs {} bytes, at most 32 allowed",
            raw.len()
        )));
    }
    let mut bytes = FieldBytes::default();
    bytes[32 - raw.len()..].copy_from_slice(&raw);
    Ok(bytes)
}

/// Writes a dealer run under `dir`: `public.csv` with the public key and
/// the commitment set, plus one `share_<i>.txt` per participant.
pub fn save_params(dir: &Path, setup: &ThresholdSetup<ProjectivePoint>) -> Result<(), ThresholdError> {
    fs::create_dir_all(dir)?;

    let mut public = String::new();
    public.push_str(&point_to_decimal(&setup.key_pair.public().to_affine())?);
    public.push('\n');
    for commitment in &setup.vss.commitments {
        public.push_str(&point_to_decimal(&commitment.to_affine())?);
        public.push('\n');
    }
    fs::write(dir.join(PUBLIC_FILENAME), public)?;

    for share in &setup.shares {
        fs::write(
            dir.join(share_filename(share.index)),
            scalar_to_decimal(&share.value),
        )?;
    }
    Ok(())
}

/// Parameters recovered from disk: the public key, the commitment set and
/// the consecutive run of share files found under the directory.
#[derive(Clone, Debug)]
pub struct LoadedParams {
    pub public_key: AffinePoint,
    pub commitments: Vec<ProjectivePoint>,
    pub shares: Vec<SecretShare<Scalar>>,
}

impl LoadedParams {
    /// Recovers the master key from the loaded shares. The commitment count
    /// is the threshold the stored layout implies.
    pub fn reconstruct_key(&self) -> Result<Scalar, ThresholdError> {
        reconstruct_key(&self.shares, self.commitments.len())
    }
}

/// Reads back what [`save_params`] wrote, validating every record.
pub fn load_params(dir: &Path) -> Result<LoadedParams, ThresholdError> {
    let public = fs::read_to_string(dir.join(PUBLIC_FILENAME))?;
    let mut lines = public.lines().filter(|line| !line.trim().is_empty());

    let public_key = point_from_decimal(lines.next().ok_or_else(|| {
        ThresholdError::Parse("public.csv is missing the public key record".into())
    })?)?;
    let commitments = lines
        .map(|line| point_from_decimal(line).map(ProjectivePoint::from))
        .collect::<Result<Vec<_>, _>>()?;
    if commitments.is_empty() {
        return Err(ThresholdError::Parse(
            "public.csv holds no commitment records".into(),
        ));
    }

    let mut shares = Vec::new();
    let mut index = 1u32;
    loop {
        let path = dir.join(share_filename(index));
        if !path.is_file() {
            break;
        }
        let text = fs::read_to_string(path)?;
        shares.push(SecretShare {
            index,
            value: scalar_from_decimal(&text)?,
        });
        index += 1;
    }

    Ok(LoadedParams {
        public_key,
        commitments,
        shares,
    })
}

/// Writes a ciphertext as a single `x,y,c` line.
pub fn save_ciphertext(path: &Path, cipher: &Ciphertext) -> Result<(), ThresholdError> {
    let point = point_to_decimal(&cipher.ephemeral)?;
    fs::write(path, format!("{point},{}", cipher.mask))?;
    Ok(())
}

/// Reads back what [`save_ciphertext`] wrote.
pub fn load_ciphertext(path: &Path) -> Result<Ciphertext, ThresholdError> {
    let text = fs::read_to_string(path)?;
    let mut parts = text.trim().splitn(3, ',');
    let (x, y, mask) = match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), Some(mask)) => (x, y, mask),
        _ => {
            return Err(ThresholdError::Parse(
                "ciphertext record must be `x,y,c`".into(),
            ))
        }
    };
    let ephemeral = point_from_decimal(&format!("{x},{y}"))?;
    let mask = mask
        .trim()
        .parse::<BigUint>()
        .map_err(|_| ThresholdError::Parse(format!("non-numeric mask {mask:?}")))?;
    Ok(Ciphertext { ephemeral, mask })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::{decrypt, encrypt};
    use crate::keygen::generate_threshold_parameters;
    use rand::rngs::OsRng;
    use tempfile::tempdir;

    #[test]
    fn params_roundtrip() {
        let dir = tempdir().unwrap();
        let setup = generate_threshold_parameters::<ProjectivePoint, _>(3, 5, &mut OsRng).unwrap();
        save_params(dir.path(), &setup).unwrap();

        let loaded = load_params(dir.path()).unwrap();
        assert_eq!(loaded.public_key, setup.key_pair.public().to_affine());
        assert_eq!(loaded.commitments, setup.vss.commitments);
        assert_eq!(loaded.shares, setup.shares);
        assert_eq!(&loaded.reconstruct_key().unwrap(), setup.key_pair.secret());
    }

    #[test]
    fn point_codec_roundtrip() {
        let setup = generate_threshold_parameters::<ProjectivePoint, _>(2, 2, &mut OsRng).unwrap();
        let point = setup.key_pair.public().to_affine();
        let record = point_to_decimal(&point).unwrap();
        assert_eq!(point_from_decimal(&record).unwrap(), point);
    }

    #[test]
    fn off_curve_point_is_rejected() {
        let err = point_from_decimal("1,1").unwrap_err();
        assert!(matches!(err, ThresholdError::InvalidPoint));
    }

    #[test]
    fn junk_records_are_rejected() {
        assert!(matches!(
            point_from_decimal("12345").unwrap_err(),
            ThresholdError::Parse(_)
        ));
        assert!(matches!(
            point_from_decimal("12a,45").unwrap_err(),
            ThresholdError::Parse(_)
        ));
        assert!(matches!(
            scalar_from_decimal("not-a-number").unwrap_err(),
            ThresholdError::Parse(_)
        ));
    }

    #[test]
    fn non_canonical_scalar_is_rejected() {
        // 2^256 - 1 exceeds the group order.
        let oversized = ((BigUint::from(1u8) << 256u32) - 1u8).to_string();
        assert!(matches!(
            scalar_from_decimal(&oversized).unwrap_err(),
            ThresholdError::InvalidScalar
        ));
    }

    #[test]
    fn truncated_public_file_is_rejected() {
        let dir = tempdir().unwrap();
        let setup = generate_threshold_parameters::<ProjectivePoint, _>(2, 3, &mut OsRng).unwrap();
        save_params(dir.path(), &setup).unwrap();

        let public = dir.path().join(PUBLIC_FILENAME);
        let first_line = fs::read_to_string(&public)
            .unwrap()
            .lines()
            .next()
            .unwrap()
            .to_string();
        fs::write(&public, first_line).unwrap();

        assert!(matches!(
            load_params(dir.path()).unwrap_err(),
            ThresholdError::Parse(_)
        ));
    }

    #[test]
    fn ciphertext_roundtrip() {
        let dir = tempdir().unwrap();
        let setup = generate_threshold_parameters::<ProjectivePoint, _>(2, 3, &mut OsRng).unwrap();
        let cipher = encrypt(
            &setup.key_pair.public(),
            &BigUint::from(55555u32),
            &mut OsRng,
        )
        .unwrap();

        let path = dir.path().join("ciphertext.txt");
        save_ciphertext(&path, &cipher).unwrap();
        let loaded = load_ciphertext(&path).unwrap();
        assert_eq!(loaded, cipher);
        assert_eq!(
            decrypt(setup.key_pair.secret(), &loaded).unwrap(),
            BigUint::from(55555u32)
        );
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ciphertext.txt");
        fs::write(&path, "123,456").unwrap();
        assert!(matches!(
            load_ciphertext(&path).unwrap_err(),
            ThresholdError::Parse(_)
        ));
    }
}
