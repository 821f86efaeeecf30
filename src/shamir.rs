//! Polynomial secret splitting and Lagrange reconstruction in the scalar
//! field of a prime-order group.

use k256::elliptic_curve::{
    rand_core::{CryptoRng, RngCore},
    Field, PrimeField,
};
use zeroize::{Zeroize, Zeroizing};

use crate::error::ThresholdError;

/// One evaluation of the dealer polynomial: `value = f(index)`.
///
/// Indices are 1-based. `f(0)` is the secret itself, so index 0 is never
/// issued as a share.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecretShare<S> {
    pub index: u32,
    pub value: S,
}

/// Samples the dealer polynomial `f(x) = secret + c1*x + ... + c_{t-1}*x^{t-1}`.
///
/// The coefficient vector is wiped when dropped; only evaluations and
/// commitments may outlive the split.
pub(crate) fn sample_polynomial<F, R>(secret: &F, t: usize, rng: &mut R) -> Zeroizing<Vec<F>>
where
    F: PrimeField + Zeroize,
    R: RngCore + CryptoRng,
{
    let mut coefficients = Zeroizing::new(Vec::with_capacity(t));
    coefficients.push(*secret);
    for _ in 1..t {
        coefficients.push(F::random(&mut *rng));
    }
    coefficients
}

/// Horner evaluation of `f(x)` over the coefficient list `[c0, c1, ...]`.
pub(crate) fn evaluate_polynomial<F: PrimeField>(coefficients: &[F], x: &F) -> F {
    let mut result = F::ZERO;
    for c in coefficients.iter().rev() {
        result = result * x + c;
    }
    result
}

/// Recovers `f(0)` from the first `t` shares by Lagrange interpolation at
/// the origin.
///
/// The division inside each Lagrange coefficient is a modular inverse in the
/// scalar field, never an integer or floating-point division. Callers choose
/// which `t` shares to pass; any surplus is ignored.
pub fn reconstruct_key<F: PrimeField>(
    shares: &[SecretShare<F>],
    t: usize,
) -> Result<F, ThresholdError> {
    if t < 1 {
        return Err(ThresholdError::InvalidThreshold { t, n: shares.len() });
    }
    if shares.len() < t {
        return Err(ThresholdError::InsufficientShares {
            got: shares.len(),
            need: t,
        });
    }

    let shares = &shares[..t];
    for (j, share) in shares.iter().enumerate() {
        if shares[..j].iter().any(|prior| prior.index == share.index) {
            return Err(ThresholdError::DuplicateShareIndex(share.index));
        }
    }

    let mut secret = F::ZERO;
    for share in shares {
        let xj = F::from(u64::from(share.index));
        let mut num = F::ONE;
        let mut den = F::ONE;
        for other in shares {
            if other.index != share.index {
                let xh = F::from(u64::from(other.index));
                num *= xh;
                den *= xh - xj;
            }
        }
        // Distinct indices keep the denominator nonzero, so inversion only
        // fails if two indices collapse onto one field element.
        let den_inv = Option::<F>::from(den.invert())
            .ok_or(ThresholdError::DuplicateShareIndex(share.index))?;
        secret += share.value * num * den_inv;
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::Scalar;
    use proptest::prelude::*;
    use rand::rngs::OsRng;

    fn shares_for(secret: &Scalar, t: usize, n: usize) -> Vec<SecretShare<Scalar>> {
        let poly = sample_polynomial(secret, t, &mut OsRng);
        (1..=n as u32)
            .map(|i| SecretShare {
                index: i,
                value: evaluate_polynomial(&poly, &Scalar::from(u64::from(i))),
            })
            .collect()
    }

    #[test]
    fn roundtrip_across_parameters() {
        for (t, n) in [(1, 1), (2, 3), (3, 5), (5, 8)] {
            let secret = Scalar::random(&mut OsRng);
            let shares = shares_for(&secret, t, n);
            let recovered = reconstruct_key(&shares[..t], t).unwrap();
            assert_eq!(recovered, secret, "failed for t={t} n={n}");
        }
    }

    #[test]
    fn any_subset_recovers_the_same_secret() {
        let secret = Scalar::from(42u64);
        let shares = shares_for(&secret, 3, 5);

        let pick = |indices: [usize; 3]| {
            let subset: Vec<_> = indices.iter().map(|&i| shares[i - 1]).collect();
            reconstruct_key(&subset, 3).unwrap()
        };

        assert_eq!(pick([1, 3, 5]), secret);
        assert_eq!(pick([2, 3, 4]), secret);
    }

    #[test]
    fn too_few_shares_is_an_error() {
        let secret = Scalar::random(&mut OsRng);
        let shares = shares_for(&secret, 4, 6);
        let err = reconstruct_key(&shares[..3], 4).unwrap_err();
        assert!(matches!(
            err,
            ThresholdError::InsufficientShares { got: 3, need: 4 }
        ));
    }

    #[test]
    fn duplicate_index_is_an_error() {
        let secret = Scalar::random(&mut OsRng);
        let shares = shares_for(&secret, 3, 5);
        let dupes = [shares[0], shares[1], shares[0]];
        let err = reconstruct_key(&dupes, 3).unwrap_err();
        assert!(matches!(err, ThresholdError::DuplicateShareIndex(1)));
    }

    #[test]
    fn zero_threshold_is_an_error() {
        let shares: Vec<SecretShare<Scalar>> = Vec::new();
        let err = reconstruct_key(&shares, 0).unwrap_err();
        assert!(matches!(err, ThresholdError::InvalidThreshold { t: 0, .. }));
    }

    #[test]
    fn surplus_shares_are_ignored() {
        let secret = Scalar::random(&mut OsRng);
        let shares = shares_for(&secret, 2, 6);
        assert_eq!(reconstruct_key(&shares, 2).unwrap(), secret);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_roundtrip(t in 1usize..=5, extra in 0usize..=3, seed in any::<u64>()) {
            let n = t + extra;
            let secret = Scalar::from(seed);
            let mut shares = shares_for(&secret, t, n);
            prop_assert_eq!(reconstruct_key(&shares[..t], t).unwrap(), secret);

            // Interpolation does not care which t distinct indices are used.
            shares.reverse();
            prop_assert_eq!(reconstruct_key(&shares[..t], t).unwrap(), secret);
        }
    }
}
