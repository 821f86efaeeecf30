//! Feldman verifiable secret sharing: splitting with public commitments and
//! share verification against them.

use k256::elliptic_curve::{
    group::Group,
    rand_core::{CryptoRng, RngCore},
    PrimeField,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::ThresholdError;
use crate::shamir::{evaluate_polynomial, sample_polynomial, SecretShare};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ShamirParameters {
    pub threshold: usize,   //t
    pub share_count: usize, //n
}

/// Public side of one dealer run: the scheme parameters and the commitment
/// points `F[j] = c_j * G`, with `F[0]` the public key of the shared secret.
#[derive(Clone, PartialEq, Debug)]
pub struct FeldmanVss<G: Group> {
    pub parameters: ShamirParameters,
    pub commitments: Vec<G>,
}

impl<G> FeldmanVss<G>
where
    G: Group,
    G::Scalar: PrimeField + Zeroize,
{
    /// Splits `secret` into `n` shares of which any `t` reconstruct it.
    ///
    /// Shares are issued at x = 1..=n. The polynomial coefficients never
    /// leave this call; the returned commitment set is the only public
    /// trace of them.
    pub fn split<R: RngCore + CryptoRng>(
        secret: &G::Scalar,
        t: usize,
        n: usize,
        rng: &mut R,
    ) -> Result<(Self, Vec<SecretShare<G::Scalar>>), ThresholdError> {
        if t < 1 || t > n {
            return Err(ThresholdError::InvalidThreshold { t, n });
        }

        let coefficients = sample_polynomial(secret, t, rng);

        let shares = (1..=n as u32)
            .map(|i| SecretShare {
                index: i,
                value: evaluate_polynomial(&coefficients, &G::Scalar::from(u64::from(i))),
            })
            .collect();

        let commitments = coefficients.iter().map(|c| G::generator() * *c).collect();

        Ok((
            FeldmanVss {
                parameters: ShamirParameters {
                    threshold: t,
                    share_count: n,
                },
                commitments,
            },
            shares,
        ))
    }

    /// Checks one share against the commitment set without learning any
    /// other share or the secret.
    ///
    /// Evaluates `V = sum_j index^j * F[j]` by a Horner fold over the
    /// commitment points and compares against `value * G`. Pure; safe to
    /// call concurrently by any holder of the commitments.
    pub fn verify_share(&self, share: &SecretShare<G::Scalar>) -> Result<bool, ThresholdError> {
        if self.commitments.len() != self.parameters.threshold {
            return Err(ThresholdError::MalformedCommitment {
                got: self.commitments.len(),
                expected: self.parameters.threshold,
            });
        }

        let x = G::Scalar::from(u64::from(share.index));
        let mut expected = G::identity();
        for commitment in self.commitments.iter().rev() {
            expected = expected * x + *commitment;
        }

        Ok(expected == G::generator() * share.value)
    }

    /// The public key of the shared secret, `F[0] = c0 * G`.
    pub fn public_key(&self) -> G {
        self.commitments[0]
    }
}
