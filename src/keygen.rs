//! Key generation and the dealer facade tying key generation, splitting and
//! commitment publication into one call.

use k256::elliptic_curve::{
    group::Group,
    rand_core::{CryptoRng, RngCore},
    Field, PrimeField,
};
use zeroize::Zeroize;

use crate::error::ThresholdError;
use crate::feldman::FeldmanVss;
use crate::shamir::SecretShare;

/// A group keypair. `public == secret * G` holds by construction: both
/// constructors derive the public half, and the fields are not writable
/// from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPair<G: Group> {
    secret: G::Scalar,
    public: G,
}

impl<G: Group> KeyPair<G> {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_secret(G::Scalar::random(&mut *rng))
    }

    pub fn from_secret(secret: G::Scalar) -> Self {
        KeyPair {
            secret,
            public: G::generator() * secret,
        }
    }

    pub fn public(&self) -> G {
        self.public
    }

    pub fn secret(&self) -> &G::Scalar {
        &self.secret
    }
}

/// Everything one dealer run produces: the master keypair, the `n` shares
/// to hand out, and the public commitment set.
#[derive(Clone, Debug)]
pub struct ThresholdSetup<G: Group> {
    pub key_pair: KeyPair<G>,
    pub shares: Vec<SecretShare<G::Scalar>>,
    pub vss: FeldmanVss<G>,
}

/// Generates a master keypair and splits the secret in one pass.
///
/// The shares go to the participants, the commitment set is published, and
/// the secret half of the keypair is only ever seen again through
/// reconstruction from `t` shares.
pub fn generate_threshold_parameters<G, R>(
    t: usize,
    n: usize,
    rng: &mut R,
) -> Result<ThresholdSetup<G>, ThresholdError>
where
    G: Group,
    G::Scalar: PrimeField + Zeroize,
    R: RngCore + CryptoRng,
{
    let key_pair = KeyPair::generate(rng);
    let (vss, shares) = FeldmanVss::split(key_pair.secret(), t, n, rng)?;
    Ok(ThresholdSetup {
        key_pair,
        shares,
        vss,
    })
}
