//! Verifiable (t,n) threshold cryptosystem over secp256k1: a dealer splits
//! a secret key into n shares of which any t reconstruct it, every share is
//! checkable against public Feldman commitments, and the derived public key
//! supports EC-ElGamal encryption.

pub mod elgamal;
pub mod error;
pub mod feldman;
pub mod keygen;
pub mod shamir;
pub mod storage;

pub use elgamal::*;
pub use error::*;
pub use feldman::*;
pub use keygen::*;
pub use shamir::*;
pub use storage::*;
