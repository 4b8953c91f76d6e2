//! Ed448-Goldilocks elliptic curve arithmetic, X448 Diffie-Hellman, and the
//! Keccak-f[1600]/SHA-3/SHAKE sponge construction that backs this crate's
//! own DRBG.
//!
//! This crate implements the core group-theoretic and permutation-level
//! primitives; it does not compose them into a signature scheme (no EdDSA
//! sign/verify), nor does it wire OS entropy into the DRBG. Those are left
//! to a caller that can make its own policy choices about domain separation
//! and entropy sourcing.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod comb;
pub mod constants;
pub mod drbg;
pub mod edwards;
pub mod error;
pub mod field;
pub mod isogeny;
pub mod keccak;
pub mod montgomery;
pub mod niels;
pub mod scalar;
pub mod scalarmul;
pub mod sponge;
pub mod wnaf;

pub use edwards::Point;
pub use error::{Error, Result};
pub use field::Fe;
pub use scalar::Scalar;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn public_api_smoke_test() {
        let base = Point::base_point();
        let scalar = Scalar::from_u64_limbs(&[3, 0, 0, 0, 0, 0, 0, 0]);
        let p = comb::Comb::precompute(&base).scalarmul(&scalar);
        let q = scalarmul::scalarmul(&base, &scalar);
        assert!(bool::from(p.eq_mod_2torsion(&q)));
    }
}
