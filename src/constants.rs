//! Curve, field, and scalar constants (spec §6).
#![forbid(unsafe_code)]

use crate::field::Fe;
use crate::scalar::Scalar;

/// Number of 56-bit limbs in a field element / scalar.
pub const LIMBS: usize = 8;

/// Bit length of the scalar group order ℓ.
pub const SCALAR_BITS: usize = 446;

/// d (untwisted Ed448 curve, external encoding).
pub const EDWARDS_D: i32 = -39081;

/// d (internal twisted curve used for all group arithmetic).
pub const TWISTED_D: i32 = -39082;

/// -d_twist, the positive constant used throughout the unified formulas.
pub const EFF_D: u32 = 39082;

/// a24 = -d (untwisted) for the Montgomery ladder (spec §4.9).
pub const MONTGOMERY_A24: u32 = 39081;

/// The curve's cofactor.
pub const COFACTOR: u32 = 4;

/// Comb parameters (N, T, S) with N*T*S >= 446.
pub const COMBS_N: usize = 5;
pub const COMBS_T: usize = 5;
pub const COMBS_S: usize = 18;

/// Window width for constant-time variable-base scalar multiplication.
pub const WINDOW_BITS: usize = 5;

/// w-NAF window widths (spec §4.10).
pub const WNAF_FIXED_BITS: usize = 5;
pub const WNAF_VAR_BITS: usize = 3;

/// Scalar adjustment A_pre = A_var, little-endian 64-bit limbs (spec §6).
pub const SCALAR_ADJUSTMENT_LIMBS: [u64; 4] = [
    0xc873d6d54a7bb0cf,
    0xe933d8d723a70aad,
    0xbb124b65129c96fd,
    0x00000008335dc163,
];

/// FACTOR = sqrt(d_twist) / sqrt(-d), 56-bit little-endian limbs (spec §6).
pub const FACTOR_LIMBS: [u64; LIMBS] = [
    0x42ef0f45572736,
    0x7bf6aa20ce5296,
    0xf4fd6eded26033,
    0x968c14ba839a66,
    0xb8d54b64a2d780,
    0x6aa0a1f1a7b8a5,
    0x683bf68d722fa2,
    0x22d962fbeb24f7,
];

/// The 56-byte X448 base-point u-coordinate: u = 5.
pub const X448_BASE_POINT: [u8; 56] = {
    let mut b = [0u8; 56];
    b[0] = 0x05;
    b
};

/// Returns the scalar adjustment constant A_pre = A_var as a `Scalar`.
pub fn scalar_adjustment() -> Scalar {
    Scalar::from_u64_limbs(&SCALAR_ADJUSTMENT_LIMBS)
}

/// Returns the FACTOR field constant.
pub fn factor() -> Fe {
    Fe::from_u64_limbs(&FACTOR_LIMBS)
}

/// Twisted-curve base point (internal representation), derived by applying
/// the a=1 isogeny to the standard RFC 8032 Ed448 generator. Stored as an
/// affine (x, y) pair; `edwards::Point::base_point()` lifts it to extended
/// coordinates with z = 1, t = x*y.
pub const BASE_X_LIMBS: [u64; LIMBS] = [
    0x34e32ee005128a,
    0xc4a9487e0e9971,
    0xfadc4e769de751,
    0xca611cb550d150,
    0xf8ea62e2bce16e,
    0xd9bd95ccc736a2,
    0x0c337f93b324d1,
    0x74e9dd52d1810b,
];

pub const BASE_Y_LIMBS: [u64; LIMBS] = [
    0x7cfbaef7437683,
    0x995ad15df28d32,
    0x5cec07ce02191d,
    0x15f74e73f1e831,
    0xc5a69d045ef70f,
    0xbe15209d7069c9,
    0x97f22934353384,
    0x5e450dc284cf43,
];
