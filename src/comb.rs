//! Comb precomputation and constant-time fixed-base scalar multiplication
//! (spec §4.6), grounded in `goldilocks.c`'s `precompute`,
//! `precomputed_scalarmul`, `gf_batch_invert`, `batch_normalize_niels`.
#![forbid(unsafe_code)]

use zeroize::Zeroize;

use crate::constants::{scalar_adjustment, COMBS_N, COMBS_S, COMBS_T};
use crate::edwards::Point;
use crate::field::Fe;
use crate::niels::{self, Niels};
use crate::scalar::Scalar;

const LIMB_BITS: usize = 56;
const SCALAR_BITS: usize = 446;
const TABLE_LEN: usize = COMBS_N << (COMBS_T - 1);

/// A fixed-base comb table: `COMBS_N * 2^(COMBS_T-1)` Niels points.
#[derive(Clone)]
pub struct Comb {
    table: Vec<Niels>,
}

/// Batch-inverts `values`, Montgomery's trick: one real inversion plus
/// `3*(n-1)` multiplications. Mirrors `gf_batch_invert` exactly, including
/// its unusual indexing (`out[0]` ends up holding the running product's
/// inverse, `out[1..]` the partial products, before the final backward
/// pass rewrites everything in place).
pub(crate) fn batch_invert(values: &[Fe]) -> Vec<Fe> {
    let n = values.len();
    assert!(n > 1);
    let mut out = vec![Fe::ZERO; n];
    out[1] = values[0];
    for i in 1..n - 1 {
        out[i + 1] = out[i].mul(&values[i]);
    }
    out[0] = out[n - 1].mul(&values[n - 1]);
    out[0] = out[0].invert();
    for i in (1..n).rev() {
        let t1 = out[i].mul(&out[0]);
        out[0] = out[0].mul(&values[i]);
        out[i] = t1;
    }
    out
}

/// Normalizes a batch of `(Niels, z)` pairs to affine (z=1) Niels points.
pub(crate) fn batch_normalize_niels(table: &mut [Niels], zs: &[Fe]) {
    let zis = batch_invert(zs);
    for i in 0..table.len() {
        table[i].a = table[i].a.mul(&zis[i]).strong_reduce();
        table[i].b = table[i].b.mul(&zis[i]).strong_reduce();
        table[i].c = table[i].c.mul(&zis[i]).strong_reduce();
    }
}

impl Comb {
    /// Builds the comb table for `base` (spec's fixed base is always the
    /// curve's generator, but the algorithm itself is base-agnostic).
    pub fn precompute(base: &Point) -> Comb {
        let n = COMBS_N;
        let t = COMBS_T;
        let s = COMBS_S;
        assert!(n * t * s >= SCALAR_BITS);

        let mut table = vec![
            Niels { a: Fe::ZERO, b: Fe::ZERO, c: Fe::ZERO };
            TABLE_LEN
        ];
        let mut zs = vec![Fe::ZERO; TABLE_LEN];

        let mut working = *base;

        for i in 0..n {
            let mut doubles: Vec<Point> = Vec::with_capacity(t - 1);
            let mut start = Point::identity();

            for j in 0..t {
                if j == 0 {
                    start = working;
                } else {
                    start = start.add(&working);
                }

                if j == t - 1 && i == n - 1 {
                    break;
                }

                working = working.double_internal(false);
                if j < t - 1 {
                    doubles.push(working);
                }

                for k in 0..s - 1 {
                    working = working.double_internal(k < s - 2);
                }
            }

            let mut j = 0u32;
            loop {
                let gray = j ^ (j >> 1);
                let idx = (((i as u32 + 1) << (t - 1)) - 1) ^ gray;

                let pn = niels::pt_to_pniels(&start);
                table[idx as usize] = pn.n;
                zs[idx as usize] = pn.z;

                if j >= (1u32 << (t - 1)) - 1 {
                    break;
                }
                let delta = (j + 1) ^ ((j + 1) >> 1) ^ gray;
                let mut k = 0usize;
                let mut d = delta;
                while d > 1 {
                    d >>= 1;
                    k += 1;
                }

                if gray & (1 << k) != 0 {
                    start = start.add(&doubles[k]);
                } else {
                    start = start.sub(&doubles[k]);
                }

                j += 1;
            }
        }

        batch_normalize_niels(&mut table, &zs);
        zs.zeroize();

        Comb { table }
    }

    /// Constant-time fixed-base scalar multiplication via the Gray-coded
    /// signed-digit comb (`precomputed_scalarmul`).
    pub fn scalarmul(&self, scalar: &Scalar) -> Point {
        let n = COMBS_N;
        let t = COMBS_T;
        let s = COMBS_S;

        let adjusted = scalar.add(&scalar_adjustment());
        let scalar1x = adjusted.halve();
        let limbs = scalar1x.0;

        let mut out = Point::identity();

        for i in (0..s).rev() {
            if i != s - 1 {
                out = out.double_internal(false);
            }

            for j in 0..n {
                let mut tab: u32 = 0;
                for k in 0..t {
                    let bit = i + s * (k + j * t);
                    if bit < SCALAR_BITS {
                        let b = (limbs[bit / LIMB_BITS] >> (bit % LIMB_BITS)) & 1;
                        tab |= (b as u32) << k;
                    }
                }

                let invert_mask = (tab >> (t - 1)).wrapping_sub(1);
                tab ^= invert_mask;
                tab &= (1 << (t - 1)) - 1;
                let invert = subtle::Choice::from((invert_mask & 1) as u8);

                let mut ni = lookup_niels(&self.table[j << (t - 1)..(j + 1) << (t - 1)], tab as usize);
                ni.cond_negate(invert);

                if i != s - 1 || j != 0 {
                    let before_double = j == n - 1 && i != 0;
                    niels::add_niels_to_pt(&mut out, &ni, before_double);
                } else {
                    out = niels::niels_to_pt(&ni);
                }
            }
        }

        out
    }
}

/// Constant-time table lookup: touches every entry so the access pattern
/// carries no information about `idx`.
fn lookup_niels(table: &[Niels], idx: usize) -> Niels {
    let mut result = Niels { a: Fe::ZERO, b: Fe::ZERO, c: Fe::ZERO };
    for (i, entry) in table.iter().enumerate() {
        let hit = subtle::Choice::from((i == idx) as u8);
        result = Niels::conditional_select(&result, entry, hit);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comb_scalarmul_one_is_base_point() {
        let comb = Comb::precompute(&Point::base_point());
        let result = comb.scalarmul(&Scalar::ONE);
        assert!(bool::from(result.eq_mod_2torsion(&Point::base_point())));
    }

    #[test]
    fn comb_scalarmul_zero_is_identity() {
        let comb = Comb::precompute(&Point::base_point());
        let result = comb.scalarmul(&Scalar::ZERO);
        assert!(bool::from(result.eq_mod_2torsion(&Point::identity())));
    }

    #[test]
    fn comb_scalarmul_matches_repeated_addition() {
        let comb = Comb::precompute(&Point::base_point());
        let five = Scalar::from_u64_limbs(&[5, 0, 0, 0, 0, 0, 0, 0]);
        let via_comb = comb.scalarmul(&five);

        let base = Point::base_point();
        let mut via_add = Point::identity();
        for _ in 0..5 {
            via_add = via_add.add(&base);
        }
        assert!(bool::from(via_comb.eq_mod_2torsion(&via_add)));
    }
}
