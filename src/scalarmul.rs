//! Constant-time variable-base scalar multiplication (spec §4.7), grounded
//! in `goldilocks.c`'s `prepare_fixed_window`, `point_scalarmul`,
//! `point_double_scalarmul`, `point_dual_scalarmul`.
#![forbid(unsafe_code)]

use subtle::Choice;

use crate::constants::{scalar_adjustment, SCALAR_BITS, WINDOW_BITS};
use crate::edwards::Point;
use crate::niels::{self, Niels, PNiels};
use crate::scalar::Scalar;

const LIMB_BITS: usize = 56;
const WINDOW: usize = WINDOW_BITS;
const WINDOW_MASK: u64 = (1 << WINDOW) - 1;
const WINDOW_T_MASK: u64 = WINDOW_MASK >> 1;
const NTABLE: usize = 1 << (WINDOW - 1);

/// Builds a table of the odd multiples `1*b, 3*b, 5*b, ..., (2*NTABLE-1)*b`
/// in projective-Niels form (`prepare_fixed_window`).
fn prepare_fixed_window(base: &Point) -> Vec<PNiels> {
    let doubled = base.double_internal(false);
    let pn = niels::pt_to_pniels(&doubled);

    let mut multiples = Vec::with_capacity(NTABLE);
    multiples.push(niels::pt_to_pniels(base));

    let mut working = *base;
    for _ in 1..NTABLE {
        niels::add_pniels_to_pt(&mut working, &pn, false);
        multiples.push(niels::pt_to_pniels(&working));
    }
    multiples
}

/// Constant-time lookup into a `PNiels` table: touches every entry.
fn lookup_pniels(table: &[PNiels], idx: u64) -> PNiels {
    let mut result = PNiels { n: Niels { a: crate::field::Fe::ZERO, b: crate::field::Fe::ZERO, c: crate::field::Fe::ZERO }, z: crate::field::Fe::ONE };
    for (i, entry) in table.iter().enumerate() {
        let hit = Choice::from((i as u64 == idx) as u8);
        result.n = Niels::conditional_select(&result.n, &entry.n, hit);
        result.z = crate::field::Fe::conditional_select(&result.z, &entry.z, hit);
    }
    result
}

/// Constant-time lookup into a `Point` table: touches every entry
/// (`constant_time_lookup`).
fn lookup_point(table: &[Point], idx: u64) -> Point {
    let mut result = Point::identity();
    for (i, entry) in table.iter().enumerate() {
        let hit = Choice::from((i as u64 == idx) as u8);
        result = Point::conditional_select(&result, entry, hit);
    }
    result
}

/// Constant-time insert into a `Point` table: touches every entry
/// (`constant_time_insert`).
fn insert_point(table: &mut [Point], idx: u64, value: Point) {
    for (i, entry) in table.iter_mut().enumerate() {
        let hit = Choice::from((i as u64 == idx) as u8);
        *entry = Point::conditional_select(entry, &value, hit);
    }
}

/// Extracts a `WINDOW`-bit signed digit window starting at bit `i` of a
/// scalar's 56-bit limbs, returning (unsigned table index, invert flag).
fn fetch_window(limbs: &[u64; 8], i: usize) -> (u64, Choice) {
    let mut bits = limbs[i / LIMB_BITS] >> (i % LIMB_BITS);
    if i % LIMB_BITS >= LIMB_BITS - WINDOW && i / LIMB_BITS < 7 {
        bits ^= limbs[i / LIMB_BITS + 1] << (LIMB_BITS - (i % LIMB_BITS));
    }
    bits &= WINDOW_MASK;
    let inv_mask = (bits >> (WINDOW - 1)).wrapping_sub(1);
    bits ^= inv_mask;
    (bits & WINDOW_T_MASK, Choice::from((inv_mask & 1) as u8))
}

/// `out = scalar * base`, constant-time in `scalar` (`point_scalarmul`).
pub fn scalarmul(base: &Point, scalar: &Scalar) -> Point {
    let adjusted = scalar.add(&scalar_adjustment());
    let scalar1x = adjusted.halve();
    let limbs = scalar1x.0;

    let multiples = prepare_fixed_window(base);

    let start_i = SCALAR_BITS - ((SCALAR_BITS - 1) % WINDOW) - 1;
    let mut tmp = Point::identity();
    let mut first = true;

    let mut i = start_i as isize;
    while i >= 0 {
        let (idx, inv) = fetch_window(&limbs, i as usize);
        let mut pn = lookup_pniels(&multiples, idx);
        pn.n.cond_negate(inv);

        if first {
            tmp = niels::pniels_to_pt(&pn);
            first = false;
        } else {
            for _ in 0..WINDOW - 1 {
                tmp = tmp.double_internal(true);
            }
            tmp = tmp.double_internal(false);
            niels::add_pniels_to_pt(&mut tmp, &pn, i != 0);
        }

        i -= WINDOW as isize;
    }

    tmp
}

/// `a = scalarb*b + scalarc*c`, constant-time in both scalars
/// (`point_double_scalarmul`).
pub fn double_scalarmul(b: &Point, scalarb: &Scalar, c: &Point, scalarc: &Scalar) -> Point {
    let scalar1x = scalarb.add(&scalar_adjustment()).halve();
    let scalar2x = scalarc.add(&scalar_adjustment()).halve();
    let limbs1 = scalar1x.0;
    let limbs2 = scalar2x.0;

    let multiples1 = prepare_fixed_window(b);
    let multiples2 = prepare_fixed_window(c);

    let start_i = SCALAR_BITS - ((SCALAR_BITS - 1) % WINDOW) - 1;
    let mut tmp = Point::identity();
    let mut first = true;

    let mut i = start_i as isize;
    while i >= 0 {
        let (idx1, inv1) = fetch_window(&limbs1, i as usize);
        let mut pn1 = lookup_pniels(&multiples1, idx1);
        pn1.n.cond_negate(inv1);

        if first {
            tmp = niels::pniels_to_pt(&pn1);
            first = false;
        } else {
            for _ in 0..WINDOW - 1 {
                tmp = tmp.double_internal(true);
            }
            tmp = tmp.double_internal(false);
            niels::add_pniels_to_pt(&mut tmp, &pn1, false);
        }

        let (idx2, inv2) = fetch_window(&limbs2, i as usize);
        let mut pn2 = lookup_pniels(&multiples2, idx2);
        pn2.n.cond_negate(inv2);
        niels::add_pniels_to_pt(&mut tmp, &pn2, i != 0);

        i -= WINDOW as isize;
    }

    tmp
}

/// `(a1, a2) = (scalar1*b, scalar2*b)`, built by scanning both scalars
/// together against a single running point and collapsing an
/// online-built table of partial sums (`point_dual_scalarmul`). Useful
/// when the same base point is scaled by two different, unrelated
/// scalars in one pass.
pub fn dual_scalarmul(b: &Point, scalar1: &Scalar, scalar2: &Scalar) -> (Point, Point) {
    let scalar1x = scalar1.add(&scalar_adjustment()).halve();
    let scalar2x = scalar2.add(&scalar_adjustment()).halve();
    let limbs1 = scalar1x.0;
    let limbs2 = scalar2x.0;

    let mut multiples1 = vec![Point::identity(); NTABLE];
    let mut multiples2 = vec![Point::identity(); NTABLE];
    let mut working = *b;

    let mut i = 0usize;
    while i < SCALAR_BITS {
        if i != 0 {
            for _ in 0..WINDOW - 1 {
                working = working.double_internal(true);
            }
            working = working.double_internal(false);
        }

        let (idx1, inv1) = fetch_window(&limbs1, i);
        let (idx2, inv2) = fetch_window(&limbs2, i);

        let pn = niels::pt_to_pniels(&working);

        let mut tmp1 = lookup_point(&multiples1, idx1);
        let mut pn1 = pn;
        pn1.n.cond_negate(inv1);
        niels::add_pniels_to_pt(&mut tmp1, &pn1, false);
        insert_point(&mut multiples1, idx1, tmp1);

        let mut tmp2 = lookup_point(&multiples2, idx2);
        let mut pn2 = pn;
        pn2.n.cond_negate(inv2);
        niels::add_pniels_to_pt(&mut tmp2, &pn2, false);
        insert_point(&mut multiples2, idx2, tmp2);

        i += WINDOW;
    }

    let (a1, a2) = if NTABLE > 1 {
        let mut w1 = multiples1[NTABLE - 1];
        let mut w2 = multiples2[NTABLE - 1];

        for k in (2..NTABLE).rev() {
            multiples1[k - 1] = multiples1[k - 1].add(&multiples1[k]);
            multiples2[k - 1] = multiples2[k - 1].add(&multiples2[k]);
            w1 = w1.add(&multiples1[k - 1]);
            w2 = w2.add(&multiples2[k - 1]);
        }

        multiples1[0] = multiples1[0].add(&multiples1[1]);
        multiples2[0] = multiples2[0].add(&multiples2[1]);
        w1 = w1.double_internal(false);
        w2 = w2.double_internal(false);
        (w1.add(&multiples1[0]), w2.add(&multiples2[0]))
    } else {
        (multiples1[0], multiples2[0])
    };

    (a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalarmul_by_one_is_base() {
        let base = Point::base_point();
        let result = scalarmul(&base, &Scalar::ONE);
        assert!(bool::from(result.eq_mod_2torsion(&base)));
    }

    #[test]
    fn scalarmul_by_zero_is_identity() {
        let base = Point::base_point();
        let result = scalarmul(&base, &Scalar::ZERO);
        assert!(bool::from(result.eq_mod_2torsion(&Point::identity())));
    }

    #[test]
    fn scalarmul_matches_repeated_addition() {
        let base = Point::base_point();
        let seven = Scalar::from_u64_limbs(&[7, 0, 0, 0, 0, 0, 0, 0]);
        let via_scalarmul = scalarmul(&base, &seven);

        let mut via_add = Point::identity();
        for _ in 0..7 {
            via_add = via_add.add(&base);
        }
        assert!(bool::from(via_scalarmul.eq_mod_2torsion(&via_add)));
    }

    #[test]
    fn double_scalarmul_matches_two_scalarmuls_summed() {
        let base = Point::base_point();
        let other = base.double();
        let s1 = Scalar::from_u64_limbs(&[3, 0, 0, 0, 0, 0, 0, 0]);
        let s2 = Scalar::from_u64_limbs(&[11, 0, 0, 0, 0, 0, 0, 0]);

        let combined = double_scalarmul(&base, &s1, &other, &s2);
        let expected = scalarmul(&base, &s1).add(&scalarmul(&other, &s2));
        assert!(bool::from(combined.eq_mod_2torsion(&expected)));
    }

    #[test]
    fn dual_scalarmul_matches_two_scalarmuls() {
        let base = Point::base_point();
        let s1 = Scalar::from_u64_limbs(&[9, 0, 0, 0, 0, 0, 0, 0]);
        let s2 = Scalar::from_u64_limbs(&[4, 0, 0, 0, 0, 0, 0, 0]);

        let (a1, a2) = dual_scalarmul(&base, &s1, &s2);
        let expected1 = scalarmul(&base, &s1);
        let expected2 = scalarmul(&base, &s2);
        assert!(bool::from(a1.eq_mod_2torsion(&expected1)));
        assert!(bool::from(a2.eq_mod_2torsion(&expected2)));
    }
}
