//! Niels and projective-Niels point representations (spec §4.4/§4.6), used
//! to cut the cost of repeated additions in the comb and w-NAF tables.
//!
//! Grounded directly in `goldilocks.c`'s `pt_to_pniels`, `pniels_to_pt`,
//! `niels_to_pt`, `add_niels_to_pt`, `sub_niels_from_pt`, `add_pniels_to_pt`,
//! `sub_pniels_from_pt`, `cond_neg_niels`.
#![forbid(unsafe_code)]

use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

use crate::constants::TWISTED_D;
use crate::edwards::Point;
use crate::field::Fe;

/// An affine-like representation assuming an implicit z = 1: `a = y-x`,
/// `b = y+x`, `c = 2*d*t`.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Niels {
    pub a: Fe,
    pub b: Fe,
    pub c: Fe,
}

/// A Niels point scaled by a shared denominator `z`.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct PNiels {
    pub n: Niels,
    pub z: Fe,
}

impl Niels {
    pub fn conditional_select(a: &Niels, b: &Niels, choice: Choice) -> Niels {
        Niels {
            a: Fe::conditional_select(&a.a, &b.a, choice),
            b: Fe::conditional_select(&a.b, &b.b, choice),
            c: Fe::conditional_select(&a.c, &b.c, choice),
        }
    }

    /// Conditionally negate this Niels point: swapping a/b flips x's sign,
    /// negating c flips t's sign, matching `cond_neg_niels`.
    pub fn cond_negate(&mut self, neg: Choice) {
        Fe::conditional_swap(&mut self.a, &mut self.b, neg);
        self.c.conditional_negate(neg);
    }
}

/// Lifts an extended point to projective Niels form: `z` doubled so the
/// shared denominator matches what `pniels_to_pt` expects back.
pub fn pt_to_pniels(a: &Point) -> PNiels {
    let na = a.y.sub(&a.x);
    let nb = a.x.add(&a.y);
    let nc = a.t.mulw_i32(2 * TWISTED_D);
    let z = a.z.add(&a.z);
    PNiels { n: Niels { a: na, b: nb, c: nc }, z }
}

/// Recovers an extended point from a projective Niels point.
pub fn pniels_to_pt(d: &PNiels) -> Point {
    let eu = d.n.b.add(&d.n.a);
    let y = d.n.b.sub(&d.n.a);
    let t = y.mul(&eu);
    let x = d.z.mul(&y);
    let y = d.z.mul(&eu);
    let z = d.z.sqr();
    Point { x, y, z, t }
}

/// Recovers an extended point from an (affine, z=1) Niels point.
pub fn niels_to_pt(n: &Niels) -> Point {
    let y = n.b.add(&n.a);
    let x = n.b.sub(&n.a);
    let t = y.mul(&x);
    Point { x, y, z: Fe::ONE, t }
}

/// `d += e`, in place. `before_double` skips the final `t` product since a
/// doubling immediately follows in the caller's comb/ladder chain.
pub fn add_niels_to_pt(d: &mut Point, e: &Niels, before_double: bool) {
    let b = d.y.sub(&d.x);
    let a = e.a.mul(&b);
    let b = d.x.add(&d.y);
    let y = e.b.mul(&b);
    let x = e.c.mul(&d.t);
    let c = a.add(&y);
    let b = y.sub(&a);
    let y2 = d.z.sub(&x);
    let a2 = x.add(&d.z);
    let z = a2.mul(&y2);
    let x2 = y2.mul(&b);
    let y3 = a2.mul(&c);
    let t = if before_double { Fe::ZERO } else { b.mul(&c) };
    d.x = x2;
    d.y = y3;
    d.z = z;
    d.t = t;
}

/// `d -= e`, in place. Same shape as `add_niels_to_pt` with the two sums
/// feeding `z`/`x` swapped.
pub fn sub_niels_from_pt(d: &mut Point, e: &Niels, before_double: bool) {
    let b = d.y.sub(&d.x);
    let a = e.b.mul(&b);
    let b = d.x.add(&d.y);
    let y = e.a.mul(&b);
    let x = e.c.mul(&d.t);
    let c = a.add(&y);
    let b = y.sub(&a);
    let y2 = d.z.add(&d.x);
    let a2 = d.z.sub(&d.x);
    let z = a2.mul(&y2);
    let x2 = y2.mul(&b);
    let y3 = a2.mul(&c);
    let t = if before_double { Fe::ZERO } else { b.mul(&c) };
    d.x = x2;
    d.y = y3;
    d.z = z;
    d.t = t;
}

/// `p += pn`, in place.
pub fn add_pniels_to_pt(p: &mut Point, pn: &PNiels, before_double: bool) {
    p.z = p.z.mul(&pn.z);
    add_niels_to_pt(p, &pn.n, before_double);
}

/// `p -= pn`, in place.
pub fn sub_pniels_from_pt(p: &mut Point, pn: &PNiels, before_double: bool) {
    p.z = p.z.mul(&pn.z);
    sub_niels_from_pt(p, &pn.n, before_double);
}
