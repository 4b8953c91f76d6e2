//! Extended twisted-Edwards point arithmetic on the internal Goldilocks
//! curve (spec §4.4), grounded directly in `goldilocks.c`'s `point_add`,
//! `point_sub`, `point_double_internal`, `point_negate`, `point_valid`,
//! `point_eq`, `deisogenize`/`point_encode`/`point_decode`.
#![forbid(unsafe_code)]

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::constants::{self, EFF_D, TWISTED_D};
use crate::field::Fe;

/// A point in extended twisted-Edwards coordinates (x, y, z, t) with
/// x*y = z*t and curve equation -x^2 + y^2 = z^2 + d*t^2 (TWISTED_D).
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Point {
    pub x: Fe,
    pub y: Fe,
    pub z: Fe,
    pub t: Fe,
}

impl Point {
    pub fn identity() -> Point {
        Point { x: Fe::ZERO, y: Fe::ONE, z: Fe::ONE, t: Fe::ZERO }
    }

    /// The internal (twisted-curve) generator of the prime-order subgroup.
    pub fn base_point() -> Point {
        let x = Fe::from_u64_limbs(&constants::BASE_X_LIMBS);
        let y = Fe::from_u64_limbs(&constants::BASE_Y_LIMBS);
        Point { x, y, z: Fe::ONE, t: x.mul(&y) }
    }

    /// `x*y = z*t` AND `(y^2-x^2) = z^2 + d*t^2` AND `z != 0`.
    pub fn is_valid(&self) -> Choice {
        let lhs1 = self.x.mul(&self.y);
        let rhs1 = self.z.mul(&self.t);
        let ok1 = lhs1.ct_eq(&rhs1);

        let xx = self.x.sqr();
        let yy = self.y.sqr();
        let a = yy.sub(&xx);
        let tt = self.t.sqr();
        let c = tt.mulw_i32(TWISTED_D);
        let zz = self.z.sqr();
        let b = zz.add(&c);
        let ok2 = a.ct_eq(&b);

        let nonzero = !self.z.is_zero();
        ok1 & ok2 & nonzero
    }

    pub fn negate(&self) -> Point {
        Point { x: self.x.negate(), y: self.y, z: self.z, t: self.t.negate() }
    }

    pub fn conditional_select(a: &Point, b: &Point, choice: Choice) -> Point {
        Point {
            x: Fe::conditional_select(&a.x, &b.x, choice),
            y: Fe::conditional_select(&a.y, &b.y, choice),
            z: Fe::conditional_select(&a.z, &b.z, choice),
            t: Fe::conditional_select(&a.t, &b.t, choice),
        }
    }

    /// Compares `x_p*y_q == x_q*y_p`, i.e. equality modulo 2-torsion: full
    /// equality requires clearing the cofactor first.
    pub fn eq_mod_2torsion(&self, other: &Point) -> Choice {
        let a = self.y.mul(&other.x);
        let b = other.y.mul(&self.x);
        a.ct_eq(&b)
    }

    /// Unified extended-coordinate doubling. `before_double` skips
    /// computing `t` since it would be immediately overwritten by a
    /// subsequent doubling in a chain.
    pub fn double_internal(&self, before_double: bool) -> Point {
        let c = self.x.sqr();
        let a = self.y.sqr();
        let d = c.add(&a);
        let t_sum = self.y.add(&self.x);
        let mut b = t_sum.sqr();
        b = b.sub(&d);
        let t_diff = a.sub(&c);
        let x_tmp = self.z.sqr();
        let z_tmp = x_tmp.add(&x_tmp);
        let a2 = z_tmp.sub(&t_diff);
        let x = a2.mul(&b);
        let z = t_diff.mul(&a2);
        let y = t_diff.mul(&d);
        let t = if before_double { Fe::ZERO } else { b.mul(&d) };
        Point { x, y, z, t }
    }

    pub fn double(&self) -> Point {
        self.double_internal(false)
    }

    pub fn add(&self, other: &Point) -> Point {
        let b1 = self.y.sub(&self.x);
        let c1 = other.y.sub(&other.x);
        let d1 = other.y.add(&other.x);
        let a1 = c1.mul(&b1);
        let b2 = self.y.add(&self.x);
        let py1 = d1.mul(&b2);
        let b3 = other.t.mul(&self.t);
        let px1 = b3.mulw(2 * EFF_D);
        let b4 = a1.add(&py1);
        let c2 = py1.sub(&a1);
        let a2 = self.z.mul(&other.z);
        let a2x2 = a2.add(&a2);
        let py2 = a2x2.add(&px1);
        let a3 = a2x2.sub(&px1);
        let z = a3.mul(&py2);
        let x = py2.mul(&c2);
        let y = a3.mul(&b4);
        let t = b4.mul(&c2);
        Point { x, y, z, t }
    }

    /// Same cost and shape as `add`, but with `other`'s x-sign conceptually
    /// flipped (realized by swapping two of the intermediate sums rather
    /// than negating and re-adding).
    pub fn sub(&self, other: &Point) -> Point {
        let b1 = self.y.sub(&self.x);
        let d1 = other.y.sub(&other.x);
        let c1 = other.y.add(&other.x);
        let a1 = c1.mul(&b1);
        let b2 = self.y.add(&self.x);
        let py1 = d1.mul(&b2);
        let b3 = other.t.mul(&self.t);
        let px1 = b3.mulw(2 * EFF_D);
        let b4 = a1.add(&py1);
        let c2 = py1.sub(&a1);
        let a2 = self.z.mul(&other.z);
        let a2x2 = a2.add(&a2);
        let py2 = a2x2.sub(&px1);
        let a3 = a2x2.add(&px1);
        let z = a3.mul(&py2);
        let x = py2.mul(&c2);
        let y = a3.mul(&b4);
        let t = b4.mul(&c2);
        Point { x, y, z, t }
    }

    /// Decaf-style 56-byte point encoding (spec §4.4, `deisogenize` with all
    /// three toggles fixed to 0).
    pub fn encode(&self) -> [u8; 56] {
        let s = deisogenize(self, Choice::from(0), Choice::from(0));
        let s = s.strong_reduce();
        let low = s.lobit();
        let s = Fe::conditional_select(&s, &s.negate(), low);
        s.serialize()
    }

    /// Translates by the curve's order-2 point (negate x and y, leave z/t
    /// alone). Used to check that higher-level code treats 2-torsion
    /// cosets as equivalent (`point_debugging_torque`).
    pub fn torque(&self) -> Point {
        Point { x: self.x.negate(), y: self.y.negate(), z: self.z, t: self.t }
    }

    /// Rescales every coordinate by `factor` (falling back to 1 if `factor`
    /// deserializes to 0), producing a different projective representative
    /// of the same affine point. Used to check that algorithms tolerate
    /// inputs with `z != 1` (`point_debugging_pscale`).
    pub fn rescale(&self, factor: &[u8; 56]) -> Point {
        let decoded = Fe::deserialize(factor).unwrap_or(Fe::ZERO);
        let is_zero = decoded.is_zero();
        let gfac = Fe::conditional_select(&decoded, &Fe::ONE, is_zero);
        Point {
            x: self.x.mul(&gfac),
            y: self.y.mul(&gfac),
            z: self.z.mul(&gfac),
            t: self.t.mul(&gfac),
        }
    }

    /// Decodes the 56-byte Decaf-style encoding back into a point.
    pub fn decode(ser: &[u8; 56], allow_identity: bool) -> Option<Point> {
        let s_opt = Fe::deserialize(ser);
        let s = s_opt.unwrap_or(Fe::ZERO);
        let mut succ = s_opt.is_some();
        succ &= Choice::from(allow_identity as u8) | !s.is_zero();
        succ &= !s.lobit();

        let s2 = s.sqr();
        let den = Fe::ONE.sub(&s2);
        let ynum = Fe::ONE.add(&s2);
        let num_part = s2.mulw_i32(-4 * (TWISTED_D));
        let den2 = den.sqr();
        let num = den2.add(&num_part);
        let num_den2 = num.mul(&den2);
        let isr = num_den2.isr();
        succ &= isr.is_some();
        let isr = isr.unwrap_or(Fe::ZERO);

        let isr_den = isr.mul(&den);
        let y = isr_den.mul(&ynum);
        let two_s_isr_den = {
            let t = isr_den.mul(&s);
            t.add(&t)
        };
        let x_unsigned = two_s_isr_den.mul(&isr).mul(&num);
        let sign_probe = two_s_isr_den.mul(&constants::factor());
        let flip = sign_probe.lobit();
        let x = Fe::conditional_select(&x_unsigned, &x_unsigned.negate(), flip);

        let z = Fe::ONE;
        let t = x.mul(&y);
        let p = Point { x, y, z, t };
        succ &= p.is_valid();
        if bool::from(succ) {
            Some(p)
        } else {
            None
        }
    }
}

/// Computes the Decaf-style invariant `s` (and the two auxiliary values the
/// C original also hands back for isogeny bookkeeping) from a point in
/// extended coordinates. Direct transliteration of `goldilocks.c`'s
/// `deisogenize`; `toggle_rotation` is accepted only for symmetry with the
/// original signature (the cofactor-4 curve never uses it, per spec §9).
fn deisogenize(p: &Point, toggle_s: Choice, toggle_altx: Choice) -> Fe {
    let t1 = p.x.add(&p.t);
    let t2 = p.x.sub(&p.t);
    let t3 = t1.mul(&t2); // num
    let t2b = p.x.sqr();
    let t1b = t2b.mul(&t3);
    let t2c = t1b.mulw_i32(-1 - TWISTED_D);
    let t1c = t2c.isr().unwrap_or(Fe::ZERO); // isr
    let t2d = t1c.mul(&t3); // ratio
    let t4 = t2d.mul(&constants::factor());
    let negx = t4.lobit() ^ toggle_altx;
    let t2e = Fe::conditional_select(&t2d, &t2d.negate(), negx);
    let t3b = t2e.mul(&p.z);
    let t3c = t3b.sub(&p.t);
    let t2f = t3c.mul(&p.x);
    let t4b = t2f.mulw_i32(-1 - TWISTED_D);
    let s = t4b.mul(&t1c);
    let lobs = s.lobit();
    let s = Fe::conditional_select(&s, &s.negate(), lobs);

    let mut inv_el_m1 = p.x;
    let sign = !lobs ^ negx ^ toggle_s;
    inv_el_m1.conditional_negate(sign);
    let _inv_el_m1 = inv_el_m1.add(&p.t);
    let _ = toggle_s;
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_valid() {
        assert!(bool::from(Point::identity().is_valid()));
    }

    #[test]
    fn base_point_is_valid() {
        assert!(bool::from(Point::base_point().is_valid()));
    }

    #[test]
    fn add_identity_is_noop() {
        let p = Point::base_point();
        let sum = p.add(&Point::identity());
        assert!(bool::from(p.eq_mod_2torsion(&sum)));
    }

    #[test]
    fn double_matches_add_self() {
        let p = Point::base_point();
        let doubled = p.double();
        let added = p.add(&p);
        assert!(bool::from(doubled.eq_mod_2torsion(&added)));
        assert!(bool::from(doubled.is_valid()));
    }

    #[test]
    fn add_is_commutative() {
        let p = Point::base_point();
        let q = p.double();
        let pq = p.add(&q);
        let qp = q.add(&p);
        assert!(bool::from(pq.eq_mod_2torsion(&qp)));
    }

    #[test]
    fn add_negate_is_identity() {
        let p = Point::base_point();
        let sum = p.add(&p.negate());
        assert!(bool::from(sum.eq_mod_2torsion(&Point::identity())));
    }

    #[test]
    fn sub_matches_add_of_negation() {
        let p = Point::base_point();
        let q = p.double();
        let via_sub = p.sub(&q);
        let via_add_neg = p.add(&q.negate());
        assert!(bool::from(via_sub.eq_mod_2torsion(&via_add_neg)));
    }

    #[test]
    fn encode_decode_roundtrips_base_point() {
        let p = Point::base_point();
        let enc = p.encode();
        let dec = Point::decode(&enc, false).expect("base point must decode");
        assert!(bool::from(dec.eq_mod_2torsion(&p)));
    }

    #[test]
    fn encode_decode_roundtrips_identity_when_allowed() {
        let p = Point::identity();
        let enc = p.encode();
        let dec = Point::decode(&enc, true).expect("identity must decode when allowed");
        assert!(bool::from(dec.eq_mod_2torsion(&p)));
    }

    #[test]
    fn decode_rejects_identity_when_disallowed() {
        let p = Point::identity();
        let enc = p.encode();
        assert!(Point::decode(&enc, false).is_none());
    }

    #[test]
    fn torque_is_its_own_inverse_and_preserves_eq() {
        let p = Point::base_point();
        let torqued = p.torque();
        assert!(bool::from(torqued.is_valid()));
        assert!(bool::from(torqued.torque().eq_mod_2torsion(&p)));
    }

    #[test]
    fn rescale_preserves_validity_and_encoding() {
        let p = Point::base_point();
        let mut factor = [0u8; 56];
        factor[0] = 7;
        let rescaled = p.rescale(&factor);
        assert!(bool::from(rescaled.is_valid()));
        assert_eq!(rescaled.encode(), p.encode());
    }

    #[test]
    fn rescale_by_zero_factor_is_a_no_op() {
        let p = Point::base_point();
        let zero_factor = [0u8; 56];
        let rescaled = p.rescale(&zero_factor);
        assert!(bool::from(rescaled.eq_mod_2torsion(&p)));
    }
}
