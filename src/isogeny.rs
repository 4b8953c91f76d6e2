//! 4-isogeny transforms between the internal twisted curve and the two
//! external wire encodings (spec §4.8): the 57-byte EdDSA-style point
//! encoding and the 56-byte X448 u-coordinate projection.
//!
//! Grounded in `goldilocks.c`'s `point_mul_by_ratio_and_encode_like_eddsa`,
//! `point_decode_like_eddsa_and_mul_by_ratio`,
//! `point_mul_by_ratio_and_encode_like_x448`,
//! `goldilocks_ed448_convert_public_key_to_x448`.
#![forbid(unsafe_code)]

use subtle::{Choice, ConditionallyNegatable};

use crate::constants::EDWARDS_D;
use crate::edwards::Point;
use crate::field::Fe;

/// Length of the RFC 8032 Ed448 point/public-key encoding: a 56-byte
/// y-coordinate plus one byte carrying only the x sign bit.
pub const EDDSA_PUBLIC_BYTES: usize = 57;

/// `point_mul_by_ratio_and_encode_like_eddsa`: lifts a point on the
/// internal twisted curve through the 4-isogeny to the untwisted curve's
/// y-coordinate, and encodes it the way RFC 8032 encodes Ed448 points.
pub fn encode_like_eddsa(p: &Point) -> [u8; EDDSA_PUBLIC_BYTES] {
    let qx2 = p.x.sqr();
    let qy2 = p.y.sqr();
    let u = qx2.add(&qy2);
    let s = p.y.add(&p.x);
    let num_y = s.sqr().sub(&u); // 2xy
    let diff = qy2.sub(&qx2); // y^2 - x^2
    let qz2 = p.z.sqr();
    let two_qz2 = qz2.add(&qz2);
    let denom = two_qz2.sub(&diff); // 2z^2 - y^2 + x^2

    let reg_x = denom.mul(&num_y);
    let reg_y = diff.mul(&u);
    let reg_z = u.mul(&denom);

    let z_inv = reg_z.invert();
    let sign_source = reg_x.mul(&z_inv); // 2xy / (x^2+y^2)
    let value = reg_y.mul(&z_inv); // (y^2-x^2) / (2z^2-y^2+x^2)

    let mut enc = [0u8; EDDSA_PUBLIC_BYTES];
    enc[..56].copy_from_slice(&value.serialize());
    enc[56] = if bool::from(sign_source.lobit()) { 0x80 } else { 0 };
    enc
}

/// `point_decode_like_eddsa_and_mul_by_ratio`: the inverse of
/// [`encode_like_eddsa`]. Rejects non-canonical encodings, non-residues,
/// and points off the curve.
pub fn decode_like_eddsa_and_mul_by_ratio(enc: &[u8; EDDSA_PUBLIC_BYTES]) -> Option<Point> {
    let low = Choice::from(((enc[56] & 0x80) != 0) as u8);

    let mut y_bytes = [0u8; 56];
    y_bytes.copy_from_slice(&enc[..56]);
    let y_opt = Fe::deserialize(&y_bytes);
    let mut succ = y_opt.is_some();
    succ &= Choice::from(((enc[56] & 0x7f) == 0) as u8);
    let y = y_opt.unwrap_or(Fe::ZERO);

    let num = Fe::ONE.sub(&y.sqr());
    let dy2 = y.sqr().mulw_i32(EDWARDS_D);
    let denom = Fe::ONE.sub(&dy2);
    let num_den = num.mul(&denom);
    let isr = num_den.isr();
    succ &= isr.is_some();
    let r = isr.unwrap_or(Fe::ZERO);

    let mut x = r.mul(&num);
    x.conditional_negate(x.lobit() ^ low);

    // Lift the untwisted affine point (x, y, z=1) through the 4-isogeny
    // back into extended coordinates on the internal twisted curve.
    let ux = x;
    let uy = y;
    let uz = Fe::ONE;

    let c = ux.sqr();
    let a = uy.sqr();
    let d = c.add(&a);
    let tsum = uy.add(&ux);
    let mut b = tsum.sqr();
    b = b.sub(&d);
    let tdiff = a.sub(&c);
    let ztmp = uz.sqr();
    let ztmp2 = ztmp.add(&ztmp);
    let a2 = ztmp2.sub(&d);

    let p = Point {
        x: a2.mul(&b),
        y: tdiff.mul(&d),
        z: tdiff.mul(&a2),
        t: b.mul(&d),
    };

    succ &= p.is_valid();
    if bool::from(succ) {
        Some(p)
    } else {
        None
    }
}

/// `point_mul_by_ratio_and_encode_like_x448`: projects a point on the
/// internal twisted curve onto its Montgomery u-coordinate, `(y/x)^2`.
pub fn encode_like_x448(p: &Point) -> [u8; 56] {
    let x_inv = p.x.invert();
    let y_over_x = x_inv.mul(&p.y);
    let u = y_over_x.sqr();
    u.serialize()
}

/// `goldilocks_ed448_convert_public_key_to_x448`: converts a 57-byte Ed448
/// public key directly to its 56-byte X448 counterpart, without decoding
/// a full point. Operates on the encoded y-coordinate alone (the x sign
/// bit in byte 56 has no bearing on the resulting u-coordinate).
pub fn convert_ed448_public_key_to_x448(ed: &[u8; EDDSA_PUBLIC_BYTES]) -> [u8; 56] {
    let mut y_bytes = [0u8; 56];
    y_bytes.copy_from_slice(&ed[..56]);
    let y = Fe::deserialize(&y_bytes).unwrap_or(Fe::ZERO);

    let n = y.sqr();
    let one_minus_n = Fe::ONE.sub(&n);
    let inv = one_minus_n.invert();
    let y2 = n.mul(&inv); // y^2 / (1-y^2)
    let dn = n.mulw_i32(EDWARDS_D);
    let one_minus_dn = Fe::ONE.sub(&dn);
    let result = y2.mul(&one_minus_dn);
    result.serialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_like_eddsa_roundtrips_base_point() {
        let p = Point::base_point();
        let enc = encode_like_eddsa(&p);
        let dec = decode_like_eddsa_and_mul_by_ratio(&enc).expect("base point must decode");
        assert!(bool::from(dec.eq_mod_2torsion(&p)));
    }

    #[test]
    fn encode_decode_like_eddsa_roundtrips_double_base_point() {
        let p = Point::base_point().double();
        let enc = encode_like_eddsa(&p);
        let dec = decode_like_eddsa_and_mul_by_ratio(&enc).expect("2*base point must decode");
        assert!(bool::from(dec.eq_mod_2torsion(&p)));
    }

    #[test]
    fn decode_like_eddsa_rejects_garbage_high_bits() {
        let p = Point::base_point();
        let mut enc = encode_like_eddsa(&p);
        enc[56] |= 0x01; // a reserved bit that must be zero
        assert!(decode_like_eddsa_and_mul_by_ratio(&enc).is_none());
    }

    #[test]
    fn encode_like_x448_is_deterministic() {
        let p = Point::base_point();
        let a = encode_like_x448(&p);
        let b = encode_like_x448(&p);
        assert_eq!(a, b);
    }

    #[test]
    fn convert_public_key_matches_direct_x448_projection() {
        let p = Point::base_point();
        let eddsa_enc = encode_like_eddsa(&p);
        let via_convert = convert_ed448_public_key_to_x448(&eddsa_enc);
        let via_projection = encode_like_x448(&p);
        assert_eq!(via_convert, via_projection);
    }
}
