//! End-to-end round-trips across the public group-arithmetic surface:
//! scalar multiplication composed with both wire encodings.

use goldilocks448::{comb::Comb, edwards::Point, isogeny, scalar::Scalar, scalarmul, wnaf};

#[test]
fn decaf_encoding_roundtrips_many_small_multiples() {
    let base = Point::base_point();
    for k in 1u64..20 {
        let s = Scalar::from_u64_limbs(&[k, 0, 0, 0, 0, 0, 0, 0]);
        let p = scalarmul::scalarmul(&base, &s);
        let enc = p.encode();
        let dec = Point::decode(&enc, false).unwrap_or_else(|| panic!("multiple {k} failed to decode"));
        assert!(bool::from(dec.eq_mod_2torsion(&p)));
    }
}

#[test]
fn eddsa_style_encoding_roundtrips_many_small_multiples() {
    let base = Point::base_point();
    for k in 1u64..20 {
        let s = Scalar::from_u64_limbs(&[k, 0, 0, 0, 0, 0, 0, 0]);
        let p = scalarmul::scalarmul(&base, &s);
        let enc = isogeny::encode_like_eddsa(&p);
        let dec = isogeny::decode_like_eddsa_and_mul_by_ratio(&enc)
            .unwrap_or_else(|| panic!("multiple {k} failed to decode"));
        assert!(bool::from(dec.eq_mod_2torsion(&p)));
    }
}

#[test]
fn comb_and_ladder_agree_on_a_random_looking_scalar() {
    let base = Point::base_point();
    let s = Scalar::from_u64_limbs(&[0x1234_5678_9abc_def0, 0xfedc, 0, 0, 0, 0, 0, 0]);

    let via_comb = Comb::precompute(&base).scalarmul(&s);
    let via_ladder = scalarmul::scalarmul(&base, &s);
    assert!(bool::from(via_comb.eq_mod_2torsion(&via_ladder)));
}

#[test]
fn wnaf_verification_path_agrees_with_constant_time_double_scalarmul() {
    use goldilocks448::constants::{WNAF_FIXED_BITS, WNAF_VAR_BITS};

    let base = Point::base_point();
    let other = base.double().double();
    let s1 = Scalar::from_u64_limbs(&[123456, 0, 0, 0, 0, 0, 0, 0]);
    let s2 = Scalar::from_u64_limbs(&[654321, 0, 0, 0, 0, 0, 0, 0]);

    let wnaf_table = wnaf::precompute_wnafs(&base, WNAF_FIXED_BITS as u32);
    let via_wnaf = wnaf::base_double_scalarmul_non_secret(
        &wnaf_table,
        &s1,
        &other,
        &s2,
        WNAF_FIXED_BITS as u32,
        WNAF_VAR_BITS as u32,
    );
    let via_double = scalarmul::double_scalarmul(&base, &s1, &other, &s2);
    assert!(bool::from(via_wnaf.eq_mod_2torsion(&via_double)));
}
