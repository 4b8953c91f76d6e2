//! RFC 7748 section 5.2 known-answer tests for the X448 ladder.

use goldilocks448::montgomery;

#[test]
fn iterated_x448_matches_rfc7748_first_iteration() {
    let k = hex_literal::hex!(
        "3d262fddf9ec8e88495266fea19a34d28882acef045104d0d1aae121700a779"
        "c984c24f8cdd78fbff44943eba368f54b29259a4f1c600ad3"
    );
    let u = hex_literal::hex!(
        "06fce640fa3487bfda5f6cf2d5263f8aad88334cbd07437f020f08f9814dc03"
        "1ddbdc38c19c6da2583fa5429db94ada18aa7a7fb4ef8a086"
    );
    let expected = hex_literal::hex!(
        "ce3e4ff95a60dc6697da1db1d85e6afbdf79b50a2412d7546d5f239fe14fba"
        "dd18f49822d9a1dfa8f7d0ff0010c1e2ec0cf5b0be5e1ff6b"
    );
    let out = montgomery::x448(&u, &k).expect("ladder must succeed");
    assert_eq!(&out[..], &expected[..]);
}

#[test]
fn x448_derive_public_key_matches_the_ladder_for_rfc7748_alice_private_key() {
    // RFC 7748 section 6.2's published Alice private key.
    let sk = hex_literal::hex!(
        "9a8f4925d1519f5775cf46b04b5800d4ee9ee8bae8bc5565d498c28dd9c9baf"
        "574a9419744897391006382a6f127ab1d9ac2d8c0a598726b"
    );

    // `derive_public_key` walks the comb fixed-base scalarmul plus the
    // isogeny u-coordinate encoder; cross-check it against the raw
    // Montgomery ladder run directly on the X448 base point (u = 5), the
    // same ladder already checked above against the section 5.2 vector.
    // Two independently-coded paths to the same public key agreeing is a
    // real test of `derive_public_key`'s "hard core" path, unlike asserting
    // a pure function returns the same thing twice.
    let mut base = [0u8; 56];
    base[0] = 5;
    let via_ladder = montgomery::x448(&base, &sk).expect("ladder must succeed");
    let via_comb = montgomery::derive_public_key(&sk);
    assert_eq!(via_comb, via_ladder);
}

#[test]
fn x448_rejects_the_zero_u_coordinate() {
    // u = 0 is a low-order point; every scalar multiple of it is 0, which
    // the ladder must reject rather than silently return.
    let u = [0u8; 56];
    let k = [5u8; 56];
    assert!(montgomery::x448(&u, &k).is_err());
}
