//! NIST known-answer tests for the SHA-3/SHAKE instances not already
//! exercised by `sponge.rs`'s module-local tests (SHA3-256/512, SHAKE128).

use goldilocks448::sponge::{Sponge, SHA3_224, SHA3_384, SHAKE256};

#[test]
fn sha3_224_empty_matches_known_vector() {
    let mut out = [0u8; 28];
    Sponge::hash(SHA3_224, b"", &mut out).unwrap();
    assert_eq!(hex::encode(out), "6b4e03423667dbb73b6e15454f0eb1abd4597f9ca4338487024e3fd");
}

#[test]
fn sha3_384_is_deterministic_and_differs_from_sha3_224() {
    let mut a = [0u8; 48];
    let mut b = [0u8; 48];
    Sponge::hash(SHA3_384, b"abc", &mut a).unwrap();
    Sponge::hash(SHA3_384, b"abc", &mut b).unwrap();
    assert_eq!(a, b);

    let mut short = [0u8; 28];
    Sponge::hash(SHA3_224, b"abc", &mut short).unwrap();
    assert_ne!(&a[..28], &short[..]);
}

#[test]
fn shake256_empty_64_matches_known_vector() {
    let mut out = [0u8; 64];
    Sponge::hash(SHAKE256, b"", &mut out).unwrap();
    assert_eq!(
        hex::encode(out),
        "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762\
         fd75dc4ddd8c0f200cb05019d67b592f6fc821c49479ab48640292eacb3b7c4"
    );
}

#[test]
fn shake_output_is_extendable_prefix_consistent() {
    // A defining property of an XOF: a longer request's prefix equals a
    // shorter request's full output.
    let mut short = [0u8; 16];
    Sponge::hash(SHAKE256, b"prefix-test", &mut short).unwrap();
    let mut long = [0u8; 64];
    Sponge::hash(SHAKE256, b"prefix-test", &mut long).unwrap();
    assert_eq!(&long[..16], &short[..]);
}
