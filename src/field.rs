//! GF(p) field arithmetic, p = 2^448 - 2^224 - 1.
//!
//! The rest of the crate treats `Fe` as the assumed-primitive field element
//! described by the specification (constant-time contract on every
//! operation); this module supplies a concrete implementation so the crate
//! is self-contained. Elements are stored as 8 limbs of 56 bits each
//! (radix 2^56), which leaves headroom for several unreduced additions
//! before a caller must call `weak_reduce`/`strong_reduce`.
#![forbid(unsafe_code)]

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

pub const LIMBS: usize = 8;
const LIMB_BITS: u32 = 56;
const MASK: u64 = (1u64 << LIMB_BITS) - 1;

/// A field element, 8 little-endian 56-bit limbs.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Fe(pub(crate) [u64; LIMBS]);

impl Fe {
    pub const ZERO: Fe = Fe([0; LIMBS]);
    pub const ONE: Fe = Fe([1, 0, 0, 0, 0, 0, 0, 0]);

    /// Builds an `Fe` from already-split 56-bit little-endian limbs.
    pub fn from_u64_limbs(limbs: &[u64; LIMBS]) -> Fe {
        Fe(*limbs)
    }

    pub fn from_u32(v: u32) -> Fe {
        let mut f = Fe::ZERO;
        f.0[0] = v as u64;
        f
    }

    /// Deserialize a canonical 56-byte little-endian encoding.
    ///
    /// Returns `None` (via a constant-time-converted boundary check) if the
    /// value is not the canonical representative, i.e. >= p.
    pub fn deserialize(bytes: &[u8; 56]) -> CtOption<Fe> {
        let mut limbs = [0u64; LIMBS];
        let mut bitpos = 0u32;
        let mut acc: u128 = 0;
        let mut accbits = 0u32;
        let mut limb_idx = 0usize;
        for &byte in bytes.iter() {
            acc |= (byte as u128) << accbits;
            accbits += 8;
            bitpos += 8;
            while accbits >= LIMB_BITS && limb_idx < LIMBS {
                limbs[limb_idx] = (acc & MASK as u128) as u64;
                acc >>= LIMB_BITS;
                accbits -= LIMB_BITS;
                limb_idx += 1;
            }
        }
        let _ = bitpos;
        let candidate = Fe(limbs);
        let canonical = candidate.is_canonical();
        CtOption::new(candidate, canonical)
    }

    /// Serializes to a canonical 56-byte little-endian encoding.
    pub fn serialize(&self) -> [u8; 56] {
        let reduced = self.strong_reduce();
        let mut out = [0u8; 56];
        let mut acc: u128 = 0;
        let mut accbits = 0u32;
        let mut outpos = 0usize;
        for &limb in reduced.0.iter() {
            acc |= (limb as u128) << accbits;
            accbits += LIMB_BITS;
            while accbits >= 8 {
                out[outpos] = (acc & 0xff) as u8;
                acc >>= 8;
                accbits -= 8;
                outpos += 1;
            }
        }
        out
    }

    fn is_canonical(&self) -> Choice {
        let reduced = self.strong_reduce();
        self.0.ct_eq(&reduced.0)
    }

    /// Reduce each limb into a data-independent small range without a final
    /// conditional subtraction of p. Cheap; leaves `self` in [0, 2p) loosely.
    pub fn weak_reduce(&self) -> Fe {
        let mut limbs = self.0;
        // Fold the overflow of limb 7 the same way multiplication folds its
        // high half: 2^(56*8) = 2^448 = 2^224 + 1 (mod p), i.e. limb 0 and
        // limb 4 each receive the carry out of limb 7.
        let mut carry = 0u64;
        for i in 0..LIMBS {
            let v = limbs[i] + carry;
            limbs[i] = v & MASK;
            carry = v >> LIMB_BITS;
        }
        limbs[0] = limbs[0].wrapping_add(carry);
        limbs[4] = limbs[4].wrapping_add(carry);
        let mut carry = 0u64;
        for i in 0..LIMBS {
            let v = limbs[i] + carry;
            limbs[i] = v & MASK;
            carry = v >> LIMB_BITS;
        }
        limbs[0] = limbs[0].wrapping_add(carry);
        Fe(limbs)
    }

    /// Fully reduce to the canonical representative in [0, p).
    pub fn strong_reduce(&self) -> Fe {
        let mut f = self.weak_reduce();
        // p = 2^448 - 2^224 - 1: subtract p by adding (2^224 + 1) and
        // dropping the top bit, conditioned on f >= p.
        let p_limbs = p_limbs();
        // Compute f - p with borrow; if no borrow, f >= p and we keep it.
        // The borrow-out of each limb is extracted from d's sign bit via a
        // shift, not a secret-dependent branch.
        let mut tmp = [0i128; LIMBS];
        let mut borrow: i128 = 0;
        for i in 0..LIMBS {
            let d = f.0[i] as i128 - p_limbs[i] as i128 - borrow;
            let borrow_out = (d >> 127) & 1;
            tmp[i] = d + (borrow_out << LIMB_BITS);
            borrow = borrow_out;
        }
        let ge = Choice::from((1 - borrow) as u8);
        for i in 0..LIMBS {
            let sub_val = tmp[i] as u64;
            f.0[i] = u64::conditional_select(&f.0[i], &sub_val, ge);
        }
        f
    }

    pub fn add(&self, other: &Fe) -> Fe {
        let mut out = [0u64; LIMBS];
        for i in 0..LIMBS {
            out[i] = self.0[i] + other.0[i];
        }
        Fe(out).weak_reduce()
    }

    pub fn sub(&self, other: &Fe) -> Fe {
        // a - b (mod p) = a + (2p - b), 2p limbs chosen so every limb stays
        // non-negative before the weak reduction normalizes them again.
        let two_p = two_p_limbs();
        let mut out = [0u64; LIMBS];
        for i in 0..LIMBS {
            out[i] = self.0[i] + two_p[i] - other.0[i];
        }
        Fe(out).weak_reduce()
    }

    pub fn negate(&self) -> Fe {
        Fe::ZERO.sub(self)
    }

    pub fn mul(&self, other: &Fe) -> Fe {
        let mut acc = [0u128; 2 * LIMBS - 1];
        for i in 0..LIMBS {
            for j in 0..LIMBS {
                acc[i + j] += (self.0[i] as u128) * (other.0[j] as u128);
            }
        }
        reduce_wide(&mut acc)
    }

    pub fn sqr(&self) -> Fe {
        self.mul(self)
    }

    /// Multiply by a small public word (used for curve constants like
    /// `EFF_D`). Never used on secret multiplicands beyond `self`.
    pub fn mulw(&self, w: u32) -> Fe {
        let w = w as u128;
        let mut out = [0u128; LIMBS + 1];
        for i in 0..LIMBS {
            out[i] = self.0[i] as u128 * w;
        }
        // Carry within a LIMBS+1-wide buffer, then fold the extra limb back
        // in using the same 2^448 = 2^224 + 1 identity as `reduce_wide`.
        let mut carry = 0u128;
        let mut limbs = [0u64; LIMBS];
        for i in 0..LIMBS {
            let v = out[i] + carry;
            limbs[i] = (v & MASK as u128) as u64;
            carry = v >> LIMB_BITS;
        }
        let mut result = Fe(limbs);
        let extra = carry as u64;
        result.0[0] = result.0[0].wrapping_add(extra);
        result.0[4] = result.0[4].wrapping_add(extra);
        result.weak_reduce()
    }

    /// Multiply by a small signed public word, e.g. curve constants given
    /// as negative integers (`TWISTED_D = -39082`).
    pub fn mulw_i32(&self, w: i32) -> Fe {
        if w >= 0 {
            self.mulw(w as u32)
        } else {
            self.mulw((-w) as u32).negate()
        }
    }

    /// Inverse square root: for x != 0, returns r with r^2 * x == 1 if x is
    /// a nonzero square, carried in the `CtOption`'s choice flag.
    pub fn isr(&self) -> CtOption<Fe> {
        let r = self.pow_isr_exponent();
        let check = r.sqr().mul(self);
        let valid = check.ct_eq(&Fe::ONE);
        CtOption::new(r, valid)
    }

    /// x^(p-2) via Fermat's little theorem; 0^(p-2) = 0.
    pub fn invert(&self) -> Fe {
        // p - 2 in the same 56-bit limb layout as ISR_EXPONENT, built from
        // the public field modulus: no secret-dependent branching since the
        // exponent bits are a compile-time constant, not caller data.
        self.pow(&p_minus_2_limbs())
    }

    /// x^((p-3)/4), used by `isr`.
    fn pow_isr_exponent(&self) -> Fe {
        self.pow(&isr_exponent_limbs())
    }

    /// Square-and-multiply exponentiation against a public (non-secret)
    /// exponent given as 56-bit little-endian limbs.
    fn pow(&self, exp_limbs: &[u64; LIMBS]) -> Fe {
        let mut result = Fe::ONE;
        let mut bit = (LIMBS as u32) * LIMB_BITS;
        while bit > 0 {
            bit -= 1;
            let limb = exp_limbs[(bit / LIMB_BITS) as usize];
            let b = (limb >> (bit % LIMB_BITS)) & 1;
            result = result.sqr();
            if b == 1 {
                result = result.mul(self);
            }
        }
        result
    }

    pub fn cond_select(a: &Fe, b: &Fe, choice: Choice) -> Fe {
        let mut out = [0u64; LIMBS];
        for i in 0..LIMBS {
            out[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Fe(out)
    }

    pub fn conditional_swap(a: &mut Fe, b: &mut Fe, choice: Choice) {
        for i in 0..LIMBS {
            u64::conditional_swap(&mut a.0[i], &mut b.0[i], choice);
        }
    }

    pub fn cond_negate(&mut self, choice: Choice) {
        let negated = self.negate();
        *self = Fe::cond_select(self, &negated, choice);
    }

    /// Low bit of the canonical representative.
    pub fn lobit(&self) -> Choice {
        let reduced = self.strong_reduce();
        Choice::from((reduced.0[0] & 1) as u8)
    }

    pub fn is_zero(&self) -> Choice {
        self.strong_reduce().0.ct_eq(&Fe::ZERO.0)
    }
}

impl ConstantTimeEq for Fe {
    fn ct_eq(&self, other: &Fe) -> Choice {
        self.strong_reduce().0.ct_eq(&other.strong_reduce().0)
    }
}

impl ConditionallySelectable for Fe {
    fn conditional_select(a: &Fe, b: &Fe, choice: Choice) -> Fe {
        Fe::cond_select(a, b, choice)
    }
}

impl ConditionallyNegatable for Fe {
    fn conditional_negate(&mut self, choice: Choice) {
        self.cond_negate(choice);
    }
}

impl PartialEq for Fe {
    fn eq(&self, other: &Fe) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for Fe {}

/// Reduces a double-width (15-limb) product using 2^448 = 2^224 + 1 (mod p):
/// a limb at index i >= 8 contributes to both limb i-8 and limb i-4.
fn reduce_wide(acc: &mut [u128; 2 * LIMBS - 1]) -> Fe {
    // First fold: indices 8..=14 -> {0..=6, 4..=10}.
    for i in (LIMBS..acc.len()).rev() {
        let v = acc[i];
        acc[i] = 0;
        acc[i - LIMBS] += v;
        acc[i - LIMBS / 2] += v;
    }
    // Second fold: the first pass can have pushed values into indices 8..10;
    // fold those back the same way.
    for i in (LIMBS..(LIMBS + LIMBS / 2)).rev() {
        let v = acc[i];
        acc[i] = 0;
        acc[i - LIMBS] += v;
        acc[i - LIMBS / 2] += v;
    }
    let mut limbs = [0u64; LIMBS];
    let mut carry: u128 = 0;
    for i in 0..LIMBS {
        let v = acc[i] + carry;
        limbs[i] = (v & MASK as u128) as u64;
        carry = v >> LIMB_BITS;
    }
    let mut f = Fe(limbs);
    let extra = carry as u64;
    f.0[0] = f.0[0].wrapping_add(extra);
    f.0[4] = f.0[4].wrapping_add(extra);
    f.weak_reduce()
}

fn p_limbs() -> [u64; LIMBS] {
    // p = 2^448 - 2^224 - 1: all-ones limbs except limb 4 (which loses the
    // bottom bit, accounting for the "-1") matches the textbook 56-bit split
    // of 2^448-2^224-1.
    [
        MASK,
        MASK,
        MASK,
        MASK,
        MASK - 1,
        MASK,
        MASK,
        MASK,
    ]
}

fn two_p_limbs() -> [u64; LIMBS] {
    let p = p_limbs();
    let mut out = [0u64; LIMBS];
    let mut carry = 0u64;
    for i in 0..LIMBS {
        let v = p[i] * 2 + carry;
        out[i] = v & MASK;
        carry = v >> LIMB_BITS;
    }
    out[0] = out[0].wrapping_add(carry);
    out
}

fn p_minus_2_limbs() -> [u64; LIMBS] {
    let mut p = p_limbs();
    p[0] -= 2;
    p
}

/// (p-3)/4, precomputed by hand from p = 2^448 - 2^224 - 1.
fn isr_exponent_limbs() -> [u64; LIMBS] {
    [
        0x00ffffffffffff,
        0x00ffffffffffff,
        0x00ffffffffffff,
        0x00bfffffffffff,
        0x00ffffffffffff,
        0x00ffffffffffff,
        0x00ffffffffffff,
        0x003fffffffffff,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_roundtrips() {
        let z = Fe::ZERO;
        let bytes = z.serialize();
        let back = Fe::deserialize(&bytes).unwrap();
        assert_eq!(z, back);
    }

    #[test]
    fn add_sub_inverse() {
        let a = Fe::from_u32(12345);
        let b = Fe::from_u32(998);
        let c = a.add(&b).sub(&b);
        assert_eq!(a, c);
    }

    #[test]
    fn mul_by_one_is_identity() {
        let a = Fe::from_u32(424242);
        assert_eq!(a.mul(&Fe::ONE), a);
    }

    #[test]
    fn invert_roundtrip() {
        let a = Fe::from_u32(7);
        let inv = a.invert();
        assert_eq!(a.mul(&inv), Fe::ONE);
    }

    #[test]
    fn isr_of_square_succeeds() {
        let a = Fe::from_u32(9);
        let sq = a.sqr();
        let r = sq.isr();
        assert!(bool::from(r.is_some()));
    }

    #[test]
    fn negate_is_additive_inverse() {
        let a = Fe::from_u32(5555);
        let sum = a.add(&a.negate());
        assert_eq!(sum, Fe::ZERO);
    }

    #[test]
    fn mulw_matches_repeated_add() {
        let a = Fe::from_u32(17);
        let by_mulw = a.mulw(39082);
        let by_mul = a.mul(&Fe::from_u32(39082));
        assert_eq!(by_mulw, by_mul);
    }
}
