//! Variable-time windowed-NAF double-base scalar multiplication (spec
//! §4.10), used for signature verification where both scalars are public.
//!
//! Grounded in `goldilocks.c`'s `recode_wnaf`, `prepare_wnaf_table`,
//! `precompute_wnafs`, `base_double_scalarmul_non_secret`.
#![forbid(unsafe_code)]

use crate::constants::SCALAR_BITS;
use crate::edwards::Point;
use crate::field::Fe;
use crate::niels::{self, Niels, PNiels};
use crate::scalar::Scalar;

/// One entry of a recoded w-NAF control sequence: `power` is the bit
/// position the digit sits at (or -1 for the end marker), `addend` is the
/// signed odd digit (table index encoded as `addend >> 1` once the sign is
/// stripped).
#[derive(Clone, Copy, Debug)]
pub struct SmvtControl {
    pub power: i32,
    pub addend: i32,
}

/// Recodes `scalar` into a signed-digit w-NAF control sequence with digits
/// of width `table_bits + 1`. Variable-time: both the scalar and the
/// recoding are public in every caller (signature verification).
pub fn recode_wnaf(scalar: &Scalar, table_bits: u32) -> Vec<SmvtControl> {
    let table_size = SCALAR_BITS / (table_bits as usize + 1) + 3;
    let mut control = vec![SmvtControl { power: -1, addend: 0 }; table_size];
    let mut position = table_size as isize - 1;

    control[position as usize] = SmvtControl { power: -1, addend: 0 };
    position -= 1;

    let words = scalar.words64();
    const B_OVER_16: usize = 4;
    let mask: u32 = (1u32 << (table_bits + 1)) - 1;

    let mut current: u64 = words[0] & 0xFFFF;
    let w_limit = (SCALAR_BITS - 1) / 16 + 3;
    for w in 1..w_limit {
        if w < (SCALAR_BITS - 1) / 16 + 1 {
            let chunk = (words[w / B_OVER_16] >> (16 * (w % B_OVER_16))) & 0xFFFF;
            current += chunk << 16;
        }

        while current & 0xFFFF != 0 {
            let pos = (current as u32).trailing_zeros();
            let odd = (current >> pos) as u32;
            let mut delta = (odd & mask) as i32;
            if odd & (1 << (table_bits + 1)) != 0 {
                delta -= 1 << (table_bits + 1);
            }
            current = current.wrapping_sub(((delta as i64) << pos) as u64);
            debug_assert!(position >= 0);
            control[position as usize] =
                SmvtControl { power: pos as i32 + 16 * (w as i32 - 1), addend: delta };
            position -= 1;
        }
        current >>= 16;
    }
    debug_assert_eq!(current, 0);

    position += 1;
    let n = table_size as isize - position;
    let mut out = Vec::with_capacity(n as usize);
    for i in 0..n {
        out.push(control[(i + position) as usize]);
    }
    out
}

/// Builds the odd-multiples table `1*b, 3*b, ..., (2^(tbits+1)-1)*b` in
/// projective-Niels form for a single variable-time multiplication.
pub fn prepare_wnaf_table(base: &Point, tbits: u32) -> Vec<PNiels> {
    let size = 1usize << tbits;
    let mut output =
        vec![PNiels { n: Niels { a: Fe::ZERO, b: Fe::ZERO, c: Fe::ZERO }, z: Fe::ONE }; size];
    output[0] = niels::pt_to_pniels(base);
    if tbits == 0 {
        return output;
    }

    let mut tmp = base.double();
    let twop = niels::pt_to_pniels(&tmp);

    niels::add_pniels_to_pt(&mut tmp, &output[0], false);
    output[1] = niels::pt_to_pniels(&tmp);

    for entry in output.iter_mut().take(size).skip(2) {
        niels::add_pniels_to_pt(&mut tmp, &twop, false);
        *entry = niels::pt_to_pniels(&tmp);
    }

    output
}

/// Builds the normalized (affine) Niels table for a fixed base at the
/// crate's standard fixed-base w-NAF window width, batch-inverting the
/// denominators the same way the comb table does.
pub fn precompute_wnafs(base: &Point, tbits: u32) -> Vec<Niels> {
    let tmp = prepare_wnaf_table(base, tbits);
    let mut table: Vec<Niels> = tmp.iter().map(|pn| pn.n).collect();
    let zs: Vec<Fe> = tmp.iter().map(|pn| pn.z).collect();
    crate::comb::batch_normalize_niels(&mut table, &zs);
    table
}

/// `scalar1*wnaf_base_point + scalar2*base2`, in variable time. `wnaf_base`
/// must be a normalized fixed-base Niels table built by `precompute_wnafs`
/// at `table_bits` matching `constants::WNAF_FIXED_BITS`.
///
/// Not constant-time: both scalars and the base point are assumed public,
/// which is the case during signature verification.
pub fn base_double_scalarmul_non_secret(
    wnaf_base: &[Niels],
    scalar1: &Scalar,
    base2: &Point,
    scalar2: &Scalar,
    table_bits_pre: u32,
    table_bits_var: u32,
) -> Point {
    let control_pre = recode_wnaf(scalar1, table_bits_pre);
    let control_var = recode_wnaf(scalar2, table_bits_var);
    let precmp_var = prepare_wnaf_table(base2, table_bits_var);

    let mut contp = 0usize;
    let mut contv = 0usize;

    let mut i = control_var[0].power;
    let mut combo;

    if i < 0 {
        return Point::identity();
    } else if i > control_pre[0].power {
        combo = niels::pniels_to_pt(&precmp_var[(control_var[0].addend >> 1) as usize]);
        contv += 1;
    } else if i == control_pre[0].power {
        combo = niels::pniels_to_pt(&precmp_var[(control_var[0].addend >> 1) as usize]);
        niels::add_niels_to_pt(&mut combo, &wnaf_base[(control_pre[0].addend >> 1) as usize], i != 0);
        contv += 1;
        contp += 1;
    } else {
        i = control_pre[0].power;
        combo = niels::niels_to_pt(&wnaf_base[(control_pre[0].addend >> 1) as usize]);
        contp += 1;
    }

    i -= 1;
    while i >= 0 {
        let cv = i == control_var[contv].power;
        let cp = i == control_pre[contp].power;
        combo = combo.double_internal(i != 0 && !(cv || cp));

        if cv {
            let addend = control_var[contv].addend;
            if addend > 0 {
                niels::add_pniels_to_pt(&mut combo, &precmp_var[(addend >> 1) as usize], i != 0 && !cp);
            } else {
                niels::sub_pniels_from_pt(&mut combo, &precmp_var[((-addend) >> 1) as usize], i != 0 && !cp);
            }
            contv += 1;
        }

        if cp {
            let addend = control_pre[contp].addend;
            if addend > 0 {
                niels::add_niels_to_pt(&mut combo, &wnaf_base[(addend >> 1) as usize], i != 0);
            } else {
                niels::sub_niels_from_pt(&mut combo, &wnaf_base[((-addend) >> 1) as usize], i != 0);
            }
            contp += 1;
        }

        i -= 1;
    }

    combo
}
