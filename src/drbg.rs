//! Sponge-based deterministic/seeded random byte generator (spec §4.3).
//!
//! Grounded in the teacher's `crypto::kmac_drbg::KmacDrbg` (same shape: a
//! secret-keyed stream construction implementing `RngCore`/`CryptoRng`,
//! zeroized on drop, reseedable), rebuilt directly on top of this crate's
//! own `Sponge` rather than going through a KMAC wrapper, matching spec
//! §3's "DRBG is a sponge in a distinguished mode (`pad = 0xFF`)".
#![forbid(unsafe_code)]

use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};

use rand_core::{CryptoRng, Error as RandError, RngCore};

use crate::error::{barrier, Error};
use crate::sponge::{Params, Sponge};

/// The DRBG's own parameter block: SHAKE256-sized rate, unbounded output,
/// `pad = 0xFF` so it can never be confused with a SHA-3/SHAKE instance.
const DRBG_PARAMS: Params = Params { rate: 136, pad: 0xFF, rate_pad: 0x80, max_out: usize::MAX };

/// A sponge-based DRBG.
///
/// In deterministic mode the same seed always yields the same output
/// stream. In non-deterministic mode every `read` is followed by absorbing
/// a fresh draw of entropy of the same length (see [`getrandom_fill`]'s
/// doc comment for what "entropy" means in this stand-in), so two DRBGs
/// seeded identically diverge after their first read -- the contract
/// spec §4.3 requires for callers sampling secret keys.
pub struct Drbg {
    sponge: Sponge,
    deterministic: bool,
}

impl Drbg {
    /// Seed the DRBG by absorbing `seed`.
    pub fn new(seed: &[u8], deterministic: bool) -> Drbg {
        let mut sponge = Sponge::new(DRBG_PARAMS);
        sponge.update(seed);
        Drbg { sponge, deterministic }
    }

    /// Seed the DRBG by reading `nbytes` of entropy from `source`.
    ///
    /// Returns `Error::EntropyFailure` if fewer bytes are available. The
    /// staging buffer is zeroized before returning on every path.
    pub fn from_reader<R: Read>(
        source: &mut R,
        nbytes: usize,
        deterministic: bool,
    ) -> Result<Drbg, Error> {
        let mut buf = vec![0u8; nbytes];
        let result = source.read_exact(&mut buf);
        let drbg = if result.is_ok() {
            Ok(Drbg::new(&buf, deterministic))
        } else {
            Err(Error::EntropyFailure)
        };
        barrier(&mut buf);
        drbg
    }

    /// Read `out.len()` bytes, zeroizing all intermediate state.
    pub fn read(&mut self, out: &mut [u8]) {
        // `output` on an unbounded sponge never fails.
        self.sponge.output(out).expect("DRBG sponge is unbounded");
        if !self.deterministic {
            let mut fresh = vec![0u8; out.len()];
            getrandom_fill(&mut fresh);
            self.sponge.update(&fresh);
            barrier(&mut fresh);
        }
    }

    pub fn reseed(&mut self, additional: &[u8]) {
        self.sponge.update(additional);
    }
}

/// Pulls externally-supplied entropy for non-deterministic reseeding.
///
/// Wiring this to an actual OS entropy source is explicitly out of scope
/// (spec §1's "wire-format RNG seeding from operating-system entropy
/// sources" non-goal). This stand-in fills `buf` with a process-wide
/// monotonic counter rather than real entropy -- enough to make successive
/// reads and identically-seeded instances actually diverge, which is the
/// property callers can observe and test, but it carries none of the
/// unpredictability real entropy would. Callers that need non-deterministic
/// mode in production must reseed explicitly via `reseed` with real entropy
/// instead of relying on this stand-in.
fn getrandom_fill(buf: &mut [u8]) {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes();
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = counter[i % counter.len()];
    }
}

impl RngCore for Drbg {
    fn next_u32(&mut self) -> u32 {
        let mut b = [0u8; 4];
        self.read(&mut b);
        u32::from_le_bytes(b)
    }

    fn next_u64(&mut self) -> u64 {
        let mut b = [0u8; 8];
        self.read(&mut b);
        u64::from_le_bytes(b)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.read(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.read(dest);
        Ok(())
    }
}

impl CryptoRng for Drbg {}

impl Drop for Drbg {
    fn drop(&mut self) {
        self.sponge.destroy();
    }
}
