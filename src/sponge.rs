//! The Keccak sponge absorb/squeeze state machine (spec §4.2) and the six
//! named SHA-3/SHAKE parameter blocks.
#![forbid(unsafe_code)]

use crate::error::{barrier, Error};
use crate::keccak::{keccakf, STATE_BYTES};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flags {
    Absorbing,
    Squeezing,
}

/// A fixed parameter block selecting one of the six public sponge
/// instances (or the DRBG's `pad = 0xFF` mode).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    pub rate: usize,
    pub pad: u8,
    pub rate_pad: u8,
    /// Output limit in bytes, or `usize::MAX` standing in for the C
    /// original's `0xFF` "unlimited" sentinel.
    pub max_out: usize,
}

pub const SHAKE128: Params = Params { rate: 168, pad: 0x1f, rate_pad: 0x80, max_out: usize::MAX };
pub const SHAKE256: Params = Params { rate: 136, pad: 0x1f, rate_pad: 0x80, max_out: usize::MAX };
pub const SHA3_224: Params = Params { rate: 144, pad: 0x06, rate_pad: 0x80, max_out: 28 };
pub const SHA3_256: Params = Params { rate: 136, pad: 0x06, rate_pad: 0x80, max_out: 32 };
pub const SHA3_384: Params = Params { rate: 104, pad: 0x06, rate_pad: 0x80, max_out: 48 };
pub const SHA3_512: Params = Params { rate: 72, pad: 0x06, rate_pad: 0x80, max_out: 64 };

/// A Keccak sponge in one of its two operating modes.
pub struct Sponge {
    state: [u8; STATE_BYTES],
    params: Params,
    position: usize,
    flags: Flags,
    remaining: usize,
}

impl Sponge {
    pub fn new(params: Params) -> Sponge {
        Sponge {
            state: [0u8; STATE_BYTES],
            params,
            position: 0,
            flags: Flags::Absorbing,
            remaining: params.max_out,
        }
    }

    /// Absorb input bytes, permuting whenever `position` reaches `rate`.
    ///
    /// Calling this in squeezing mode is a contract violation: the state
    /// machine forbids resuming absorption once output framing has begun.
    pub fn update(&mut self, input: &[u8]) {
        debug_assert_eq!(self.flags, Flags::Absorbing, "update() called while squeezing");
        let mut remaining = input;
        while !remaining.is_empty() {
            let cando = self.params.rate - self.position;
            let n = cando.min(remaining.len());
            for i in 0..n {
                self.state[self.position + i] ^= remaining[i];
            }
            self.position += n;
            remaining = &remaining[n..];
            if self.position == self.params.rate {
                keccakf(&mut self.state, 0);
                self.position = 0;
            }
        }
    }

    /// Produce `out.len()` bytes of output, returning `Err` (without
    /// stopping early) if a bounded-output sponge is asked for more than
    /// its configured `max_out`.
    pub fn output(&mut self, out: &mut [u8]) -> Result<(), Error> {
        let len = out.len();
        let mut failed = false;
        if self.params.max_out != usize::MAX {
            if self.remaining >= len {
                self.remaining -= len;
            } else {
                self.remaining = 0;
                failed = true;
            }
        }

        if self.flags == Flags::Absorbing {
            self.state[self.position] ^= self.params.pad;
            self.state[self.params.rate - 1] ^= self.params.rate_pad;
            keccakf(&mut self.state, 0);
            self.flags = Flags::Squeezing;
        }

        let mut written = 0usize;
        while written < len {
            let cando = self.params.rate - self.position;
            let n = cando.min(len - written);
            out[written..written + n].copy_from_slice(&self.state[self.position..self.position + n]);
            self.position += n;
            written += n;
            if self.position == self.params.rate {
                keccakf(&mut self.state, 0);
                self.position = 0;
            }
        }

        if failed {
            Err(Error::TruncatedOutput)
        } else {
            Ok(())
        }
    }

    /// `output` followed by `reset`.
    pub fn finish(&mut self, out: &mut [u8]) -> Result<(), Error> {
        let r = self.output(out);
        self.reset();
        r
    }

    /// Re-initialize with the same parameter block.
    pub fn reset(&mut self) {
        let params = self.params;
        self.destroy();
        self.params = params;
        self.flags = Flags::Absorbing;
        self.position = 0;
        self.remaining = params.max_out;
    }

    /// Overwrite the full state with zeros.
    pub fn destroy(&mut self) {
        barrier(&mut self.state);
    }

    /// One-shot init -> update -> output -> destroy.
    pub fn hash(params: Params, input: &[u8], out: &mut [u8]) -> Result<(), Error> {
        let mut sponge = Sponge::new(params);
        sponge.update(input);
        let r = sponge.output(out);
        sponge.destroy();
        r
    }
}

impl Drop for Sponge {
    fn drop(&mut self) {
        self.destroy();
    }
}
