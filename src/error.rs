//! Error kinds exposed at the public boundary, plus the zeroization barrier
//! helper shared across modules that handle secret material.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Failure modes a caller of this crate can observe.
///
/// `ContractViolation` is raised via `debug_assert!`/panic at the point of
/// misuse rather than returned, since it indicates a programming error in
/// the caller (e.g. driving the sponge state machine out of order), not a
/// recoverable runtime condition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Non-canonical, non-curve, or disallowed-identity input on decode.
    #[error("decode failure: input is not a valid canonical encoding")]
    DecodeFailure,
    /// A bounded-output sponge was asked for more bytes than configured.
    #[error("truncated output: requested more bytes than the sponge's max_out")]
    TruncatedOutput,
    /// DRBG file-based initialization could not read the requested bytes.
    #[error("entropy failure: could not read the requested number of bytes")]
    EntropyFailure,
}

/// Convenience alias for this crate's fallible public operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Defeats dead-store elimination on a buffer about to be dropped.
///
/// Rust's idiomatic analogue of the "irreducible memory-clobber barrier"
/// called for wherever a zero-fill is the last write before a value goes
/// out of scope. `zeroize::Zeroize` already does the real work (its impls
/// use a volatile write internally); this wraps the call in
/// `core::hint::black_box` so the optimizer can't prove the buffer is dead
/// and elide the zeroize itself, matching the spec's "irreducible barrier"
/// requirement without reaching for `unsafe`.
#[inline(always)]
pub fn barrier(buf: &mut [u8]) {
    use zeroize::Zeroize;
    buf.zeroize();
    core::hint::black_box(buf as *const _);
}
