// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for romix-kdf.

use romix_buffer::BufferError;
use romix_rand::EntropyError;
use thiserror::Error;

/// Errors decoding a persisted parameter record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The record ended before all fields were read.
    #[error("record truncated: needed {needed} more bytes")]
    Truncated {
        /// Bytes missing for the field being read.
        needed: usize,
    },

    /// The record does not start with the expected magic.
    #[error("bad magic")]
    BadMagic,

    /// The record version is not understood.
    #[error("unsupported record version {0}")]
    UnsupportedVersion(u8),

    /// Bytes remain after the last field.
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    /// A numeric field does not fit on this platform.
    #[error("field {0} out of range")]
    ValueOutOfRange(&'static str),

    /// The hash name is not valid UTF-8.
    #[error("hash name is not valid UTF-8")]
    InvalidHashName,
}

/// Errors from parameter validation, calibration and derivation.
///
/// Configuration variants are always reported before any derivation work
/// starts; they are never replaced by defaults.
#[derive(Debug, Error)]
pub enum KdfError {
    /// The calibration target is zero, negative or not finite.
    #[error("calibration target must be a positive, finite duration")]
    InvalidTargetDuration,

    /// The memory budget cannot hold a single hash output.
    #[error("memory budget of {memory_bytes} bytes is below one {hash_output_bytes}-byte hash output")]
    MemoryBelowHashOutput {
        /// Offending memory budget.
        memory_bytes: usize,
        /// Output size of the configured hash.
        hash_output_bytes: usize,
    },

    /// The lookup table would have no entries.
    #[error("step count is zero")]
    ZeroStepCount,

    /// A persisted step count disagrees with `memory_bytes / hash_output`.
    #[error("step count {found} does not match memory budget (expected {expected})")]
    StepCountMismatch {
        /// Step count implied by the memory budget.
        expected: usize,
        /// Step count found in the record.
        found: usize,
    },

    /// Zero chained passes were requested.
    #[error("iteration count is zero")]
    ZeroIterations,

    /// A zero-length key was requested.
    #[error("output length is zero")]
    ZeroOutputLength,

    /// The requested key length does not fit the persisted format.
    #[error("output length {0} exceeds u32::MAX")]
    OutputTooLong(usize),

    /// The hash name is not one of the supported algorithms.
    #[error("unknown hash algorithm {0:?}")]
    UnknownHashAlgorithm(String),

    /// A hash function produces a digest size the mix cannot use.
    #[error("hash output of {0} bytes is outside the supported 8..=64 range")]
    UnsupportedHashOutput(usize),

    /// An injected hash function disagrees with the configured algorithm.
    #[error("hash output of {found} bytes does not match configured {expected} bytes")]
    HashOutputMismatch {
        /// Output size of the configured algorithm.
        expected: usize,
        /// Output size of the injected hash function.
        found: usize,
    },

    /// A persisted record could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Salt generation failed.
    #[error("entropy error: {0}")]
    Entropy(#[from] EntropyError),

    /// A buffer operation failed.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// Calibration was cancelled through its token.
    #[error("calibration cancelled")]
    CalibrationCancelled,

    /// Calibration exceeded its timeout.
    #[error("calibration timed out")]
    CalibrationTimedOut,
}
