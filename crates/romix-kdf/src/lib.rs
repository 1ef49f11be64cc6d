// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # romix_kdf
//!
//! Memory-hard key derivation (ROMix) with host calibration.
//!
//! A derivation pass seeds a chain with `H(password || salt)`, builds a
//! lookup table of `step_count` chained hashes in locked memory, then walks
//! it `step_count` times at data-dependent indexes. Holding the whole table
//! is the cheap way to compute the result, which is what makes massively
//! parallel guessing expensive.
//!
//! ## Core Types
//!
//! - [`KdfParameters`]: memory, step count, salt, hash, output length, iterations
//! - [`MemoryHardKdf`]: single-pass and chained derivation
//! - [`Calibrator`] / [`CalibrationConfig`]: pick parameters for a target duration
//! - [`HashAlgorithm`] / [`HashFunction`]: runtime hash selection and the
//!   capability the KDF hashes through
//!
//! ## Example
//!
//! ```rust,no_run
//! use core::time::Duration;
//! use romix_buffer::SecureBuffer;
//! use romix_kdf::{KdfParameters, MemoryHardKdf};
//! use romix_rand::SystemEntropySource;
//!
//! let kdf = MemoryHardKdf::calibrate(
//!     Duration::from_millis(250),
//!     32 * 1024 * 1024,
//!     &SystemEntropySource {},
//! )?;
//! let key = kdf.derive_key(&SecureBuffer::from("correct horse"))?;
//!
//! // Store the record next to whatever the key protects.
//! let record = kdf.params().encode()?;
//! let restored = MemoryHardKdf::new(KdfParameters::decode(record.as_slice())?)?;
//! assert_eq!(restored.derive_key(&SecureBuffer::from("correct horse"))?, key);
//! # Ok::<(), romix_kdf::KdfError>(())
//! ```
//!
//! ## Calibration Bounds
//!
//! Calibration aims for a full derivation in `[target / 2, target]` on the
//! machine that calibrated. That is an estimate, not a guarantee.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod calibration;
mod codec;
mod consts;
mod error;
mod hash;
mod params;
mod romix;

#[cfg(any(test, feature = "test-utils"))]
pub mod support;

pub use calibration::{CalibrationConfig, Calibrator, CancellationToken};
pub use consts::{
    CALIBRATION_START_BYTES, DEFAULT_MAX_MEMORY_BYTES, DEFAULT_OUTPUT_BYTES, DEFAULT_SALT_LEN,
    DEFAULT_TARGET_DURATION, MAX_HASH_OUTPUT_BYTES, MIN_HASH_OUTPUT_BYTES,
};
pub use error::{DecodeError, KdfError};
pub use hash::{HashAlgorithm, HashFunction};
pub use params::KdfParameters;
pub use romix::MemoryHardKdf;

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
