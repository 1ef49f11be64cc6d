// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Byte buffers for secret material.
//!
//! [`SecureBuffer`] owns its bytes exclusively and keeps them in a region
//! that is locked against swap-out for as long as the buffer is non-empty.
//! Every path that gives up a region (resize, reassignment, explicit
//! release, drop) zeroes it before unlocking and unmapping.
//!
//! # Backing Regions
//!
//! On Unix the backing is a page-aligned anonymous `mmap`:
//! - `mlock` keeps the pages resident
//! - `madvise(MADV_DONTDUMP)` keeps them out of core dumps (Linux)
//! - growth within the mapped capacity happens in place
//!
//! When mapping is not possible (non-Unix targets, `mmap` failure) the
//! buffer falls back to a heap allocation with the same zeroization rules.
//!
//! # Lock Failures
//!
//! Locking is best effort. If the host refuses `mlock` (for example
//! `RLIMIT_MEMLOCK` is exhausted) the buffer stays fully usable, the first
//! failure in the process is logged with `tracing::warn!` and every failure
//! increments [`lock_failure_count`].
//!
//! # Example
//!
//! ```rust
//! use romix_buffer::SecureBuffer;
//!
//! let mut password = SecureBuffer::from("correct horse");
//! password.extend_from_slice(b" battery staple");
//!
//! assert_eq!(password.as_slice(), b"correct horse battery staple");
//!
//! // Zeroized, unlocked and unmapped right now instead of at drop.
//! password.wipe_and_release();
//! assert!(password.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod error;
mod lock_status;
mod region;
mod secure_buffer;

#[cfg(any(test, feature = "test-utils"))]
pub mod support;

pub use error::{BufferError, RegionError};
pub use lock_status::lock_failure_count;
pub use secure_buffer::SecureBuffer;

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
