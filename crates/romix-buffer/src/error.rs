// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for romix-buffer.
use romix_rand::EntropyError;
use thiserror::Error;

/// Errors from region syscalls.
///
/// These never abort a buffer operation: they are logged and the buffer
/// continues with a weaker backing.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum RegionError {
    /// `mmap` failed, the buffer fell back to the heap.
    #[error("mmap failed")]
    Map = 0,

    /// `mlock` failed, the region may be swapped out.
    #[error("mlock failed")]
    Lock = 1,

    /// `madvise(MADV_DONTDUMP)` failed, the region may appear in core dumps.
    #[error("madvise(MADV_DONTDUMP) failed")]
    Advise = 2,

    /// The platform offers no page locking for this backing.
    #[error("memory locking unsupported for this backing")]
    Unsupported = 3,
}

/// Errors that can occur when working with buffers.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum BufferError {
    /// The entropy source could not fill the buffer.
    #[error("entropy error: {0}")]
    Entropy(#[from] EntropyError),

    /// A requested range does not fit inside the buffer.
    #[error("range {start}..{end} out of bounds for buffer of length {len}")]
    OutOfRange {
        /// Inclusive start of the requested range.
        start: usize,
        /// Exclusive end of the requested range.
        end: usize,
        /// Length of the buffer.
        len: usize,
    },
}
