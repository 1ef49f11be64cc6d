// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::cell::Cell;

use crate::error::EntropyError;
use crate::traits::EntropySource;

/// Byte written by [`EntropyFault::AfterBytes`] before it fails.
pub const PARTIAL_FILL_BYTE: u8 = 0xE7;

/// How a [`FailingEntropySource`] breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyFault {
    /// Fails without touching the destination.
    Immediately,
    /// Writes [`PARTIAL_FILL_BYTE`] into the first `n` bytes of the
    /// destination, then fails.
    ///
    /// Leaves a half-filled buffer behind, which is what a source dying
    /// mid-read does to its caller.
    AfterBytes(usize),
}

/// Entropy source that never succeeds.
///
/// Counts calls so tests can tell whether a consumer asked for randomness
/// at all.
#[derive(Debug)]
pub struct FailingEntropySource {
    fault: EntropyFault,
    calls: Cell<usize>,
}

impl FailingEntropySource {
    /// Creates a source failing with `fault` on every call.
    pub fn new(fault: EntropyFault) -> Self {
        Self {
            fault,
            calls: Cell::new(0),
        }
    }

    /// Number of `fill_bytes` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl EntropySource for FailingEntropySource {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.calls.set(self.calls.get() + 1);

        if let EntropyFault::AfterBytes(n) = self.fault {
            let n = n.min(dest.len());
            dest[..n].fill(PARTIAL_FILL_BYTE);
        }

        Err(EntropyError::EntropyNotAvailable)
    }
}
