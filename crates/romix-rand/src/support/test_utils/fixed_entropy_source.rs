// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use zeroize::Zeroize;

use crate::error::EntropyError;
use crate::traits::EntropySource;

/// Deterministic entropy source that repeats a fixed pattern.
///
/// Every call to `fill_bytes` restarts the pattern, so two buffers of the
/// same length always receive the same bytes.
pub struct FixedEntropySource {
    pattern: Vec<u8>,
}

impl FixedEntropySource {
    /// Creates a source cycling over `pattern`. An empty pattern yields zeros.
    pub fn new(pattern: &[u8]) -> Self {
        Self {
            pattern: pattern.to_vec(),
        }
    }

    /// Creates a source that only produces zero bytes.
    pub fn zeros() -> Self {
        Self::new(&[])
    }
}

impl Drop for FixedEntropySource {
    fn drop(&mut self) {
        self.pattern.zeroize();
    }
}

impl EntropySource for FixedEntropySource {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        if self.pattern.is_empty() {
            dest.fill(0);
            return Ok(());
        }

        for (byte, value) in dest.iter_mut().zip(self.pattern.iter().cycle()) {
            *byte = *value;
        }

        Ok(())
    }
}
