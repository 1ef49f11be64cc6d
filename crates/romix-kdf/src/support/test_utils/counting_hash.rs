// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::hash::{HashAlgorithm, HashFunction};

/// Delegates to a [`HashAlgorithm`] and counts invocations.
///
/// Outputs are identical to the wrapped algorithm, so derived keys match
/// those of an uninstrumented KDF.
#[derive(Debug, Default)]
pub struct CountingHash {
    inner: HashAlgorithm,
    calls: AtomicUsize,
}

impl CountingHash {
    /// Wraps `inner` with a zeroed counter.
    pub fn new(inner: HashAlgorithm) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `hash` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Resets the counter to zero.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }
}

impl HashFunction for CountingHash {
    fn output_len(&self) -> usize {
        self.inner.output_len()
    }

    fn name(&self) -> &str {
        HashFunction::name(&self.inner)
    }

    fn hash(&self, parts: &[&[u8]], out: &mut [u8]) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        HashFunction::hash(&self.inner, parts, out);
    }
}
