// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide record of memory-lock failures.
//!
//! Only the first failure is logged at `warn`; a KDF lookup table that
//! exceeds `RLIMIT_MEMLOCK` would otherwise warn on every derivation.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::RegionError;

static LOCK_FAILURES: AtomicUsize = AtomicUsize::new(0);

/// Returns how many buffer regions in this process could not be locked.
///
/// A non-zero value means some secret material may have been swappable.
/// Derived keys are unaffected; only swap resistance is weakened.
pub fn lock_failure_count() -> usize {
    LOCK_FAILURES.load(Ordering::Relaxed)
}

pub(crate) fn report_lock_failure(error: RegionError, bytes: usize, os_error: &std::io::Error) {
    let previous = LOCK_FAILURES.fetch_add(1, Ordering::Relaxed);

    if previous == 0 {
        tracing::warn!(
            %error,
            %os_error,
            bytes,
            "secure buffer is not locked in memory; secret bytes may be swapped to disk"
        );
    } else {
        tracing::debug!(
            %error,
            %os_error,
            bytes,
            failures = previous + 1,
            "secure buffer not locked"
        );
    }
}
