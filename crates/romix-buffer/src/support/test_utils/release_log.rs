// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::cell::RefCell;

/// A region as seen after scrubbing and before its memory is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasedRegion {
    /// Full capacity of the region, not just the buffer length.
    pub capacity: usize,
    /// True if every byte of the capacity was zero.
    pub all_zero: bool,
}

thread_local! {
    static RELEASES: RefCell<Option<Vec<ReleasedRegion>>> = const { RefCell::new(None) };
}

/// Runs `f` and returns every region released on this thread while it ran.
///
/// Recording is per thread: releases on other threads, including those of
/// concurrently running tests, are not seen. Calls nest; the inner call
/// captures its own releases only.
///
/// ```rust
/// use romix_buffer::SecureBuffer;
/// use romix_buffer::test_utils::record_releases;
///
/// let buffer = SecureBuffer::from("secret");
/// let capacity = buffer.capacity();
///
/// let ((), released) = record_releases(move || drop(buffer));
///
/// assert_eq!(released.len(), 1);
/// assert_eq!(released[0].capacity, capacity);
/// assert!(released[0].all_zero);
/// ```
pub fn record_releases<R>(f: impl FnOnce() -> R) -> (R, Vec<ReleasedRegion>) {
    let outer = RELEASES.with(|log| log.borrow_mut().replace(Vec::new()));
    let result = f();
    let released = RELEASES.with(|log| core::mem::replace(&mut *log.borrow_mut(), outer));

    (result, released.unwrap_or_default())
}

/// Called by the region drop path between scrub and unmap.
pub(crate) fn note_release(bytes: &[u8]) {
    // Thread-local storage is gone during thread teardown; nothing records then.
    let _ = RELEASES.try_with(|log| {
        if let Some(released) = log.borrow_mut().as_mut() {
            released.push(ReleasedRegion {
                capacity: bytes.len(),
                all_zero: bytes.iter().all(|&b| b == 0),
            });
        }
    });
}
