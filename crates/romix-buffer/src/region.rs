// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! LockedRegion - owned backing storage for a SecureBuffer.
//!
//! Wraps an anonymous mmap'd region (Unix) or a heap allocation (fallback).
//! Creation applies mlock to either backing, plus madvise to mappings; drop
//! applies zeroize, munlock and munmap.
//! Each syscall is exposed separately for granular testing.

#[cfg(unix)]
use core::ptr::{self, NonNull};

use zeroize::Zeroize;

use crate::error::RegionError;
use crate::lock_status::report_lock_failure;

enum Storage {
    #[cfg(unix)]
    Mapped { ptr: NonNull<u8>, capacity: usize },
    Heap(Box<[u8]>),
}

/// Backing memory of a non-empty SecureBuffer.
///
/// The whole capacity is zero on creation and zero again before release.
pub(crate) struct LockedRegion {
    storage: Storage,
    locked: bool,
}

// Safety: LockedRegion exclusively owns its mapping; shared access is read-only.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    /// Allocates a zeroed region of at least `len` bytes and tries to lock it.
    ///
    /// Never fails: an unmappable region falls back to the heap, which is
    /// still locked if the host allows it, and an unlockable region is
    /// reported through `lock_status`.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "empty buffers own no region");

        #[cfg(unix)]
        {
            match Self::map(len) {
                Ok(mut region) => {
                    region.lock();
                    region.advise_dont_dump();
                    region
                }
                Err(os_error) => {
                    tracing::debug!(
                        error = %RegionError::Map,
                        %os_error,
                        len,
                        "falling back to heap backing"
                    );

                    let mut region = Self::heap(len);
                    region.lock();
                    region
                }
            }
        }

        #[cfg(not(unix))]
        {
            report_lock_failure(
                RegionError::Unsupported,
                len,
                &std::io::Error::from(std::io::ErrorKind::Unsupported),
            );
            Self::heap(len)
        }
    }

    fn heap(len: usize) -> Self {
        Self {
            storage: Storage::Heap(vec![0u8; len].into_boxed_slice()),
            locked: false,
        }
    }

    #[cfg(unix)]
    fn page_size() -> usize {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

        if size <= 0 { 4096 } else { size as usize }
    }

    #[cfg(unix)]
    fn map(len: usize) -> Result<Self, std::io::Error> {
        let page_size = Self::page_size();
        let capacity = len
            .checked_next_multiple_of(page_size)
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::OutOfMemory))?;

        let raw = unsafe {
            libc::mmap(
                ptr::null_mut(),
                capacity,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if raw == libc::MAP_FAILED {
            return Err(std::io::Error::last_os_error());
        }

        let ptr = NonNull::new(raw as *mut u8)
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::OutOfMemory))?;

        // Anonymous mappings are zero-filled by the kernel.
        Ok(Self {
            storage: Storage::Mapped { ptr, capacity },
            locked: false,
        })
    }

    /// Locks the region in RAM (prevents swapping to disk).
    ///
    /// A heap backing shares its first and last pages with neighbouring
    /// allocations; those pages stay locked or get unlocked along with it.
    #[cfg(unix)]
    fn lock(&mut self) {
        let bytes = self.as_slice();
        let (ptr, capacity) = (bytes.as_ptr(), bytes.len());

        let failed = unsafe { libc::mlock(ptr as *const libc::c_void, capacity) } != 0;

        if failed {
            report_lock_failure(RegionError::Lock, capacity, &std::io::Error::last_os_error());
            return;
        }

        self.locked = true;
    }

    /// Excludes the region from core dumps.
    #[cfg(unix)]
    fn advise_dont_dump(&self) {
        #[cfg(target_os = "linux")]
        {
            let Storage::Mapped { ptr, capacity } = self.storage else {
                return;
            };

            let failed = unsafe {
                libc::madvise(
                    ptr.as_ptr() as *mut libc::c_void,
                    capacity,
                    libc::MADV_DONTDUMP,
                )
            } != 0;

            if failed {
                tracing::debug!(
                    error = %RegionError::Advise,
                    os_error = %std::io::Error::last_os_error(),
                    capacity,
                    "region may appear in core dumps"
                );
            }
        }
    }

    /// Returns true if the region is locked in RAM.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns the usable size of the region in bytes.
    pub fn capacity(&self) -> usize {
        match &self.storage {
            #[cfg(unix)]
            Storage::Mapped { capacity, .. } => *capacity,
            Storage::Heap(bytes) => bytes.len(),
        }
    }

    /// Returns true if the region was mapped rather than heap allocated.
    pub fn is_mapped(&self) -> bool {
        match self.storage {
            #[cfg(unix)]
            Storage::Mapped { .. } => true,
            Storage::Heap(_) => false,
        }
    }

    /// Returns the whole capacity as a slice.
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            #[cfg(unix)]
            Storage::Mapped { ptr, capacity } => unsafe {
                core::slice::from_raw_parts(ptr.as_ptr(), *capacity)
            },
            Storage::Heap(bytes) => bytes,
        }
    }

    /// Returns the whole capacity as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            #[cfg(unix)]
            Storage::Mapped { ptr, capacity } => unsafe {
                core::slice::from_raw_parts_mut(ptr.as_ptr(), *capacity)
            },
            Storage::Heap(bytes) => bytes,
        }
    }

    /// Zeroizes the whole capacity.
    pub fn wipe(&mut self) {
        self.as_mut_slice().zeroize();
    }

    /// Zeroizes the region and drops its lock. Memory stays mapped.
    ///
    /// First half of release; split out so tests can inspect the bytes
    /// between scrubbing and unmapping.
    pub fn scrub(&mut self) {
        self.wipe();
        self.munlock();
    }

    fn munlock(&mut self) {
        #[cfg(unix)]
        if self.locked {
            let bytes = self.as_slice();
            unsafe { libc::munlock(bytes.as_ptr() as *const libc::c_void, bytes.len()) };
        }

        self.locked = false;
    }

    #[cfg(unix)]
    fn munmap(&mut self) {
        if let Storage::Mapped { ptr, capacity } = self.storage {
            unsafe { libc::munmap(ptr.as_ptr() as *mut libc::c_void, capacity) };
        }
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        self.scrub();

        #[cfg(any(test, feature = "test-utils"))]
        crate::support::test_utils::note_release(self.as_slice());

        #[cfg(unix)]
        self.munmap();
    }
}

impl core::fmt::Debug for LockedRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockedRegion")
            .field("capacity", &self.capacity())
            .field("mapped", &self.is_mapped())
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}
