// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Exhaustive tests for LockedRegion.

use crate::region::LockedRegion;
use crate::test_utils::record_releases;

// =============================================================================
// new()
// =============================================================================

#[test]
fn test_new_region_is_zeroized() {
    let region = LockedRegion::new(100);

    assert!(region.as_slice().iter().all(|&b| b == 0));
}

#[test]
fn test_capacity_covers_requested_len() {
    for len in [1usize, 31, 4096, 4097, 65_536] {
        let region = LockedRegion::new(len);

        assert!(region.capacity() >= len);
        assert_eq!(region.as_slice().len(), region.capacity());
    }
}

#[cfg(unix)]
#[test]
fn test_capacity_is_page_multiple() {
    let system_page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
    let region = LockedRegion::new(system_page_size + 1);

    assert!(region.is_mapped());
    assert_eq!(region.capacity(), 2 * system_page_size);
}

// =============================================================================
// as_slice() / as_mut_slice()
// =============================================================================

#[test]
fn test_as_mut_slice_allows_writes() {
    let mut region = LockedRegion::new(16);

    {
        let slice = region.as_mut_slice();
        slice[0] = 0xAB;
        slice[15] = 0xCD;
    }

    assert_eq!(region.as_slice()[0], 0xAB);
    assert_eq!(region.as_slice()[15], 0xCD);
}

#[test]
fn test_write_read_full_capacity() {
    let mut region = LockedRegion::new(256);

    region.as_mut_slice().fill(0x55);

    assert!(region.as_slice().iter().all(|&b| b == 0x55));
}

// =============================================================================
// wipe() / scrub()
// =============================================================================

#[test]
fn test_wipe_clears_all_data() {
    let mut region = LockedRegion::new(512);

    region.as_mut_slice().fill(0xFF);
    region.wipe();

    assert!(region.as_slice().iter().all(|&b| b == 0));
}

#[test]
fn test_scrub_zeroizes_and_unlocks() {
    let mut region = LockedRegion::new(64);
    region.as_mut_slice().fill(0xFF);

    region.scrub();

    assert!(!region.is_locked());
    assert!(region.as_slice().iter().all(|&b| b == 0));
}

#[test]
fn test_scrub_is_idempotent() {
    let mut region = LockedRegion::new(64);

    region.scrub();
    region.scrub();

    assert!(!region.is_locked());
}

/// Captures the backing address, runs the release path up to the point
/// where the memory would be handed back, then inspects it through the
/// captured pointer.
#[test]
fn test_release_path_leaves_no_nonzero_byte() {
    let mut region = LockedRegion::new(4096);
    region.as_mut_slice().fill(0xC3);

    let ptr = region.as_slice().as_ptr();
    let capacity = region.capacity();

    region.scrub();

    let observed = unsafe { core::slice::from_raw_parts(ptr, capacity) };
    assert!(observed.iter().all(|&b| b == 0));
}

// =============================================================================
// Drop
// =============================================================================

#[test]
fn test_drop_scrubs_before_unmapping() {
    let mut region = LockedRegion::new(3 * 4096 + 1);
    region.as_mut_slice().fill(0xC3);
    let capacity = region.capacity();

    let ((), released) = record_releases(move || drop(region));

    assert_eq!(released.len(), 1);
    assert_eq!(released[0].capacity, capacity);
    assert!(released[0].all_zero);
}

#[test]
fn test_record_releases_nests() {
    let outer_region = LockedRegion::new(8);

    let (inner, outer) = record_releases(|| {
        let ((), inner) = record_releases(|| drop(LockedRegion::new(8)));
        drop(outer_region);
        inner
    });

    assert_eq!(inner.len(), 1);
    assert_eq!(outer.len(), 1);
}

#[test]
fn test_drop_many_regions() {
    for len in 1..64 {
        let mut region = LockedRegion::new(len * 97);
        region.as_mut_slice().fill(len as u8);
        drop(region);
    }
}

#[test]
fn test_debug_does_not_leak_contents() {
    let mut region = LockedRegion::new(8);
    region.as_mut_slice().copy_from_slice(b"DEADBEEF");

    let debug = format!("{:?}", region);

    assert!(debug.contains("LockedRegion"));
    assert!(!debug.contains("DEADBEEF"));
}
