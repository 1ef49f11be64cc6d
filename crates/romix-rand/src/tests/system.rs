// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::{EntropySource, SystemEntropySource};

#[test]
fn test_system_entropy_fills_buffer() {
    let entropy = SystemEntropySource {};
    let mut buf = [0u8; 64];

    entropy.fill_bytes(&mut buf).expect("Failed to fill_bytes(..)");

    // 64 zero bytes from a CSPRNG has probability 2^-512
    assert!(buf.iter().any(|&b| b != 0));
}

#[test]
fn test_system_entropy_consecutive_calls_differ() {
    let entropy = SystemEntropySource {};
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];

    entropy.fill_bytes(&mut a).expect("Failed to fill_bytes(..)");
    entropy.fill_bytes(&mut b).expect("Failed to fill_bytes(..)");

    assert_ne!(a, b);
}

#[test]
fn test_system_entropy_through_reference() {
    let entropy = SystemEntropySource {};
    let by_ref: &dyn EntropySource = &entropy;
    let mut buf = [0u8; 16];

    (&by_ref).fill_bytes(&mut buf).expect("Failed to fill_bytes(..)");
}
