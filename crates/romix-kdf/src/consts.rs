// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::time::Duration;

/// Default calibration target for one full key derivation.
pub const DEFAULT_TARGET_DURATION: Duration = Duration::from_millis(250);

/// Default cap on the lookup table size (32 MiB).
///
/// Hosts with less RAM must still be able to derive keys calibrated on
/// bigger machines, so memory saturates here and time absorbs the rest.
pub const DEFAULT_MAX_MEMORY_BYTES: usize = 32 * 1024 * 1024;

/// Smallest table tried during calibration.
pub const CALIBRATION_START_BYTES: usize = 1024;

/// Length of generated salts.
pub const DEFAULT_SALT_LEN: usize = 32;

/// Length of derived keys.
pub const DEFAULT_OUTPUT_BYTES: usize = 32;

/// Largest digest a hash function may produce.
pub const MAX_HASH_OUTPUT_BYTES: usize = 64;

/// Smallest digest a hash function may produce (the mix index needs 8 bytes).
pub const MIN_HASH_OUTPUT_BYTES: usize = 8;

/// Throwaway password hashed by calibration probes.
pub(crate) const CALIBRATION_PASSWORD: &[u8] = b"romix calibration probe";

/// Floor for a measured pass so a coarse clock cannot yield a zero divisor.
pub(crate) const MIN_MEASURED_PASS: Duration = Duration::from_micros(1);

pub(crate) const PERSISTED_MAGIC: &[u8; 4] = b"RMXK";
pub(crate) const PERSISTED_VERSION: u8 = 1;
