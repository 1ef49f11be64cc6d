// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # romix_rand
//!
//! Secure random source capability for the romix stack.
//!
//! Randomness is never pulled from a global: every consumer receives an
//! [`EntropySource`] value, so salts and random buffers can be produced by
//! the OS CSPRNG in production and by deterministic fakes in tests.
//!
//! ## Core Types
//!
//! - [`SystemEntropySource`]: OS-level CSPRNG (via `getrandom`)
//! - [`EntropySource`]: Interface for CSPRNGs
//!
//! ## Example
//!
//! ```rust
//! use romix_rand::{EntropySource, SystemEntropySource};
//!
//! let entropy = SystemEntropySource {};
//!
//! let mut salt = [0u8; 32];
//! entropy.fill_bytes(&mut salt).expect("Failed to generate entropy");
//! ```
//!
//! ## Platform Support
//!
//! Supports all platforms via `getrandom`:
//! - Linux/Android: `getrandom()` syscall
//! - macOS/iOS: `getentropy()`
//! - Windows: `BCryptGenRandom`
//! - WASI: `random_get`

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod error;
mod system;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod support;

pub use error::EntropyError;
pub use system::SystemEntropySource;
pub use traits::EntropySource;

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
