// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Memory-hard key derivation for passwords, with secrets kept in locked,
//! zeroizing memory.
//!
//! # Features
//!
//! - **ROMix** - sequential table build plus data-dependent mix, so every
//!   parallel guess needs its own table
//! - **Self-calibration** - memory and iteration count tuned to a target
//!   duration on the host
//! - **Locked buffers** - secrets and lookup tables stay out of swap and
//!   core dumps (best effort) and are zeroed on every release path
//! - **Runtime hash selection** - SHA-2 and SHA-3, recorded in the
//!   persisted parameters
//!
//! # Installation
//!
//! ```toml
//! [dependencies]
//! romix = "0.1.0"
//! ```
//!
//! Cargo features select the modules: `buffer`, `rand`, `kdf`, or `full`
//! (default).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use core::time::Duration;
//! use romix::buffer::SecureBuffer;
//! use romix::kdf::{KdfParameters, MemoryHardKdf};
//! use romix::rand::SystemEntropySource;
//!
//! fn main() -> Result<(), romix::kdf::KdfError> {
//!     // Roughly a quarter of a second per derivation on this machine.
//!     let kdf = MemoryHardKdf::calibrate(
//!         Duration::from_millis(250),
//!         32 * 1024 * 1024,
//!         &SystemEntropySource {},
//!     )?;
//!
//!     let password = SecureBuffer::from("correct horse battery staple");
//!     let key = kdf.derive_key(&password)?;
//!
//!     // Persist the parameters; the same record and password give the same key.
//!     let record = kdf.params().encode()?;
//!     let later = MemoryHardKdf::new(KdfParameters::decode(record.as_slice())?)?;
//!     assert_eq!(later.derive_key(&password)?, key);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Memory Locking
//!
//! When the host refuses to lock memory the buffers keep working. The first
//! refusal is logged through `tracing` and
//! [`lock_failure_count`](crate::buffer::lock_failure_count) reports how
//! many regions were affected.

#[cfg(feature = "buffer")]
pub use romix_buffer as buffer;
#[cfg(feature = "kdf")]
pub use romix_kdf as kdf;
#[cfg(feature = "rand")]
pub use romix_rand as rand;
