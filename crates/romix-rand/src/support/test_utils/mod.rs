// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Deterministic and failure-injecting entropy sources.

mod failing_entropy_source;
mod fixed_entropy_source;

pub use failing_entropy_source::{EntropyFault, FailingEntropySource, PARTIAL_FILL_BYTE};
pub use fixed_entropy_source::FixedEntropySource;
