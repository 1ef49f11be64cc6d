// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Observation of region releases.

mod release_log;

pub(crate) use release_log::note_release;
pub use release_log::{ReleasedRegion, record_releases};
