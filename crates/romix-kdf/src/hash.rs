// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Hash capability consumed by the KDF.
//!
//! The algorithm is a runtime value carried by [`KdfParameters`](crate::KdfParameters),
//! not a compile-time choice, so one build can derive keys for records
//! calibrated with any supported hash.

use core::fmt;
use core::str::FromStr;

use sha2::Digest;
use sha2::digest::generic_array::GenericArray;

use crate::error::KdfError;

/// Fixed-output, one-way hash function.
pub trait HashFunction: Send + Sync {
    /// Digest size in bytes.
    fn output_len(&self) -> usize;

    /// Stable identifier of the algorithm.
    fn name(&self) -> &str;

    /// Hashes the concatenation of `parts` into `out`.
    ///
    /// `out` must be exactly [`output_len`](HashFunction::output_len) bytes.
    fn hash(&self, parts: &[&[u8]], out: &mut [u8]);
}

impl<T: HashFunction + ?Sized> HashFunction for &T {
    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn hash(&self, parts: &[&[u8]], out: &mut [u8]) {
        (**self).hash(parts, out)
    }
}

/// Supported hash algorithms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256 (32-byte digest).
    Sha256,
    /// SHA-512 (64-byte digest).
    #[default]
    Sha512,
    /// SHA3-256 (32-byte digest).
    Sha3_256,
    /// SHA3-512 (64-byte digest).
    Sha3_512,
}

impl HashAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_512,
    ];

    /// Digest size in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 => 64,
        }
    }

    /// Name used in persisted records.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Sha3_512 => "sha3-512",
        }
    }
}

fn digest_into<D: Digest>(parts: &[&[u8]], out: &mut [u8]) {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }

    hasher.finalize_into(GenericArray::from_mut_slice(out));
}

impl HashFunction for HashAlgorithm {
    fn output_len(&self) -> usize {
        HashAlgorithm::output_len(*self)
    }

    fn name(&self) -> &str {
        HashAlgorithm::name(*self)
    }

    fn hash(&self, parts: &[&[u8]], out: &mut [u8]) {
        debug_assert_eq!(out.len(), HashAlgorithm::output_len(*self));

        match self {
            HashAlgorithm::Sha256 => digest_into::<sha2::Sha256>(parts, out),
            HashAlgorithm::Sha512 => digest_into::<sha2::Sha512>(parts, out),
            HashAlgorithm::Sha3_256 => digest_into::<sha3::Sha3_256>(parts, out),
            HashAlgorithm::Sha3_512 => digest_into::<sha3::Sha3_512>(parts, out),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(HashAlgorithm::name(*self))
    }
}

impl FromStr for HashAlgorithm {
    type Err = KdfError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| KdfError::UnknownHashAlgorithm(name.to_string()))
    }
}
