// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! KdfParameters - the complete, validated input set of a derivation.

use core::fmt;

use romix_buffer::SecureBuffer;

use crate::error::KdfError;
use crate::hash::HashAlgorithm;

/// Cost and shape parameters of a ROMix derivation.
///
/// Every constructor validates; a value of this type always has a
/// non-empty lookup table, at least one pass and a non-empty output.
/// `step_count` is always `memory_bytes / hash_output_bytes`.
///
/// Any change to any field changes the derived key, so persisted
/// parameters must be restored verbatim (see [`KdfParameters::encode`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParameters {
    memory_bytes: usize,
    step_count: usize,
    salt: SecureBuffer,
    hash_algorithm: HashAlgorithm,
    output_bytes: usize,
    iteration_count: u32,
}

impl KdfParameters {
    /// Builds parameters, deriving `step_count` from `memory_bytes`.
    ///
    /// # Errors
    ///
    /// - [`KdfError::ZeroOutputLength`] / [`KdfError::OutputTooLong`]
    /// - [`KdfError::ZeroIterations`]
    /// - [`KdfError::MemoryBelowHashOutput`] when the table would be empty
    pub fn new(
        memory_bytes: usize,
        iteration_count: u32,
        salt: SecureBuffer,
        hash_algorithm: HashAlgorithm,
        output_bytes: usize,
    ) -> Result<Self, KdfError> {
        let step_count = Self::step_count_for(memory_bytes, hash_algorithm)?;

        let params = Self {
            memory_bytes,
            step_count,
            salt,
            hash_algorithm,
            output_bytes,
            iteration_count,
        };
        params.validate()?;

        Ok(params)
    }

    /// Rebuilds parameters from a stored record that carries `step_count`.
    ///
    /// # Errors
    ///
    /// Everything [`KdfParameters::new`] rejects, plus
    /// [`KdfError::ZeroStepCount`] and [`KdfError::StepCountMismatch`].
    pub fn from_persisted(
        memory_bytes: usize,
        step_count: usize,
        iteration_count: u32,
        salt: SecureBuffer,
        hash_algorithm: HashAlgorithm,
        output_bytes: usize,
    ) -> Result<Self, KdfError> {
        if step_count == 0 {
            return Err(KdfError::ZeroStepCount);
        }

        let params = Self::new(
            memory_bytes,
            iteration_count,
            salt,
            hash_algorithm,
            output_bytes,
        )?;

        if params.step_count != step_count {
            return Err(KdfError::StepCountMismatch {
                expected: params.step_count,
                found: step_count,
            });
        }

        Ok(params)
    }

    /// Returns the same parameters with a new memory budget.
    ///
    /// `step_count` is recomputed.
    pub fn with_memory_bytes(self, memory_bytes: usize) -> Result<Self, KdfError> {
        Self::new(
            memory_bytes,
            self.iteration_count,
            self.salt,
            self.hash_algorithm,
            self.output_bytes,
        )
    }

    fn step_count_for(
        memory_bytes: usize,
        hash_algorithm: HashAlgorithm,
    ) -> Result<usize, KdfError> {
        let hash_output_bytes = hash_algorithm.output_len();

        if memory_bytes < hash_output_bytes {
            return Err(KdfError::MemoryBelowHashOutput {
                memory_bytes,
                hash_output_bytes,
            });
        }

        Ok(memory_bytes / hash_output_bytes)
    }

    /// Re-checks every invariant.
    pub fn validate(&self) -> Result<(), KdfError> {
        if self.output_bytes == 0 {
            return Err(KdfError::ZeroOutputLength);
        }

        if u32::try_from(self.output_bytes).is_err() {
            return Err(KdfError::OutputTooLong(self.output_bytes));
        }

        if self.iteration_count == 0 {
            return Err(KdfError::ZeroIterations);
        }

        if self.step_count == 0 {
            return Err(KdfError::ZeroStepCount);
        }

        let expected = Self::step_count_for(self.memory_bytes, self.hash_algorithm)?;
        if expected != self.step_count {
            return Err(KdfError::StepCountMismatch {
                expected,
                found: self.step_count,
            });
        }

        Ok(())
    }

    /// Target lookup-table size in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.memory_bytes
    }

    /// Number of table entries (`memory_bytes / hash_output_bytes`).
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Salt mixed into the first hash.
    pub fn salt(&self) -> &SecureBuffer {
        &self.salt
    }

    /// Hash algorithm identifier.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    /// Name of the hash algorithm.
    pub fn hash_name(&self) -> &'static str {
        self.hash_algorithm.name()
    }

    /// Digest size of the hash algorithm.
    pub fn hash_output_bytes(&self) -> usize {
        self.hash_algorithm.output_len()
    }

    /// Length of the derived key.
    pub fn output_bytes(&self) -> usize {
        self.output_bytes
    }

    /// Number of chained full passes.
    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    /// Bytes actually allocated for the lookup table.
    pub fn table_bytes(&self) -> usize {
        self.step_count * self.hash_output_bytes()
    }
}

impl fmt::Display for KdfParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ROMix KDF parameters:")?;
        writeln!(f, "   HashFunc : {}", self.hash_algorithm)?;
        writeln!(f, "   Memory/thread: {} bytes", self.memory_bytes)?;
        writeln!(f, "   SequenceCount: {}", self.step_count)?;
        writeln!(f, "   NumIterations: {}", self.iteration_count)?;
        writeln!(f, "   KeyLength    : {} bytes", self.output_bytes)?;
        write!(f, "   Salt         : {}", self.salt.to_hex())
    }
}
