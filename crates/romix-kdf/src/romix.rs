// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! MemoryHardKdf - ROMix build, mix and chained derivation.

use core::time::Duration;

use romix_buffer::SecureBuffer;
use romix_rand::EntropySource;
use zeroize::Zeroizing;

use crate::calibration::{CalibrationConfig, Calibrator};
use crate::consts::{MAX_HASH_OUTPUT_BYTES, MIN_HASH_OUTPUT_BYTES};
use crate::error::KdfError;
use crate::hash::{HashAlgorithm, HashFunction};
use crate::params::KdfParameters;

/// Memory-hard key derivation over a fixed parameter set.
///
/// The lookup table is allocated in locked memory at the start of each
/// pass and wiped before the pass returns; nothing table-sized outlives a
/// call. Instances hold no mutable state, so one instance can serve
/// concurrent derivations, each paying for its own table.
///
/// # Example
///
/// ```rust
/// use romix_buffer::SecureBuffer;
/// use romix_kdf::{HashAlgorithm, KdfParameters, MemoryHardKdf};
///
/// let salt = SecureBuffer::from_slice(&[0u8; 16]);
/// let params = KdfParameters::new(4 * 64, 1, salt, HashAlgorithm::Sha512, 32)?;
/// let kdf = MemoryHardKdf::new(params)?;
///
/// let key = kdf.derive_key(&SecureBuffer::from("correct horse"))?;
/// assert_eq!(key.len(), 32);
/// # Ok::<(), romix_kdf::KdfError>(())
/// ```
#[derive(Debug)]
pub struct MemoryHardKdf<H: HashFunction = HashAlgorithm> {
    params: KdfParameters,
    hash: H,
}

impl MemoryHardKdf<HashAlgorithm> {
    /// Creates a KDF hashing with the algorithm named by `params`.
    pub fn new(params: KdfParameters) -> Result<Self, KdfError> {
        let hash = params.hash_algorithm();
        Self::with_hash(params, hash)
    }

    /// Calibrates fresh parameters against this host and wraps them.
    ///
    /// Uses the default hash, salt length and output length; see
    /// [`Calibrator`] for full control, cancellation and timeouts.
    ///
    /// # Errors
    ///
    /// - [`KdfError::InvalidTargetDuration`] if `target` is zero
    /// - [`KdfError::MemoryBelowHashOutput`] if `max_memory_bytes` cannot
    ///   hold one hash output
    /// - [`KdfError::Entropy`] if salt generation fails
    pub fn calibrate<E>(
        target: Duration,
        max_memory_bytes: usize,
        entropy: &E,
    ) -> Result<Self, KdfError>
    where
        E: EntropySource + ?Sized,
    {
        let config = CalibrationConfig::new(target, max_memory_bytes);
        let params = Calibrator::new(config).calibrate(entropy)?;

        Self::new(params)
    }
}

impl<H: HashFunction> MemoryHardKdf<H> {
    /// Creates a KDF with an explicit hash implementation.
    ///
    /// # Errors
    ///
    /// - [`KdfError::UnsupportedHashOutput`] if the digest is not 8..=64 bytes
    /// - [`KdfError::HashOutputMismatch`] if the digest size differs from the
    ///   algorithm recorded in `params`
    pub fn with_hash(params: KdfParameters, hash: H) -> Result<Self, KdfError> {
        let found = hash.output_len();
        if !(MIN_HASH_OUTPUT_BYTES..=MAX_HASH_OUTPUT_BYTES).contains(&found) {
            return Err(KdfError::UnsupportedHashOutput(found));
        }

        let expected = params.hash_output_bytes();
        if found != expected {
            return Err(KdfError::HashOutputMismatch { expected, found });
        }

        params.validate()?;

        Ok(Self { params, hash })
    }

    /// The parameter set.
    pub fn params(&self) -> &KdfParameters {
        &self.params
    }

    /// The hash implementation.
    pub fn hash(&self) -> &H {
        &self.hash
    }

    /// Consumes the KDF, returning its parameters (e.g. for persisting).
    pub fn into_params(self) -> KdfParameters {
        self.params
    }

    /// Runs one ROMix pass over `password`.
    ///
    /// An empty password is hashed as the empty string.
    pub fn derive_one_pass(&self, password: &SecureBuffer) -> Result<SecureBuffer, KdfError> {
        one_pass(&self.hash, &self.params, password.as_slice())
    }

    /// Chains `iteration_count` passes, each pass's output being the next
    /// pass's password. The salt is the same for every pass.
    pub fn derive_key(&self, password: &SecureBuffer) -> Result<SecureBuffer, KdfError> {
        tracing::trace!(
            step_count = self.params.step_count(),
            iteration_count = self.params.iteration_count(),
            "deriving key"
        );

        let mut key = self.derive_one_pass(password)?;
        for _ in 1..self.params.iteration_count() {
            // Reassignment drops, and so zeroizes, the previous pass output.
            key = one_pass(&self.hash, &self.params, key.as_slice())?;
        }

        Ok(key)
    }
}

/// One full ROMix pass: seed, sequential build, random-access mix, output shaping.
pub(crate) fn one_pass<H>(
    hash: &H,
    params: &KdfParameters,
    password: &[u8],
) -> Result<SecureBuffer, KdfError>
where
    H: HashFunction + ?Sized,
{
    params.validate()?;

    let h = hash.output_len();
    let step_count = params.step_count();
    debug_assert!((MIN_HASH_OUTPUT_BYTES..=MAX_HASH_OUTPUT_BYTES).contains(&h));

    let mut table = SecureBuffer::create(step_count * h);
    build_table(hash, password, params.salt().as_slice(), table.as_mut_slice(), h);

    let mut y = Zeroizing::new([0u8; MAX_HASH_OUTPUT_BYTES]);
    let mut mixed = Zeroizing::new([0u8; MAX_HASH_OUTPUT_BYTES]);
    let y = &mut y[..h];
    let mixed = &mut mixed[..h];

    y.copy_from_slice(&table.as_slice()[(step_count - 1) * h..]);

    for _ in 0..step_count {
        let idx = mix_index(y, step_count);
        let entry = &table.as_slice()[idx * h..(idx + 1) * h];

        for ((m, a), b) in mixed.iter_mut().zip(y.iter()).zip(entry) {
            *m = a ^ b;
        }

        hash.hash(&[&*mixed], y);
    }

    table.wipe_and_release();

    Ok(shape_output(hash, y, params.output_bytes()))
}

/// `table[0] = H(password || salt)`, `table[i] = H(table[i - 1])`.
fn build_table<H>(hash: &H, password: &[u8], salt: &[u8], table: &mut [u8], h: usize)
where
    H: HashFunction + ?Sized,
{
    hash.hash(&[password, salt], &mut table[..h]);

    for offset in (h..table.len()).step_by(h) {
        let (built, rest) = table.split_at_mut(offset);
        hash.hash(&[&built[offset - h..]], &mut rest[..h]);
    }
}

/// Trailing 8 bytes of `y` as a little-endian u64, reduced into the table.
fn mix_index(y: &[u8], step_count: usize) -> usize {
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&y[y.len() - 8..]);

    (u64::from_le_bytes(tail) % step_count as u64) as usize
}

/// Returns `y` when the sizes agree, else `H(y || counter_be32)` blocks truncated.
fn shape_output<H>(hash: &H, y: &[u8], output_bytes: usize) -> SecureBuffer
where
    H: HashFunction + ?Sized,
{
    let mut output = SecureBuffer::create(output_bytes);

    if output_bytes == y.len() {
        output.as_mut_slice().copy_from_slice(y);
        return output;
    }

    let mut block = Zeroizing::new([0u8; MAX_HASH_OUTPUT_BYTES]);
    let block = &mut block[..y.len()];

    for (counter, chunk) in output.as_mut_slice().chunks_mut(y.len()).enumerate() {
        let counter = (counter as u32).to_be_bytes();
        hash.hash(&[y, &counter[..]], block);
        chunk.copy_from_slice(&block[..chunk.len()]);
    }

    output
}
