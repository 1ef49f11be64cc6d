// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Host calibration.
//!
//! Memory doubles from a small start budget until one pass exceeds the
//! target or the cap is reached. Time absorbs whatever hardness the memory
//! cap leaves over: a pass faster than half the target is repeated
//! `ceil(target / pass)` times.
//!
//! The landing zone `[target / 2, target]` is best effort on the
//! calibrating machine only. Other hosts, and the same host under load,
//! will take more or less time for the same parameters.

use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use romix_buffer::SecureBuffer;
use romix_rand::EntropySource;

use crate::consts::{
    CALIBRATION_PASSWORD, CALIBRATION_START_BYTES, DEFAULT_MAX_MEMORY_BYTES, DEFAULT_OUTPUT_BYTES,
    DEFAULT_SALT_LEN, DEFAULT_TARGET_DURATION, MIN_MEASURED_PASS,
};
use crate::error::KdfError;
use crate::hash::HashAlgorithm;
use crate::params::KdfParameters;
use crate::romix::one_pass;

/// Calibration settings.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    target: Duration,
    max_memory_bytes: usize,
    start_memory_bytes: usize,
    hash_algorithm: HashAlgorithm,
    salt: Option<SecureBuffer>,
    salt_len: usize,
    output_bytes: usize,
    timeout: Option<Duration>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_DURATION, DEFAULT_MAX_MEMORY_BYTES)
    }
}

impl CalibrationConfig {
    /// Settings for `target` per full derivation, using at most
    /// `max_memory_bytes` of table.
    ///
    /// Not validated until calibration starts.
    pub fn new(target: Duration, max_memory_bytes: usize) -> Self {
        Self {
            target,
            max_memory_bytes,
            start_memory_bytes: CALIBRATION_START_BYTES,
            hash_algorithm: HashAlgorithm::default(),
            salt: None,
            salt_len: DEFAULT_SALT_LEN,
            output_bytes: DEFAULT_OUTPUT_BYTES,
            timeout: None,
        }
    }

    /// Like [`new`](CalibrationConfig::new) with the target in seconds.
    ///
    /// # Errors
    ///
    /// [`KdfError::InvalidTargetDuration`] for zero, negative, NaN or
    /// infinite `target_secs`.
    pub fn from_secs_f64(target_secs: f64, max_memory_bytes: usize) -> Result<Self, KdfError> {
        if !(target_secs.is_finite() && target_secs > 0.0) {
            return Err(KdfError::InvalidTargetDuration);
        }

        let target =
            Duration::try_from_secs_f64(target_secs).map_err(|_| KdfError::InvalidTargetDuration)?;
        let config = Self::new(target, max_memory_bytes);
        config.validate_target()?;

        Ok(config)
    }

    /// Hash used by probes and recorded in the result.
    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    /// Uses `salt` instead of generating one.
    pub fn with_salt(mut self, salt: SecureBuffer) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Length of the generated salt.
    pub fn with_salt_len(mut self, salt_len: usize) -> Self {
        self.salt_len = salt_len;
        self
    }

    /// Length of the derived key.
    pub fn with_output_bytes(mut self, output_bytes: usize) -> Self {
        self.output_bytes = output_bytes;
        self
    }

    /// First memory budget probed. Raised to one hash output if smaller.
    pub fn with_start_memory_bytes(mut self, start_memory_bytes: usize) -> Self {
        self.start_memory_bytes = start_memory_bytes;
        self
    }

    /// Abandons calibration once `timeout` has elapsed.
    ///
    /// Checked before each probe; a probe already running completes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Target duration of one full derivation.
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Cap on the lookup table size.
    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_bytes
    }

    /// Hash algorithm probed and recorded.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    /// Length of the derived key.
    pub fn output_bytes(&self) -> usize {
        self.output_bytes
    }

    /// Calibration timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn validate_target(&self) -> Result<(), KdfError> {
        if self.target.is_zero() {
            return Err(KdfError::InvalidTargetDuration);
        }

        Ok(())
    }

    /// Rejects settings that would calibrate a degenerate KDF.
    pub fn validate(&self) -> Result<(), KdfError> {
        self.validate_target()?;

        let hash_output_bytes = self.hash_algorithm.output_len();
        if self.max_memory_bytes < hash_output_bytes {
            return Err(KdfError::MemoryBelowHashOutput {
                memory_bytes: self.max_memory_bytes,
                hash_output_bytes,
            });
        }

        if self.output_bytes == 0 {
            return Err(KdfError::ZeroOutputLength);
        }

        if u32::try_from(self.output_bytes).is_err() {
            return Err(KdfError::OutputTooLong(self.output_bytes));
        }

        Ok(())
    }

    fn first_memory_bytes(&self) -> usize {
        self.start_memory_bytes
            .max(self.hash_algorithm.output_len())
            .min(self.max_memory_bytes)
    }
}

/// Cooperative cancellation for a running calibration.
///
/// Clones share one flag, so a token handed to another thread can stop a
/// calibration running here.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Takes effect before the next probe.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once any clone has called [`cancel`](CancellationToken::cancel).
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One measured calibration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Probe {
    pub memory_bytes: usize,
    pub elapsed: Duration,
}

/// Parameters chosen from a set of probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CalibrationPlan {
    pub memory_bytes: usize,
    pub iteration_count: u32,
    pub pass_duration: Duration,
}

/// Picks the largest budget measured within `target`, or the first probe
/// when none was. Returns `None` only for an empty probe list.
pub(crate) fn plan_from_probes(probes: &[Probe], target: Duration) -> Option<CalibrationPlan> {
    let selected = probes
        .iter()
        .filter(|probe| probe.elapsed <= target)
        .max_by_key(|probe| probe.memory_bytes)
        .or_else(|| probes.first())?;

    let pass = selected.elapsed.max(MIN_MEASURED_PASS);
    let iteration_count = if pass < target / 2 {
        let iterations = target.as_nanos().div_ceil(pass.as_nanos());
        u32::try_from(iterations).unwrap_or(u32::MAX)
    } else {
        1
    };

    Some(CalibrationPlan {
        memory_bytes: selected.memory_bytes,
        iteration_count,
        pass_duration: selected.elapsed,
    })
}

/// Runs calibration for a [`CalibrationConfig`].
///
/// ```rust,no_run
/// use core::time::Duration;
/// use romix_kdf::{CalibrationConfig, Calibrator, CancellationToken, MemoryHardKdf};
/// use romix_rand::SystemEntropySource;
///
/// let token = CancellationToken::new();
/// let config = CalibrationConfig::new(Duration::from_millis(250), 32 << 20)
///     .with_timeout(Duration::from_secs(5));
///
/// let params = Calibrator::new(config)
///     .with_cancellation(token.clone())
///     .calibrate(&SystemEntropySource {})?;
/// let kdf = MemoryHardKdf::new(params)?;
/// # Ok::<(), romix_kdf::KdfError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    config: CalibrationConfig,
    cancellation: Option<CancellationToken>,
}

impl Calibrator {
    /// Creates a calibrator without a cancellation token.
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            cancellation: None,
        }
    }

    /// Observes `token` before each probe.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The settings in use.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Measures this host and returns parameters for the configured target.
    ///
    /// Blocks for roughly `2 * target` in the worst case (the probe that
    /// overshoots plus the ones before it).
    ///
    /// # Errors
    ///
    /// - configuration errors from [`CalibrationConfig::validate`]
    /// - [`KdfError::CalibrationCancelled`] / [`KdfError::CalibrationTimedOut`]
    /// - [`KdfError::Entropy`] if no salt was supplied and generation fails
    pub fn calibrate<E>(&self, entropy: &E) -> Result<KdfParameters, KdfError>
    where
        E: EntropySource + ?Sized,
    {
        let hash_algorithm = self.config.hash_algorithm;

        self.calibrate_with_probe(entropy, |params| {
            let started = Instant::now();
            // Dropping the probe output wipes it.
            one_pass(&hash_algorithm, params, CALIBRATION_PASSWORD)?;
            Ok(started.elapsed())
        })
    }

    /// Calibration with the pass measurement supplied by `probe`.
    pub(crate) fn calibrate_with_probe<E, F>(
        &self,
        entropy: &E,
        mut probe: F,
    ) -> Result<KdfParameters, KdfError>
    where
        E: EntropySource + ?Sized,
        F: FnMut(&KdfParameters) -> Result<Duration, KdfError>,
    {
        let config = &self.config;
        config.validate()?;

        let started = Instant::now();
        let mut probes = Vec::new();
        let mut memory_bytes = config.first_memory_bytes();

        loop {
            self.check_interrupted(started)?;

            let probe_params = KdfParameters::new(
                memory_bytes,
                1,
                SecureBuffer::new(),
                config.hash_algorithm,
                config.output_bytes,
            )?;
            let elapsed = probe(&probe_params)?;

            tracing::debug!(
                memory_bytes,
                elapsed_us = elapsed.as_micros() as u64,
                "calibration probe"
            );
            probes.push(Probe {
                memory_bytes,
                elapsed,
            });

            if elapsed > config.target {
                break;
            }

            match memory_bytes.checked_mul(2) {
                Some(next) if next <= config.max_memory_bytes => memory_bytes = next,
                _ => break,
            }
        }

        // The loop records a probe before every exit that reaches here.
        let plan = plan_from_probes(&probes, config.target).ok_or(KdfError::ZeroStepCount)?;

        let salt = match &config.salt {
            Some(salt) => salt.clone(),
            None => {
                let mut salt = SecureBuffer::create(config.salt_len);
                entropy.fill_bytes(salt.as_mut_slice())?;
                salt
            }
        };

        let params = KdfParameters::new(
            plan.memory_bytes,
            plan.iteration_count,
            salt,
            config.hash_algorithm,
            config.output_bytes,
        )?;

        tracing::info!(
            hash = %config.hash_algorithm,
            memory_bytes = params.memory_bytes(),
            step_count = params.step_count(),
            iteration_count = params.iteration_count(),
            pass_us = plan.pass_duration.as_micros() as u64,
            probes = probes.len(),
            "calibrated ROMix parameters"
        );

        Ok(params)
    }

    fn check_interrupted(&self, started: Instant) -> Result<(), KdfError> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Err(KdfError::CalibrationCancelled);
        }

        if self
            .config
            .timeout
            .is_some_and(|timeout| started.elapsed() >= timeout)
        {
            return Err(KdfError::CalibrationTimedOut);
        }

        Ok(())
    }
}
