// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::time::{Duration, Instant};

use romix_buffer::SecureBuffer;
use romix_kdf::{HashAlgorithm, KdfError, KdfParameters, MemoryHardKdf};
use romix_rand::SystemEntropySource;
use serial_test::serial;

fn scenario_params(iteration_count: u32) -> KdfParameters {
    KdfParameters::new(
        4 * HashAlgorithm::Sha512.output_len(),
        iteration_count,
        SecureBuffer::from_slice(&[0u8; 16]),
        HashAlgorithm::Sha512,
        32,
    )
    .expect("Failed to new(..)")
}

#[test]
fn test_scenario_single_pass_reference_vector() {
    let kdf = MemoryHardKdf::new(scenario_params(1)).expect("Failed to MemoryHardKdf::new(..)");

    assert_eq!(kdf.params().step_count(), 4);

    let key = kdf
        .derive_key(&SecureBuffer::from("correct horse"))
        .expect("Failed to derive_key(..)");

    assert_eq!(
        key.to_hex(),
        "92ae1bfa12479aa5a954b6326c8d502d1a709ea01059e590a10d0169e35c0d5d"
    );
}

#[test]
fn test_scenario_three_iterations_compose_one_pass() {
    let single = MemoryHardKdf::new(scenario_params(1)).expect("Failed to MemoryHardKdf::new(..)");
    let chained = MemoryHardKdf::new(scenario_params(3)).expect("Failed to MemoryHardKdf::new(..)");
    let password = SecureBuffer::from("correct horse");

    let manual = single
        .derive_one_pass(
            &single
                .derive_one_pass(
                    &single
                        .derive_one_pass(&password)
                        .expect("Failed to derive_one_pass(..)"),
                )
                .expect("Failed to derive_one_pass(..)"),
        )
        .expect("Failed to derive_one_pass(..)");

    let key = chained.derive_key(&password).expect("Failed to derive_key(..)");

    assert_eq!(key, manual);
    assert_eq!(
        key.to_hex(),
        "f61407ff941ddcb5808f468668d6207e754f762300f5d972018ee91e47cd55a7"
    );
}

#[test]
fn test_persisted_parameters_reproduce_key() {
    let kdf = MemoryHardKdf::calibrate(
        Duration::from_millis(10),
        256 * 1024,
        &SystemEntropySource {},
    )
    .expect("Failed to calibrate(..)");
    let password = SecureBuffer::from("correct horse battery staple");
    let key = kdf.derive_key(&password).expect("Failed to derive_key(..)");

    let record = kdf.params().encode().expect("Failed to encode(..)");
    let restored = KdfParameters::decode(record.as_slice()).expect("Failed to decode(..)");
    let restored = MemoryHardKdf::new(restored).expect("Failed to MemoryHardKdf::new(..)");

    assert_eq!(
        restored.derive_key(&password).expect("Failed to derive_key(..)"),
        key
    );
}

#[test]
fn test_degenerate_memory_rejected_everywhere() {
    let construct = KdfParameters::new(32, 1, SecureBuffer::new(), HashAlgorithm::Sha512, 32);
    assert!(matches!(construct, Err(KdfError::MemoryBelowHashOutput { .. })));

    let calibrate = MemoryHardKdf::calibrate(Duration::from_millis(250), 32, &SystemEntropySource {});
    assert!(matches!(calibrate, Err(KdfError::MemoryBelowHashOutput { .. })));
}

#[test]
#[serial(timing)]
fn test_calibrated_derivation_lands_near_target() {
    let target = Duration::from_millis(250);
    let kdf = MemoryHardKdf::calibrate(target, 32 * 1024 * 1024, &SystemEntropySource {})
        .expect("Failed to calibrate(..)");
    let password = SecureBuffer::from("correct horse");

    // Best of three to absorb scheduler noise.
    let elapsed = (0..3)
        .map(|_| {
            let started = Instant::now();
            kdf.derive_key(&password).expect("Failed to derive_key(..)");
            started.elapsed()
        })
        .min()
        .expect("Failed to measure derivation");

    assert!(
        elapsed >= target / 2 && elapsed <= target * 3 / 2,
        "derivation took {elapsed:?} for {target:?} with\n{}",
        kdf.params()
    );
}

#[test]
#[serial(timing)]
fn test_more_steps_cost_more() {
    let derive_time = |memory_bytes: usize| {
        let params = KdfParameters::new(
            memory_bytes,
            1,
            SecureBuffer::from_slice(&[0u8; 16]),
            HashAlgorithm::Sha512,
            32,
        )
        .expect("Failed to new(..)");
        let kdf = MemoryHardKdf::new(params).expect("Failed to MemoryHardKdf::new(..)");
        let password = SecureBuffer::from("correct horse");

        (0..3)
            .map(|_| {
                let started = Instant::now();
                kdf.derive_key(&password).expect("Failed to derive_key(..)");
                started.elapsed()
            })
            .min()
            .expect("Failed to measure derivation")
    };

    assert!(derive_time(64 * 1024) < derive_time(4 * 1024 * 1024));
}
