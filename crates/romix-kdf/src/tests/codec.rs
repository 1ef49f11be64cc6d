// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use proptest::prelude::*;

use romix_buffer::SecureBuffer;

use crate::{DecodeError, HashAlgorithm, KdfError, KdfParameters};

fn sample_params() -> KdfParameters {
    KdfParameters::new(256, 3, SecureBuffer::from_slice(&[7u8; 16]), HashAlgorithm::Sha512, 32)
        .expect("Failed to new(..)")
}

fn encoded_sample() -> Vec<u8> {
    sample_params()
        .encode()
        .expect("Failed to encode(..)")
        .as_slice()
        .to_vec()
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_encode_layout() {
    let bytes = encoded_sample();

    let mut expected = Vec::new();
    expected.extend_from_slice(b"RMXK");
    expected.push(1);
    expected.push(6);
    expected.extend_from_slice(b"sha512");
    expected.extend_from_slice(&256u64.to_le_bytes());
    expected.extend_from_slice(&4u64.to_le_bytes());
    expected.extend_from_slice(&3u32.to_le_bytes());
    expected.extend_from_slice(&32u32.to_le_bytes());
    expected.extend_from_slice(&16u32.to_le_bytes());
    expected.extend_from_slice(&[7u8; 16]);

    assert_eq!(bytes, expected);
}

#[test]
fn test_decode_restores_every_field() {
    let params = sample_params();
    let encoded = params.encode().expect("Failed to encode(..)");

    let decoded = KdfParameters::decode(encoded.as_slice()).expect("Failed to decode(..)");

    assert_eq!(decoded, params);
    assert_eq!(decoded.step_count(), 4);
    assert_eq!(decoded.hash_algorithm(), HashAlgorithm::Sha512);
}

#[test]
fn test_decode_empty_salt() {
    let params = KdfParameters::new(128, 1, SecureBuffer::new(), HashAlgorithm::Sha3_256, 64)
        .expect("Failed to new(..)");
    let encoded = params.encode().expect("Failed to encode(..)");

    let decoded = KdfParameters::decode(encoded.as_slice()).expect("Failed to decode(..)");

    assert_eq!(decoded, params);
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_decode_rejects_bad_magic() {
    let mut bytes = encoded_sample();
    bytes[0] = b'X';

    let result = KdfParameters::decode(&bytes);

    assert!(matches!(result, Err(KdfError::Decode(DecodeError::BadMagic))));
}

#[test]
fn test_decode_rejects_unknown_version() {
    let mut bytes = encoded_sample();
    bytes[4] = 2;

    let result = KdfParameters::decode(&bytes);

    assert!(matches!(
        result,
        Err(KdfError::Decode(DecodeError::UnsupportedVersion(2)))
    ));
}

#[test]
fn test_decode_rejects_unknown_hash() {
    let mut bytes = encoded_sample();
    bytes[6..12].copy_from_slice(b"sha999");

    let result = KdfParameters::decode(&bytes);

    assert!(matches!(result, Err(KdfError::UnknownHashAlgorithm(name)) if name == "sha999"));
}

#[test]
fn test_decode_rejects_non_utf8_hash_name() {
    let mut bytes = encoded_sample();
    bytes[6] = 0xFF;

    let result = KdfParameters::decode(&bytes);

    assert!(matches!(
        result,
        Err(KdfError::Decode(DecodeError::InvalidHashName))
    ));
}

#[test]
fn test_decode_rejects_truncation_at_every_length() {
    let bytes = encoded_sample();

    for len in 0..bytes.len() {
        let result = KdfParameters::decode(&bytes[..len]);

        assert!(
            matches!(result, Err(KdfError::Decode(DecodeError::Truncated { .. }))),
            "len = {len}"
        );
    }
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let mut bytes = encoded_sample();
    bytes.extend_from_slice(&[0, 0]);

    let result = KdfParameters::decode(&bytes);

    assert!(matches!(
        result,
        Err(KdfError::Decode(DecodeError::TrailingBytes(2)))
    ));
}

#[test]
fn test_decode_rejects_tampered_step_count() {
    let mut bytes = encoded_sample();
    // step_count follows magic, version, name length, name and memory_bytes.
    bytes[20..28].copy_from_slice(&5u64.to_le_bytes());

    let result = KdfParameters::decode(&bytes);

    assert!(matches!(
        result,
        Err(KdfError::StepCountMismatch {
            expected: 4,
            found: 5
        })
    ));
}

#[test]
fn test_decode_rejects_zero_iterations() {
    let mut bytes = encoded_sample();
    bytes[28..32].copy_from_slice(&0u32.to_le_bytes());

    let result = KdfParameters::decode(&bytes);

    assert!(matches!(result, Err(KdfError::ZeroIterations)));
}

// =============================================================================
// Robustness
// =============================================================================

proptest! {
    #[test]
    fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..96)) {
        let _ = KdfParameters::decode(&bytes);
    }
}
