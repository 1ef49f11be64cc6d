// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecureBuffer benchmarks: lifecycle (map + lock + wipe + unmap) and growth.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use romix_buffer::SecureBuffer;

fn bench_create_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("secure_buffer/create_drop");

    for len in [32usize, 4096, 1 << 20] {
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let buffer = SecureBuffer::create(black_box(len));
                black_box(buffer.len());
            });
        });
    }

    group.finish();
}

fn bench_extend(c: &mut Criterion) {
    let mut group = c.benchmark_group("secure_buffer/extend_from_slice");
    let chunk = [0xABu8; 64];

    // 64 appends stay within one page: in-place growth.
    group.bench_function("in_place/64x64B", |b| {
        b.iter(|| {
            let mut buffer = SecureBuffer::new();
            for _ in 0..64 {
                buffer.extend_from_slice(black_box(&chunk));
            }
            black_box(buffer.len());
        });
    });

    // Crosses page boundaries: reallocation, copy and wipe of the old region.
    group.bench_function("reallocating/256x64B", |b| {
        b.iter(|| {
            let mut buffer = SecureBuffer::new();
            for _ in 0..256 {
                buffer.extend_from_slice(black_box(&chunk));
            }
            black_box(buffer.len());
        });
    });

    group.finish();
}

fn bench_eq(c: &mut Criterion) {
    let a = SecureBuffer::from_slice(&[7u8; 64]);
    let b_equal = SecureBuffer::from_slice(&[7u8; 64]);

    c.bench_function("secure_buffer/ct_eq/64B", |b| {
        b.iter(|| black_box(black_box(&a) == black_box(&b_equal)));
    });
}

criterion_group!(benches, bench_create_drop, bench_extend, bench_eq);
criterion_main!(benches);
