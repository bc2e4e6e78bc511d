//! Throughput benchmarks for the OPC cipher family.
//!
//! Every OPC measurement rebuilds the instance inside the iteration: the
//! self-mutating schedule means a reused instance is a different cipher on
//! every call, so fresh-instance cost is the honest number.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use little_opc::LittleOpc;
use opc::{Opc, OpcConfig};
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const SDP_SEED: u64 = 0xB7E1_5162_8AED_2A6A;

fn config() -> OpcConfig {
    OpcConfig::minimal(vec![0u8; 16], 1, 1, SDP_SEED)
}

fn payload(len: usize) -> Vec<u8> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED);
    (0..len).map(|_| rng.random::<u8>()).collect()
}

// =============================================================================
// MAIN CIPHER
// =============================================================================

fn bench_opc(c: &mut Criterion) {
    let keys = payload(32);

    let mut group = c.benchmark_group("opc/encrypt");
    for size in [16usize, 256, 4096] {
        let data = payload(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| {
                let mut cipher = Opc::new(config()).unwrap();
                black_box(cipher.encrypt_without_padding(black_box(data), &keys).unwrap())
            });
        });
    }
    group.finish();
}

// =============================================================================
// REDUCED CIPHER
// =============================================================================

fn bench_little_opc(c: &mut Criterion) {
    let cipher = LittleOpc::new(0x0123_4567_89AB_CDEF);

    c.bench_function("little-opc/block", |b| {
        b.iter(|| black_box(cipher.encrypt_block(black_box(0xDEAD_BEEF_CAFE_F00D))));
    });

    let mut group = c.benchmark_group("little-opc/stream");
    for size in [64usize, 4096, 65536] {
        let data = payload(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(cipher.process_stream(black_box(data), 42)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_opc, bench_little_opc);
criterion_main!(benches);
