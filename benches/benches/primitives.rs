//! Microbenchmarks for the internal generators.
//!
//! The generators dominate subkey derivation cost (one mix-transform
//! initialization folds the NLFSR stream 129 times), so their per-word cost
//! is worth tracking on its own.

use criterion::{criterion_group, criterion_main, Criterion};
use opc::prng::{DoublePendulum, Lfsr128, Nlfsr256};
use std::hint::black_box;

const SDP_SEED: u64 = 0xB7E1_5162_8AED_2A6A;

fn bench_generators(c: &mut Criterion) {
    let mut lfsr = Lfsr128::new(1);
    c.bench_function("prng/lfsr/word", |b| {
        b.iter(|| black_box(lfsr.next_word()));
    });

    let mut nlfsr = Nlfsr256::new(1);
    c.bench_function("prng/nlfsr/word", |b| {
        b.iter(|| black_box(nlfsr.next_word()));
    });

    let mut nlfsr = Nlfsr256::new(1);
    c.bench_function("prng/nlfsr/unpredictable_64", |b| {
        b.iter(|| black_box(nlfsr.unpredictable_bits(black_box(0x1234_5678), 64)));
    });

    let mut pendulum = DoublePendulum::new(SDP_SEED);
    c.bench_function("prng/pendulum/word", |b| {
        b.iter(|| black_box(pendulum.next_word()));
    });
}

criterion_group!(benches, bench_generators);
criterion_main!(benches);
