//! Performance Benchmarks for zstake
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use zstake::fhe::{FHEConfig, FHEOps, FHEServer, KeyPair};
use zstake::prelude::*;

const DAY: u64 = SECONDS_PER_DAY;

fn keys() -> KeyPair {
    KeyPair::generate(&FHEConfig::default()).unwrap()
}

// =============================================================================
// FHE BENCHMARKS
// =============================================================================

fn bench_fhe_keygen(c: &mut Criterion) {
    let config = FHEConfig::default();

    let mut group = c.benchmark_group("fhe_keygen");
    group.sample_size(10);
    group.bench_function("keygen", |b| b.iter(|| KeyPair::generate(&config).unwrap()));
    group.finish();
}

fn bench_fhe_encrypt(c: &mut Criterion) {
    let keypair = keys();
    let server = FHEServer::new(keypair.server.clone(), keypair.public.clone()).unwrap();

    c.bench_function("fhe_encrypt_public_u64", |b| {
        b.iter(|| server.encrypt_amount(1_000).unwrap())
    });
}

fn bench_fhe_homomorphic_add(c: &mut Criterion) {
    let keypair = keys();
    let server = FHEServer::new(keypair.server.clone(), keypair.public.clone()).unwrap();

    let ct_a = server.encrypt_amount(100).unwrap();
    let ct_b = server.encrypt_amount(50).unwrap();

    c.bench_function("fhe_homomorphic_add", |b| b.iter(|| FHEOps::add(&ct_a, &ct_b)));
}

fn bench_scale_by_elapsed_time(c: &mut Criterion) {
    let keypair = keys();
    let server = FHEServer::new(keypair.server.clone(), keypair.public.clone()).unwrap();
    let stake = server.encrypt_amount(3).unwrap();

    let mut group = c.benchmark_group("scale_by_elapsed_time");
    group.sample_size(10);
    // Whole days skip the division
    for elapsed in [DAY, 7] {
        group.bench_with_input(BenchmarkId::from_parameter(elapsed), &elapsed, |b, elapsed| {
            b.iter(|| {
                server
                    .scale_by_elapsed_time(&stake, *elapsed, REWARD_RATE)
                    .unwrap()
            })
        });
    }
    group.finish();
}

// =============================================================================
// ENGINE BENCHMARKS
// =============================================================================

fn bench_engine_claim(c: &mut Criterion) {
    let keypair = keys();
    let fhe = FHEServer::new(keypair.server.clone(), keypair.public.clone()).unwrap();
    let backend = Arc::new(MemoryBackend::new());
    let token = Arc::new(Zcoin::new(backend.clone(), fhe.clone()));
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let engine = StakingEngine::new(backend, token, fhe, clock.clone()).unwrap();
    let alice = AccountId([1u8; 32]);
    engine.stake(&alice, 10 * STAKE_UNIT).unwrap();

    let mut group = c.benchmark_group("engine");
    group.sample_size(10);
    group.bench_function("claim_after_one_hour", |b| {
        b.iter(|| {
            clock.advance(3_600);
            engine.claim_rewards(&alice).unwrap()
        })
    });
    group.bench_function("stake_one_unit", |b| {
        b.iter(|| engine.stake(&alice, STAKE_UNIT).unwrap())
    });
    group.finish();
}

criterion_group!(
    fhe,
    bench_fhe_keygen,
    bench_fhe_encrypt,
    bench_fhe_homomorphic_add,
    bench_scale_by_elapsed_time,
);

criterion_group!(engine, bench_engine_claim);

criterion_main!(fhe, engine);
