use std::sync::LazyLock;

use criterion::{criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;
use rand_core::OsRng;
use sigma_dlog::{
    damgard_jurik::DamgardJurikPublicKey,
    dlog::{DlogGroup, EcF2mGroup, Secp256k1Group},
    sigma::{
        dj_encrypted_zero::{
            DjEncryptedZeroCommonInput, DjEncryptedZeroProver, DjEncryptedZeroProverInput, DjEncryptedZeroVerifier,
        },
        dlog::{DlogCommonInput, DlogProver, DlogProverInput, DlogVerifier},
        execute, SigmaParams,
    },
};

// Mersenne primes, to avoid generating RSA primes for every run.
static DJ_INPUT: LazyLock<DjEncryptedZeroProverInput> = LazyLock::new(|| {
    let p = (BigUint::from(1u32) << 1279u32) - BigUint::from(1u32);
    let q = (BigUint::from(1u32) << 607u32) - BigUint::from(1u32);
    let public_key = DamgardJurikPublicKey::new(p * q);
    let randomness = public_key.random_unit(&mut OsRng);
    let ciphertext = public_key.encrypt_with_randomness(&BigUint::from(0u32), &randomness, 1);
    DjEncryptedZeroProverInput::new(DjEncryptedZeroCommonInput::new(public_key, ciphertext), randomness)
});

fn bench_dj_encrypted_zero(c: &mut Criterion) {
    let mut group = c.benchmark_group("DJ encrypted zero");
    group.sample_size(10);

    LazyLock::force(&DJ_INPUT);
    let params = SigmaParams::default();

    group.bench_function("prove and verify", |b| {
        b.iter(|| {
            let mut prover = DjEncryptedZeroProver::new(params).unwrap();
            let mut verifier = DjEncryptedZeroVerifier::new(params).unwrap();
            assert!(execute(&mut OsRng, &mut prover, &mut verifier, &DJ_INPUT, DJ_INPUT.common().clone()).unwrap());
        })
    });
}

fn bench_dlog_on<G: DlogGroup>(c: &mut Criterion, name: &str, dlog_group: &G) {
    let mut group = c.benchmark_group(name);
    group.sample_size(10);

    let params = SigmaParams::default();
    let w = dlog_group.random_exponent(&mut OsRng);
    let common = DlogCommonInput::new(dlog_group.exponentiate_generator(&w));
    let input = DlogProverInput::new(common.clone(), w);

    group.bench_function("prove and verify", |b| {
        b.iter(|| {
            let mut prover = DlogProver::new(dlog_group, params).unwrap();
            let mut verifier = DlogVerifier::new(dlog_group, params).unwrap();
            assert!(execute(&mut OsRng, &mut prover, &mut verifier, &input, common.clone()).unwrap());
        })
    });
}

fn bench_dlog(c: &mut Criterion) {
    bench_dlog_on(c, "Dlog proof (B-163)", &EcF2mGroup::nist("B-163").unwrap());
    bench_dlog_on(c, "Dlog proof (secp256k1)", &Secp256k1Group::new());
}

criterion_group!(benches, bench_dj_encrypted_zero, bench_dlog);
criterion_main!(benches);
