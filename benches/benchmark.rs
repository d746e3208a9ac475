use criterion::{criterion_group, criterion_main, Criterion};

use latkem::traits::{Decaps, Encaps, KeyGen};
use latkem::{l1, l3, l5};

#[allow(clippy::redundant_closure)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let (ek_l1, dk_l1) = l1::KG::try_keygen().unwrap();
    let (_, ct_l1) = ek_l1.try_encaps().unwrap();
    let (ek_l3, dk_l3) = l3::KG::try_keygen().unwrap();
    let (_, ct_l3) = ek_l3.try_encaps().unwrap();
    let (ek_l5, dk_l5) = l5::KG::try_keygen().unwrap();
    let (_, ct_l5) = ek_l5.try_encaps().unwrap();

    c.bench_function("l1 KeyGen", |b| b.iter(|| l1::KG::try_keygen()));
    c.bench_function("l1 Encaps", |b| b.iter(|| ek_l1.try_encaps()));
    c.bench_function("l1 Decaps", |b| b.iter(|| dk_l1.try_decaps(&ct_l1)));

    c.bench_function("l3 KeyGen", |b| b.iter(|| l3::KG::try_keygen()));
    c.bench_function("l3 Encaps", |b| b.iter(|| ek_l3.try_encaps()));
    c.bench_function("l3 Decaps", |b| b.iter(|| dk_l3.try_decaps(&ct_l3)));

    c.bench_function("l5 KeyGen", |b| b.iter(|| l5::KG::try_keygen()));
    c.bench_function("l5 Encaps", |b| b.iter(|| ek_l5.try_encaps()));
    c.bench_function("l5 Decaps", |b| b.iter(|| dk_l5.try_decaps(&ct_l5)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
