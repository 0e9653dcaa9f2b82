/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))] {
        use std::time::Duration;

        use criterion::{black_box, criterion_group, criterion_main, Criterion};
        use hybrid_vector::{hybrid, CompressedVector, Sum};
        use rand::{distr::Uniform, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};
        use rand_distr::StandardNormal;

        const DIM: usize = 203;

        type Dense = hybrid!(f32, DIM);
        type Bytes = hybrid!(u8, DIM);

        fn random_f32(rng: &mut StdRng) -> Vec<f32> {
            (0..DIM).map(|_| rng.sample(StandardNormal)).collect()
        }

        fn benchmark_dense(c: &mut Criterion) {
            let mut rng = StdRng::seed_from_u64(0xbe7c);
            let x = random_f32(&mut rng);
            let y = random_f32(&mut rng);
            let mut v = Dense::try_from_operand(&x).unwrap();

            let mut group = c.benchmark_group("dense");
            group.bench_function("add f32 [Vectorized]", |f| {
                f.iter(|| {
                    black_box(&mut v).try_add_assign(black_box(&y)).unwrap();
                })
            });
            group.bench_function("add expression f32 [Vectorized]", |f| {
                f.iter(|| {
                    let sum = Sum::new(black_box(&x), black_box(&y)).unwrap();
                    black_box(&mut v).try_assign(&sum).unwrap();
                })
            });

            let range = Uniform::new_inclusive(0u8, 1).unwrap();
            let bytes: Vec<u8> = (0..DIM).map(|_| range.sample(&mut rng)).collect();
            let mut w = Bytes::try_from_operand(&bytes).unwrap();
            group.bench_function("mul u8 [Scalar]", |f| {
                f.iter(|| {
                    black_box(&mut w).try_mul_assign(black_box(&bytes)).unwrap();
                })
            });
        }

        fn benchmark_sparse(c: &mut Criterion) {
            let mut rng = StdRng::seed_from_u64(0x5a75);
            let x = random_f32(&mut rng);
            let entries = (0..DIM)
                .filter(|_| rng.random_bool(0.1))
                .map(|i| (i, 2.0f32))
                .collect::<Vec<_>>();
            let sparse: CompressedVector<f32> =
                CompressedVector::try_from_entries(DIM, entries).unwrap();

            let mut group = c.benchmark_group("sparse");
            group.bench_function("mul f32", |f| {
                f.iter(|| {
                    let mut v = Dense::try_from_operand(black_box(&x)).unwrap();
                    v.try_mul_assign(black_box(&sparse)).unwrap();
                    black_box(v)
                })
            });
            group.bench_function("add f32", |f| {
                let mut v = Dense::try_from_operand(&x).unwrap();
                f.iter(|| {
                    black_box(&mut v).try_add_assign(black_box(&sparse)).unwrap();
                })
            });
        }

        criterion_group!(
            name = benches;
            config = Criterion::default()
                .sample_size(500)
                .warm_up_time(Duration::from_secs(1))
                .measurement_time(Duration::from_secs(3));
            targets = benchmark_dense, benchmark_sparse,
        );
        criterion_main!(benches);
    } else {
        fn main() {} // no benches for hardware without a dispatched register set
    }
}
