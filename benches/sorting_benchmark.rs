use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use cootensor::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn random_rows(desc: &Descriptor, count: usize, seed: u64) -> Vec<Word> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut word: Word = 0;
            for dim in 0..desc.order() {
                let value = rand::Rng::random_range(&mut rng, 0..desc.dim_size(dim));
                desc.insert(&mut word, dim, value).unwrap();
            }
            word
        })
        .collect()
}

fn bench_radix_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("Radix Sort: width");
    group.sample_size(10);

    let desc = Descriptor::build(&[1000, 1000, 10]).unwrap();
    let count = 10_000;
    let words = random_rows(&desc, count, 1);

    for radix_bits in [1u32, 4, 8, 16] {
        group.bench_function(format!("radix_bits={radix_bits}"), |b| {
            b.iter_batched(
                || PackedIndex::from_words(words.clone()),
                |mut indx| {
                    let opts = SortOptions {
                        radix_bits: Some(radix_bits),
                        num_threads: None,
                    };
                    sort::sort(&desc, &[0, 1, 2], black_box(&mut indx), None, opts).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_thread_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("Radix Sort: threads");
    group.sample_size(10);

    let desc = Descriptor::build(&[1000, 1000, 10]).unwrap();
    let count = 200_000;
    let words = random_rows(&desc, count, 2);

    for num_threads in [1usize, 2, 4, 8] {
        group.bench_function(format!("num_threads={num_threads}"), |b| {
            b.iter_batched(
                || PackedIndex::from_words(words.clone()),
                |mut indx| {
                    let opts = SortOptions {
                        radix_bits: None,
                        num_threads: Some(num_threads),
                    };
                    sort::sort(&desc, &[0, 1, 2], black_box(&mut indx), None, opts).unwrap();
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_permutation_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("Permutation application");
    group.sample_size(10);

    let len = 100_000;
    let mut rng = StdRng::seed_from_u64(3);
    let perm = cootensor::sample::random_permutation(len, &mut rng);
    let elements: Vec<Elem> = (0..len).map(|i| i as Elem).collect();

    group.bench_function("apply (allocating)", |b| {
        b.iter(|| black_box(perm.apply(&elements)))
    });

    group.bench_function("apply_in_place (cycle-following)", |b| {
        b.iter_batched(
            || elements.clone(),
            |mut data| perm.apply_in_place(black_box(&mut data)).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_radix_width,
    bench_thread_count,
    bench_permutation_application
);
criterion_main!(benches);
