use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vectorscope_core::brute_force::BruteForceIndex;
use vectorscope_core::config::{ConfigUpdate, HnswConfig};
use vectorscope_core::distance::DistanceMetric;
use vectorscope_core::index::HnswIndex;
use vectorscope_core::vector::Embedding;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DIM: usize = 32; // Default dimensionality for benchmarks

// --- Data Generation Helper Functions ---

fn generate_random_vector(dim: usize, rng: &mut StdRng) -> Embedding {
    let vec: Vec<f32> = (0..dim).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect(); // Values between -1 and 1
    vec.into()
}

fn generate_test_data(num_vectors: usize, dim: usize, seed: u64) -> Vec<Embedding> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_vectors).map(|_| generate_random_vector(dim, &mut rng)).collect()
}

fn build_index(data: &[Embedding], config: HnswConfig) -> HnswIndex {
    let mut index = HnswIndex::new(DIM, config).unwrap();
    for vector in data {
        index.insert(vector.clone()).unwrap();
    }
    index
}

// --- Benchmark Functions ---

fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");
    group.sample_size(10);
    let seed = 1u64;
    let config = HnswConfig::new(16, 100, 50).with_seed(seed);

    for n_val in [100, 1000, 5000].iter() {
        group.throughput(Throughput::Elements(*n_val as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_val), n_val, |b, &n| {
            b.iter_batched(
                || generate_test_data(n, DIM, seed),
                |data| {
                    let mut index = HnswIndex::new(DIM, config).unwrap();
                    for vector in data {
                        index.insert(black_box(vector)).unwrap();
                    }
                    index
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_insert_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_single");
    let seed = 2u64;
    let config = HnswConfig::new(16, 100, 50).with_seed(seed);

    for n_val in [1000, 5000].iter() {
        let base_index = build_index(&generate_test_data(*n_val, DIM, seed), config);
        let mut rng = StdRng::seed_from_u64(seed + *n_val as u64);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(n_val), n_val, |b, _| {
            b.iter_batched(
                || (base_index.clone(), generate_random_vector(DIM, &mut rng)),
                |(mut index, vector)| {
                    index.insert(black_box(vector)).unwrap();
                    index
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_search_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_latency");
    let initial_seed = 4u64;

    let n_values = [1000, 5000];
    let k_values = [1, 10];
    let ef_search_values = [10, 50, 200];

    for n_val in n_values {
        let mut index = build_index(
            &generate_test_data(n_val, DIM, initial_seed),
            HnswConfig::new(16, 100, 50).with_seed(initial_seed),
        );
        let mut query_rng = StdRng::seed_from_u64(initial_seed + n_val as u64 + 1);

        for k_val in k_values {
            for ef_s_val in ef_search_values {
                if ef_s_val < k_val {
                    continue;
                }
                index.configure(&ConfigUpdate::ef_search(ef_s_val)).unwrap();
                let query_vector = generate_random_vector(DIM, &mut query_rng);

                group.throughput(Throughput::Elements(1));
                group.bench_with_input(
                    BenchmarkId::from_parameter(format!("N={}/k={}/ef_search={}", n_val, k_val, ef_s_val)),
                    &k_val,
                    |b, &k| {
                        b.iter(|| black_box(index.search(black_box(&query_vector), black_box(k)).unwrap()));
                    },
                );
            }
        }
    }
    group.finish();
}

fn bench_brute_force_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force_search");
    let seed = 5u64;

    for n_val in [1000, 5000] {
        let index = build_index(&generate_test_data(n_val, DIM, seed), HnswConfig::new(16, 100, 50).with_seed(seed));
        let query_vector = generate_random_vector(DIM, &mut StdRng::seed_from_u64(seed + 1));
        let scanner = BruteForceIndex::new();

        for metric in DistanceMetric::ALL {
            group.throughput(Throughput::Elements(n_val as u64));
            group.bench_with_input(
                BenchmarkId::new(metric.name(), n_val),
                &metric,
                |b, &metric| {
                    b.iter(|| black_box(scanner.search(index.store(), black_box(&query_vector), 10, metric).unwrap()));
                },
            );
        }
    }
    group.finish();
}

// --- Main Benchmark Registration ---

criterion_group!(benches, bench_build_index, bench_insert_single, bench_search_latency, bench_brute_force_search);
criterion_main!(benches);
