use core::hint::black_box;
use core::num::NonZeroUsize;

use chain_hash::GrowthPolicy;
use chain_hash::HashTable;
use chain_hash::hash::Djb2;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;

const SIZES: &[usize] = &[(1 << 8), (1 << 10), (1 << 12), (1 << 14), (1 << 16)];

/// Average chain length the chained table reaches before it doubles.
const MAX_CHAIN: NonZeroUsize = NonZeroUsize::new(1).unwrap();

fn key(i: usize) -> String {
    format!("key_{i:016X}")
}

fn keys(count: usize) -> Vec<String> {
    let mut keys = (0..count).map(key).collect::<Vec<_>>();
    keys.shuffle(&mut SmallRng::from_os_rng());
    keys
}

fn chained_table(buckets: usize) -> HashTable<u64, Djb2> {
    HashTable::with_capacity_and_hasher(
        NonZeroUsize::new(buckets).unwrap_or(NonZeroUsize::MIN),
        Djb2,
    )
    .with_growth_policy(GrowthPolicy::AverageChainLength(MAX_CHAIN))
}

fn filled_chained_table(keys: &[String]) -> HashTable<u64, Djb2> {
    let mut table = chained_table(keys.len());
    for (i, key) in keys.iter().enumerate() {
        table.insert(key, i as u64);
    }
    table
}

fn filled_hashbrown(keys: &[String]) -> hashbrown::HashMap<String, u64> {
    let mut map = hashbrown::HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        map.insert(key.clone(), i as u64);
    }
    map
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || chained_table(1),
                |mut table| {
                    for (i, key) in keys.iter().enumerate() {
                        black_box(table.insert(key, i as u64));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                hashbrown::HashMap::<String, u64>::new,
                |mut map| {
                    for (i, key) in keys.iter().enumerate() {
                        black_box(map.insert(key.clone(), i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_retrieve_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("retrieve_hit");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size);
        let table = filled_chained_table(&keys);
        let map = filled_hashbrown(&keys);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                for key in &keys {
                    black_box(table.retrieve(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &keys {
                    black_box(map.get(key));
                }
            })
        });
    }
}

fn bench_retrieve_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("retrieve_miss");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size);
        let misses = (size..size * 2).map(key).collect::<Vec<_>>();
        let table = filled_chained_table(&keys);
        let map = filled_hashbrown(&keys);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(table.retrieve(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(map.get(key));
                }
            })
        });
    }
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || filled_chained_table(&keys),
                |mut table| {
                    for key in &keys {
                        black_box(table.remove(key));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || filled_hashbrown(&keys),
                |mut map| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || filled_chained_table(&keys),
                |mut table| {
                    table.resize();
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Retrieve,
}

fn bench_mixed_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_zipf");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let mut rng = SmallRng::from_os_rng();
        let key_distr = Zipf::new(size as f32 * 2.0 - 1.0, 1.1).unwrap();
        let operations = (0..size * 3)
            .map(|i| {
                let operation = match i % 3 {
                    0 => Operation::Insert,
                    1 => Operation::Remove,
                    _ => Operation::Retrieve,
                };
                (operation, key(rng.sample(key_distr) as usize))
            })
            .collect::<Vec<_>>();
        group.throughput(Throughput::Elements(operations.len() as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut operations = operations.clone();
                    operations.shuffle(&mut SmallRng::from_os_rng());
                    operations
                },
                |operations| {
                    let mut table = chained_table(1);
                    for (i, (operation, key)) in operations.iter().enumerate() {
                        match operation {
                            Operation::Insert => {
                                black_box(table.insert(key, i as u64));
                            }
                            Operation::Remove => {
                                black_box(table.remove(key));
                            }
                            Operation::Retrieve => {
                                black_box(table.retrieve(key));
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut operations = operations.clone();
                    operations.shuffle(&mut SmallRng::from_os_rng());
                    operations
                },
                |operations| {
                    let mut map = hashbrown::HashMap::<String, u64>::new();
                    for (i, (operation, key)) in operations.iter().enumerate() {
                        match operation {
                            Operation::Insert => {
                                black_box(map.insert(key.clone(), i as u64));
                            }
                            Operation::Remove => {
                                black_box(map.remove(key));
                            }
                            Operation::Retrieve => {
                                black_box(map.get(key));
                            }
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(
    benches,
    bench_insert,
    bench_retrieve_hit,
    bench_retrieve_miss,
    bench_remove,
    bench_resize,
    bench_mixed_zipf,
);

criterion_main!(benches);
