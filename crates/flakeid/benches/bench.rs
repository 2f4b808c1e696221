use core::hint::black_box;
use core::time::Duration;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakeid::{
    AtomicIdGenerator, Config, IdGenerator, LockIdGenerator, Mode, Precision, TimeSource,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (shared across threads for
// the contended runs). One full millisecond slice, so a fixed clock never
// forces a wait.
const TOTAL_IDS: usize = 4096;

fn mock_config() -> Config {
    Config::default()
        .with_precision(Precision::Millisecond)
        .with_epoch(Duration::ZERO)
}

fn thread_counts() -> Vec<usize> {
    let max = num_cpus::get().max(1);
    let mut counts = vec![1];
    while counts.last().is_some_and(|&n| n * 2 <= max) {
        counts.push(counts[counts.len() - 1] * 2);
    }
    counts
}

/// Benchmarks a generator owned by a single thread.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: IdGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads.
fn bench_generator_contended<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: IdGenerator + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in thread_counts() {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(generator_factory());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.generate().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

// --- MOCK CLOCK (never waits) ---

fn benchmark_mock_single_lock(c: &mut Criterion) {
    bench_generator(c, "mock/single/lock", || {
        LockIdGenerator::with_time_source(mock_config(), FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_mock_single_atomic(c: &mut Criterion) {
    bench_generator(c, "mock/single/atomic", || {
        AtomicIdGenerator::with_time_source(mock_config(), FixedMockTime { millis: 1 }).unwrap()
    });
}

/// Raw lock contention.
fn benchmark_mock_contended_lock(c: &mut Criterion) {
    bench_generator_contended(c, "mock/contended/lock", || {
        LockIdGenerator::with_time_source(mock_config(), FixedMockTime { millis: 1 }).unwrap()
    });
}

/// Threads retry on CAS failures.
fn benchmark_mock_contended_atomic(c: &mut Criterion) {
    bench_generator_contended(c, "mock/contended/atomic", || {
        AtomicIdGenerator::with_time_source(mock_config(), FixedMockTime { millis: 1 }).unwrap()
    });
}

// --- SYSTEM CLOCK (may wait on slice exhaustion) ---

fn benchmark_system_single_lock(c: &mut Criterion) {
    bench_generator(c, "system/single/lock", || {
        LockIdGenerator::new(Config::default().with_precision(Precision::Millisecond)).unwrap()
    });
}

fn benchmark_system_single_atomic(c: &mut Criterion) {
    bench_generator(c, "system/single/atomic", || {
        AtomicIdGenerator::new(Config::default().with_precision(Precision::Millisecond)).unwrap()
    });
}

fn benchmark_system_single_atomic_spread(c: &mut Criterion) {
    bench_generator(c, "system/single/atomic-spread", || {
        AtomicIdGenerator::new(
            Config::default()
                .with_mode(Mode::Spread)
                .with_precision(Precision::Millisecond),
        )
        .unwrap()
    });
}

fn benchmark_system_contended_lock(c: &mut Criterion) {
    bench_generator_contended(c, "system/contended/lock", || {
        LockIdGenerator::new(Config::default().with_precision(Precision::Millisecond)).unwrap()
    });
}

fn benchmark_system_contended_atomic(c: &mut Criterion) {
    bench_generator_contended(c, "system/contended/atomic", || {
        AtomicIdGenerator::new(Config::default().with_precision(Precision::Millisecond)).unwrap()
    });
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_single_lock,
    benchmark_mock_single_atomic,
    benchmark_mock_contended_lock,
    benchmark_mock_contended_atomic,
    // System clock
    benchmark_system_single_lock,
    benchmark_system_single_atomic,
    benchmark_system_single_atomic_spread,
    benchmark_system_contended_lock,
    benchmark_system_contended_atomic,
);
criterion_main!(benches);
