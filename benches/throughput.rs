//! Throughput Benchmark for expiring-map
//!
//! This benchmark measures the performance of the map and of the sweep
//! under various workloads.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use expiring_map::storage::Keyspace;
use expiring_map::{ExpiringMap, MapConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::time::Instant;

/// A map whose background sweeper stays out of the measurements.
fn quiet_map(rt: &Runtime) -> ExpiringMap<Bytes, Bytes> {
    let _guard = rt.enter();
    ExpiringMap::with_config(MapConfig::new().with_sweep_interval(Duration::from_secs(3600)))
        .expect("runtime is entered")
}

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let map = quiet_map(&rt);

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_persistent", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i));
            map.set(key, Bytes::from("small_value"));
            i += 1;
        });
    });

    group.bench_function("set_with_ttl", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("ttl:{}", i));
            map.set_with_ttl(key, Bytes::from("small_value"), Duration::from_secs(3600));
            i += 1;
        });
    });

    group.bench_function("refresh_same_key", |b| {
        let key = Bytes::from("hot");
        b.iter(|| {
            map.set_with_ttl(key.clone(), Bytes::from("value"), Duration::from_secs(3600));
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let map = quiet_map(&rt);

    // Pre-populate with data
    for i in 0..100_000 {
        let key = Bytes::from(format!("key:{}", i));
        let value = Bytes::from(format!("value:{}", i));
        map.set(key, value);
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i % 100_000));
            black_box(map.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("missing:{}", i));
            black_box(map.get(&key));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark flushing a keyspace with a backlog of due expirations
fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush");
    let now = Instant::now();

    for &(due, pending) in &[(1_000usize, 0usize), (1_000, 100_000), (10_000, 0)] {
        group.throughput(Throughput::Elements(due as u64));
        group.bench_function(format!("due_{}_pending_{}", due, pending), |b| {
            b.iter_batched(
                || {
                    let mut keyspace = Keyspace::new();
                    for i in 0..due {
                        keyspace.put(i, (), Some(Duration::ZERO), now);
                    }
                    for i in due..due + pending {
                        keyspace.put(i, (), Some(Duration::from_secs(3600)), now);
                    }
                    keyspace
                },
                |mut keyspace| black_box(keyspace.flush(now)),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark concurrent access
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("4_threads_mixed_with_sweeps", |b| {
        b.iter(|| {
            let map = Arc::new(quiet_map(&rt));
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let map = Arc::clone(&map);
                    thread::spawn(move || {
                        for i in 0..10_000 {
                            let key = Bytes::from(format!("key:{}:{}", t, i));
                            map.set_with_ttl(key.clone(), Bytes::from("value"), Duration::ZERO);
                            map.get(&key);
                            if i % 1_000 == 0 {
                                map.flush();
                            }
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            black_box(map.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_get, bench_flush, bench_concurrent);
criterion_main!(benches);
