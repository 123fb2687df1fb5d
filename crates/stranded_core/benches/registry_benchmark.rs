//! Benchmark for registry churn: spawn, mark, purge.
//!
//! Run with: cargo bench --package stranded_core --bench registry_benchmark

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use stranded_core::{EntityKind, Registry};

fn filled(n: u32) -> Registry<u32> {
    let mut registry = Registry::with_capacity(EntityKind::Projectile, n as usize);
    for i in 0..n {
        registry.spawn(i);
    }
    registry
}

fn benchmark_lookup(c: &mut Criterion) {
    let registry = filled(1_000);
    let ids = registry.ids();

    c.bench_function("registry_lookup_1k", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7) % ids.len();
            black_box(registry.get(black_box(ids[i])))
        });
    });
}

fn benchmark_purge_half(c: &mut Criterion) {
    let mut group = c.benchmark_group("purge");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("purge_every_other_of_1k", |b| {
        b.iter_batched(
            || {
                let mut registry = filled(1_000);
                for id in registry.ids().into_iter().step_by(2) {
                    registry.queue_removal(id);
                }
                registry
            },
            |mut registry| black_box(registry.purge()),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, benchmark_lookup, benchmark_purge_half);
criterion_main!(benches);
