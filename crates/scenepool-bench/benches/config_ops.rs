//! Criterion micro-benchmarks for override coercion and plan resolution.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use scenepool_bench::override_document;
use scenepool_config::ConfigOverrides;
use scenepool_core::SceneType;
use scenepool_engine::tiers::resolve_plan;

fn bench_coerce(c: &mut Criterion) {
    let mut group = c.benchmark_group("overrides_from_object");
    for keys in [21usize, 200, 2000] {
        let doc = override_document(keys);
        group.bench_with_input(BenchmarkId::from_parameter(keys), &doc, |b, doc| {
            b.iter(|| ConfigOverrides::from_object(black_box(doc.clone())));
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let overrides = ConfigOverrides::from_object(override_document(21));
    let empty = ConfigOverrides::new();
    c.bench_function("resolve_plan_defaults", |b| {
        b.iter(|| resolve_plan(black_box(&SceneType::VirtualIp), &empty, false));
    });
    c.bench_function("resolve_plan_overridden", |b| {
        b.iter(|| resolve_plan(black_box(&SceneType::VirtualIp), &overrides, false));
    });
}

criterion_group!(benches, bench_coerce, bench_resolve);
criterion_main!(benches);
