use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tierbus::TopicRegistry;
use tierbus_benchmark::{noop, populated};

fn bench_subscribe(c: &mut Criterion) {
    let registry = TopicRegistry::<u64>::with_default_priority(10);
    c.bench_function("subscribe", |b| {
        b.iter(|| {
            let _sub = black_box(registry.subscribe("chan", noop()));
        })
    });
}

fn bench_subscribe_unsubscribe(c: &mut Criterion) {
    let registry = TopicRegistry::<u64>::with_default_priority(10);
    // фоновые подписки, чтобы поиск по уровню был не тривиальным
    let _keep: Vec<_> = (0..100).map(|_| registry.subscribe("chan", noop())).collect();
    c.bench_function("subscribe_unsubscribe", |b| {
        b.iter(|| {
            let sub = registry.subscribe("chan", noop());
            black_box(registry.unsubscribe(&sub));
        })
    });
}

fn bench_publish_0_sub(c: &mut Criterion) {
    let registry = TopicRegistry::<u64>::with_default_priority(10);
    c.bench_function("publish_0_subs", |b| {
        b.iter(|| black_box(registry.publish("chan", black_box(&[1, 2, 3])).unwrap()))
    });
}

fn bench_publish_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_fan_out");
    for &(tiers, per_tier) in &[(1, 1), (1, 10), (1, 100), (10, 10)] {
        let registry = populated("chan", tiers, per_tier);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tiers}x{per_tier}")),
            &registry,
            |b, registry| b.iter(|| black_box(registry.publish("chan", black_box(&[1])).unwrap())),
        );
    }
    group.finish();
}

fn bench_publish_single_tier(c: &mut Criterion) {
    let registry = populated("chan", 10, 10);
    c.bench_function("publish_at_1_of_10_tiers", |b| {
        b.iter(|| black_box(registry.publish_at("chan", 5, black_box(&[1])).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_subscribe,
    bench_subscribe_unsubscribe,
    bench_publish_0_sub,
    bench_publish_fan_out,
    bench_publish_single_tier,
);
criterion_main!(benches);
