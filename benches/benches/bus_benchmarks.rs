use std::{cell::Cell, hint::black_box, rc::Rc};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use msgbus::{DeferredBus, MessageBus};

fn bench_subscribe(c: &mut Criterion) {
    c.bench_function("subscribe", |b| {
        b.iter_batched(
            MessageBus::new,
            |bus| {
                black_box(bus.subscribe("chan", |_: u32| {}));
                bus
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_sync_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_publish");
    for subscribers in [1usize, 10, 100] {
        let bus = MessageBus::new();
        let sum = Rc::new(Cell::new(0u64));
        for _ in 0..subscribers {
            let sum = sum.clone();
            bus.subscribe("chan", move |v: u64| sum.set(sum.get().wrapping_add(v)));
        }
        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| bus.publish("chan", black_box(7u64)).unwrap());
            },
        );
        black_box(sum.get());
    }
    group.finish();
}

fn bench_publish_and_store(c: &mut Criterion) {
    let bus = MessageBus::new();
    bus.subscribe("state", |_: (u8, f32)| {});
    c.bench_function("publish_and_store", |b| {
        b.iter(|| {
            bus.publish_and_store("state", black_box((1u8, 0.5f32)))
                .unwrap()
        })
    });
}

fn bench_deferred_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("deferred_publish_drain");
    for batch in [1usize, 32, 256] {
        let bus = DeferredBus::new();
        let topics = ["a", "b", "c", "d"];
        for topic in topics {
            bus.subscribe(topic, |v: u32| {
                black_box(v);
            });
        }
        let mut rng = SmallRng::seed_from_u64(42);
        let plan: Vec<(usize, u32)> = (0..batch)
            .map(|_| (rng.gen_range(0..topics.len()), rng.gen()))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(batch), &plan, |b, plan| {
            b.iter(|| {
                for &(idx, v) in plan {
                    bus.publish(topics[idx], v);
                }
                black_box(bus.drain())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_subscribe,
    bench_sync_publish,
    bench_publish_and_store,
    bench_deferred_drain
);
criterion_main!(benches);
