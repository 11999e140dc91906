//! Engine throughput benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench engine`.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use matchbook::market_data_gen::{Generator, GeneratorConfig};
use matchbook::{Engine, EventEmitter, EventReceiver, OrderId, Symbol};

const EVENT_BUFFER: usize = 1 << 14;

fn engine_with_buffer() -> (Engine, EventReceiver) {
    let (emitter, rx) = EventEmitter::bounded(EVENT_BUFFER);
    (Engine::new(Symbol::from("BTC-USD"), emitter), rx)
}

fn bench_submit_throughput(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("submit_1000", |b| {
        b.iter_batched(
            || {
                let config = GeneratorConfig {
                    seed: 42,
                    num_orders: N,
                    ..Default::default()
                };
                let orders = Generator::new(config).all_orders();
                let (engine, rx) = engine_with_buffer();
                (engine, orders, rx)
            },
            |(mut engine, orders, rx)| {
                for order in orders {
                    let _ = engine.submit(order).unwrap();
                }
                drop(rx);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cancel_after_resting(c: &mut Criterion) {
    const RESTING: usize = 500;
    const CANCELS: usize = 100;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(CANCELS as u64));
    group.bench_function("cancel_100_after_500_resting", |b| {
        b.iter_batched(
            || {
                // Limit-only stream so most orders rest for the cancel pass.
                let config = GeneratorConfig {
                    seed: 123,
                    num_orders: RESTING,
                    limit_ratio: 1.0,
                    ..Default::default()
                };
                let orders = Generator::new(config).all_orders();
                let (mut engine, rx) = engine_with_buffer();
                let cancel_ids: Vec<OrderId> = orders[..CANCELS]
                    .iter()
                    .map(|o| o.id.clone())
                    .collect();
                for order in orders {
                    engine.submit(order).unwrap();
                }
                (engine, cancel_ids, rx)
            },
            |(mut engine, cancel_ids, rx)| {
                for id in cancel_ids {
                    // Some targets will already be filled; NotFound is fine.
                    let _ = engine.cancel(&id);
                }
                drop(rx);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_submit_throughput, bench_cancel_after_resting);
criterion_main!(benches);
