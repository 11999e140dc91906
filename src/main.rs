//! Demo/load binary: replays a synthetic order stream through the engine.
//!
//! A consumer thread drains the event buffer (optionally printing each event
//! as a JSON line, like a bus feed) while the main thread submits orders.
//! Configure via env vars: `SYMBOL`, `ORDERS`, `SEED`, `BUFFER`,
//! `PRINT_EVENTS=1`.

use matchbook::market_data_gen::{Generator, GeneratorConfig};
use matchbook::{Engine, EngineEvent, EventEmitter, OrderStatus, SharedEngine, Symbol};
use std::io::Write;
use std::str::FromStr;
use tracing::{info, warn};

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    tracing_subscriber::fmt::init();

    let symbol: String = env_or("SYMBOL", "BTC-USD".to_string());
    let num_orders: usize = env_or("ORDERS", 10_000);
    let seed: u64 = env_or("SEED", 42);
    let capacity: usize = env_or("BUFFER", 4096);
    let print_events: bool = env_or("PRINT_EVENTS", 0u8) == 1;

    let (emitter, events) = EventEmitter::bounded(capacity);
    let engine = SharedEngine::new(Engine::new(Symbol::from(symbol.as_str()), emitter));

    let consumer = std::thread::spawn(move || {
        let mut stdout = std::io::stdout().lock();
        let mut trades = 0u64;
        let mut updates = 0u64;
        for event in events.iter() {
            match &event {
                EngineEvent::Trade(_) => trades += 1,
                EngineEvent::OrderUpdate(_) => updates += 1,
            }
            if print_events {
                if let Ok(line) = serde_json::to_string(&event) {
                    let _ = writeln!(stdout, "{}", line);
                }
            }
        }
        (trades, updates)
    });

    let orders = Generator::new(GeneratorConfig {
        seed,
        symbol: Symbol::from(symbol.as_str()),
        num_orders,
        ..Default::default()
    })
    .all_orders();

    let started = std::time::Instant::now();
    let mut accepted = 0u64;
    let mut filled = 0u64;
    let mut cancelled = 0u64;
    for order in orders {
        match engine.submit(order) {
            Ok(ack) => {
                accepted += 1;
                match ack.status {
                    OrderStatus::Filled => filled += 1,
                    OrderStatus::Cancelled => cancelled += 1,
                    _ => {}
                }
            }
            Err(e) => warn!(error = %e, "order rejected"),
        }
    }
    let elapsed = started.elapsed();

    let snapshot = engine.snapshot(5);
    info!(
        symbol = %snapshot.symbol,
        accepted,
        filled,
        cancelled,
        resting = engine.size(),
        best_bid = ?snapshot.best_bid,
        best_ask = ?snapshot.best_ask,
        spread = ?snapshot.spread,
        elapsed_ms = elapsed.as_millis() as u64,
        "replay complete"
    );

    // Dropping the engine closes the emitter; the consumer drains and exits.
    drop(engine);
    let (trades, updates) = consumer.join().expect("event consumer panicked");
    info!(trades, updates, "event stream drained");
}
