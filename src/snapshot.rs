//! Read-only projections of the book and the shared engine handle.
//!
//! Readers get value copies produced under the read side of a
//! readers-writer lock: a snapshot always reflects the state after some
//! contiguous prefix of admissions, never a half-applied mutation.

use crate::engine::{Acknowledgment, Engine};
use crate::error::{CancelError, SubmitError};
use crate::types::{Order, OrderId, Symbol};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::Arc;

/// One price level as seen from outside: price and aggregate resting volume.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LevelView {
    pub price: Decimal,
    pub volume: Decimal,
}

/// Up to `n` levels per side, best price first.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DepthView {
    pub bids: Vec<LevelView>,
    pub asks: Vec<LevelView>,
}

/// Top-of-book summary plus depth, taken at a single point in time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub spread: Option<Decimal>,
    pub bids: Vec<LevelView>,
    pub asks: Vec<LevelView>,
}

/// Clonable handle running the single-writer/many-reader discipline over an
/// [`Engine`]: mutations take the write lock, reads take the read lock and
/// copy the answer out.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// See [`Engine::submit`]. Serialized with all other mutations.
    pub fn submit(&self, order: Order) -> Result<Acknowledgment, SubmitError> {
        self.inner.write().submit(order)
    }

    /// See [`Engine::cancel`].
    pub fn cancel(&self, order_id: &OrderId) -> Result<Acknowledgment, CancelError> {
        self.inner.write().cancel(order_id)
    }

    /// See [`Engine::bulk_load`].
    pub fn bulk_load(&self, orders: Vec<Order>) -> Result<(), SubmitError> {
        self.inner.write().bulk_load(orders)
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.inner.read().best_bid()
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.inner.read().best_ask()
    }

    pub fn spread(&self) -> Option<Decimal> {
        self.inner.read().spread()
    }

    pub fn depth(&self, levels: usize) -> DepthView {
        self.inner.read().depth(levels)
    }

    pub fn lookup(&self, order_id: &OrderId) -> Option<Order> {
        self.inner.read().lookup(order_id)
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn resting_orders(&self) -> Vec<Order> {
        self.inner.read().resting_orders()
    }

    /// Full top-of-book snapshot under one read-lock acquisition.
    pub fn snapshot(&self, levels: usize) -> BookSnapshot {
        let engine = self.inner.read();
        let depth = engine.depth(levels);
        BookSnapshot {
            symbol: engine.symbol().clone(),
            best_bid: engine.best_bid(),
            best_ask: engine.best_ask(),
            spread: engine.spread(),
            bids: depth.bids,
            asks: depth.asks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::EventEmitter;
    use crate::types::Side;

    fn shared() -> (SharedEngine, crate::emitter::EventReceiver) {
        let (emitter, rx) = EventEmitter::bounded(4096);
        (
            SharedEngine::new(Engine::new(Symbol::from("BTC-USD"), emitter)),
            rx,
        )
    }

    fn limit(id: &str, side: Side, price: i64, qty: i64) -> Order {
        Order::limit(id, "u1", "BTC-USD", side, Decimal::from(price), Decimal::from(qty))
    }

    #[test]
    fn snapshot_is_a_consistent_value_copy() {
        let (shared, _rx) = shared();
        shared.submit(limit("b1", Side::Buy, 99, 2)).unwrap();
        shared.submit(limit("a1", Side::Sell, 101, 3)).unwrap();

        let snap = shared.snapshot(10);
        assert_eq!(snap.best_bid, Some(Decimal::from(99)));
        assert_eq!(snap.best_ask, Some(Decimal::from(101)));
        assert_eq!(snap.spread, Some(Decimal::from(2)));
        assert_eq!(snap.bids.len(), 1);
        assert_eq!(snap.asks.len(), 1);

        // Later writes do not retroactively change the copy.
        shared.cancel(&OrderId::from("b1")).unwrap();
        assert_eq!(snap.best_bid, Some(Decimal::from(99)));
        assert_eq!(shared.best_bid(), None);
    }

    #[test]
    fn concurrent_readers_see_full_admissions_only() {
        let (shared, _rx) = shared();
        shared.submit(limit("seed", Side::Sell, 100, 1000)).unwrap();

        let writer = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    shared
                        .submit(limit(&format!("b{}", i), Side::Buy, 100, 1))
                        .unwrap();
                }
            })
        };
        let reader = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let depth = shared.depth(5);
                    // The resting ask level must always account for every
                    // fill applied so far, never a torn intermediate.
                    if let Some(ask) = depth.asks.first() {
                        assert!(ask.volume > Decimal::ZERO);
                        assert!(ask.volume <= Decimal::from(1000));
                    }
                    if let (Some(bid), Some(ask)) = (shared.best_bid(), shared.best_ask()) {
                        assert!(bid < ask);
                    }
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();

        // 200 buys at the ask price all filled against the seed order.
        assert_eq!(
            shared.lookup(&OrderId::from("seed")).unwrap().filled,
            Decimal::from(200)
        );
    }

    #[test]
    fn snapshot_serializes_for_market_data() {
        let (shared, _rx) = shared();
        shared.submit(limit("b1", Side::Buy, 99, 2)).unwrap();
        let json = serde_json::to_value(shared.snapshot(1)).unwrap();
        assert_eq!(json["symbol"], "BTC-USD");
        assert_eq!(json["bids"][0]["price"], "99");
        assert!(json["best_ask"].is_null());
    }
}
