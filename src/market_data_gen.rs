//! Deterministic synthetic order streams.
//!
//! Seeded generator used by the property tests, the benchmarks, and the demo
//! binary. Same config (including seed) produces the same stream of orders.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::types::{Order, Side, Symbol};

/// Configuration for the synthetic order generator. All ranges are inclusive.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed; same seed, same stream.
    pub seed: u64,
    /// Symbol stamped on every generated order.
    pub symbol: Symbol,
    /// Number of orders produced by [`Generator::all_orders`].
    pub num_orders: usize,
    /// Probability of Buy (0.0..=1.0); Sell otherwise.
    pub buy_ratio: f64,
    /// Probability of a limit order (0.0..=1.0); market otherwise.
    pub limit_ratio: f64,
    /// Price range for limit orders, whole ticks.
    pub price_min: i64,
    pub price_max: i64,
    /// Quantity range, whole units.
    pub quantity_min: u64,
    pub quantity_max: u64,
    /// Number of distinct user ids (u-1..=u-N).
    pub num_users: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            symbol: Symbol::from("BTC-USD"),
            num_orders: 1000,
            buy_ratio: 0.5,
            limit_ratio: 0.9,
            price_min: 95,
            price_max: 105,
            quantity_min: 1,
            quantity_max: 100,
            num_users: 5,
        }
    }
}

/// Deterministic order stream. Create with [`Generator::new`]; pull orders
/// with [`Generator::next_order`] or collect with [`Generator::all_orders`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_order_id: u64,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            next_order_id: 1,
        }
    }

    /// Generates the next order, advancing the RNG and id counter.
    pub fn next_order(&mut self) -> Order {
        let id = format!("gen-{}", self.next_order_id);
        self.next_order_id += 1;
        let user = format!("u-{}", self.rng.gen_range(1..=self.config.num_users.max(1)));
        let side = if self.rng.gen::<f64>() < self.config.buy_ratio {
            Side::Buy
        } else {
            Side::Sell
        };
        let quantity = Decimal::from(
            self.rng
                .gen_range(self.config.quantity_min..=self.config.quantity_max),
        );
        if self.rng.gen::<f64>() < self.config.limit_ratio {
            let price = Decimal::from(
                self.rng
                    .gen_range(self.config.price_min..=self.config.price_max),
            );
            Order::limit(id, user, self.config.symbol.clone(), side, price, quantity)
        } else {
            Order::market(id, user, self.config.symbol.clone(), side, quantity)
        }
    }

    /// Returns exactly `n` orders, advancing the generator state.
    pub fn take_orders(&mut self, n: usize) -> Vec<Order> {
        (0..n).map(|_| self.next_order()).collect()
    }

    /// Returns the full stream as defined by `config.num_orders`.
    pub fn all_orders(&mut self) -> Vec<Order> {
        let n = self.config.num_orders;
        self.take_orders(n)
    }
}
