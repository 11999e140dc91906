//! Single-symbol order book: bids and asks in price-time priority.
//!
//! Each side is an ordered map from price to a FIFO [`PriceLevel`]; best bid
//! is the highest price, best ask the lowest. A secondary index maps order id
//! to (side, price) for targeted removal. Liquidity is taken through
//! [`OrderBook::take_from_asks`] / [`OrderBook::take_from_bids`], used by
//! [`crate::matching`].

use crate::error::SubmitError;
use crate::types::{Order, OrderId, Side, Symbol};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// All resting orders at one price on one side, oldest admission first.
///
/// `volume` is the sum of member residuals and is maintained inline on every
/// mutation. An empty level never stays in the book.
#[derive(Clone, Debug)]
pub struct PriceLevel {
    price: Decimal,
    orders: VecDeque<Order>,
    volume: Decimal,
}

impl PriceLevel {
    fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            volume: Decimal::ZERO,
        }
    }

    fn push_back(&mut self, order: Order) {
        self.volume += order.residual();
        self.orders.push_back(order);
    }

    fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| &o.id == order_id)?;
        let order = self.orders.remove(pos)?;
        self.volume -= order.residual();
        Some(order)
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// One fill taken from the book: the post-fill maker snapshot, the trade
/// price (always the maker's resting price), and the fill quantity.
#[derive(Clone, Debug)]
pub struct Fill {
    pub maker: Order,
    pub price: Decimal,
    pub quantity: Decimal,
}

/// Single-symbol order book.
#[derive(Clone, Debug)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BTreeMap<Decimal, PriceLevel>,
    asks: BTreeMap<Decimal, PriceLevel>,
    /// Order id -> (side, price) for targeted removal and lookup.
    index: HashMap<OrderId, (Side, Decimal)>,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Rests a limit order at the tail of its price level (time priority).
    ///
    /// The order must carry a price and a positive residual; a duplicate id
    /// is rejected and leaves the book untouched.
    pub fn insert(&mut self, order: Order) -> Result<(), SubmitError> {
        if self.index.contains_key(&order.id) {
            return Err(SubmitError::DuplicateOrder(order.id.clone()));
        }
        let price = order.price.ok_or(SubmitError::InvalidPrice)?;
        let side = order.side;
        self.index.insert(order.id.clone(), (side, price));
        let tree = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        tree.entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(order);
        Ok(())
    }

    /// Removes an order by id, deleting its level if that empties it.
    /// Returns `None` for unknown ids.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let (side, price) = self.index.remove(order_id)?;
        let tree = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = tree.get_mut(&price)?;
        let order = level.remove(order_id);
        if level.is_empty() {
            tree.remove(&price);
        }
        order
    }

    /// Front price of a side, or `None` when the side is empty.
    pub fn best(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Buy => self.bids.keys().next_back().copied(),
            Side::Sell => self.asks.keys().next().copied(),
        }
    }

    /// Highest resting buy price.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.best(Side::Buy)
    }

    /// Lowest resting sell price.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.best(Side::Sell)
    }

    /// Up to `depth` levels from the best price outward, as value copies of
    /// (price, aggregate volume).
    pub fn iterate(&self, side: Side, depth: usize) -> Vec<(Decimal, Decimal)> {
        match side {
            Side::Buy => self
                .bids
                .iter()
                .rev()
                .take(depth)
                .map(|(price, level)| (*price, level.volume))
                .collect(),
            Side::Sell => self
                .asks
                .iter()
                .take(depth)
                .map(|(price, level)| (*price, level.volume))
                .collect(),
        }
    }

    /// Value copy of a live order, or `None`.
    pub fn lookup(&self, order_id: &OrderId) -> Option<Order> {
        let (side, price) = self.index.get(order_id)?;
        let tree = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        tree.get(price)?
            .orders
            .iter()
            .find(|o| &o.id == order_id)
            .cloned()
    }

    /// Whether an order id is currently live in the book.
    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.index.contains_key(order_id)
    }

    /// Total number of resting orders across both sides.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Takes liquidity from the ask side for an incoming buy, best price
    /// first, FIFO within each level. Stops at `price_limit` (exclusive
    /// above) or when `quantity` is exhausted. Fully filled makers leave the
    /// book; a partially filled maker stays at the head of its level.
    pub fn take_from_asks(&mut self, price_limit: Decimal, quantity: Decimal, now: u64) -> Vec<Fill> {
        let prices: Vec<Decimal> = self.asks.keys().copied().collect();
        self.sweep(Side::Sell, prices, price_limit, quantity, now)
    }

    /// Takes liquidity from the bid side for an incoming sell, best price
    /// first. Stops at `price_limit` (exclusive below).
    pub fn take_from_bids(&mut self, price_limit: Decimal, quantity: Decimal, now: u64) -> Vec<Fill> {
        let prices: Vec<Decimal> = self.bids.keys().copied().rev().collect();
        self.sweep(Side::Buy, prices, price_limit, quantity, now)
    }

    fn sweep(
        &mut self,
        book_side: Side,
        prices: Vec<Decimal>,
        price_limit: Decimal,
        mut quantity: Decimal,
        now: u64,
    ) -> Vec<Fill> {
        let mut fills = Vec::new();
        for price in prices {
            let beyond_limit = match book_side {
                Side::Sell => price > price_limit,
                Side::Buy => price < price_limit,
            };
            if beyond_limit || quantity <= Decimal::ZERO {
                break;
            }
            let tree = match book_side {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            let Some(level) = tree.get_mut(&price) else {
                continue;
            };
            while quantity > Decimal::ZERO {
                let Some(maker) = level.orders.front_mut() else {
                    break;
                };
                let fill_qty = quantity.min(maker.residual());
                maker.apply_fill(fill_qty, now);
                level.volume -= fill_qty;
                quantity -= fill_qty;
                let snapshot = maker.clone();
                if snapshot.residual() <= Decimal::ZERO {
                    level.orders.pop_front();
                    self.index.remove(&snapshot.id);
                }
                fills.push(Fill {
                    maker: snapshot,
                    price,
                    quantity: fill_qty,
                });
            }
            if level.is_empty() {
                tree.remove(&price);
            }
        }
        fills
    }

    /// Value copies of every resting order, bids then asks, best price first
    /// and FIFO within each level. Used by the persistence collaborator and
    /// by invariant checks.
    pub fn resting_orders(&self) -> Vec<Order> {
        let mut out = Vec::with_capacity(self.index.len());
        for (_, level) in self.bids.iter().rev() {
            out.extend(level.orders.iter().cloned());
        }
        for level in self.asks.values() {
            out.extend(level.orders.iter().cloned());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderStatus, Side};

    fn order(id: &str, side: Side, price: i64, qty: i64) -> Order {
        Order::limit(id, "u1", "BTC-USD", side, Decimal::from(price), Decimal::from(qty))
    }

    fn book() -> OrderBook {
        OrderBook::new(Symbol::from("BTC-USD"))
    }

    #[test]
    fn insert_and_best_prices() {
        let mut book = book();
        book.insert(order("b1", Side::Buy, 99, 1)).unwrap();
        book.insert(order("b2", Side::Buy, 100, 1)).unwrap();
        book.insert(order("a1", Side::Sell, 101, 1)).unwrap();
        book.insert(order("a2", Side::Sell, 102, 1)).unwrap();
        assert_eq!(book.best_bid(), Some(Decimal::from(100)));
        assert_eq!(book.best_ask(), Some(Decimal::from(101)));
        assert_eq!(book.best(Side::Buy), book.best_bid());
        assert_eq!(book.best(Side::Sell), book.best_ask());
        assert_eq!(book.size(), 4);
    }

    #[test]
    fn duplicate_insert_rejected_book_unchanged() {
        let mut book = book();
        book.insert(order("b1", Side::Buy, 100, 1)).unwrap();
        let err = book.insert(order("b1", Side::Buy, 101, 2)).unwrap_err();
        assert_eq!(err, SubmitError::DuplicateOrder(OrderId::from("b1")));
        assert_eq!(book.size(), 1);
        assert_eq!(book.best_bid(), Some(Decimal::from(100)));
    }

    #[test]
    fn remove_unknown_returns_none() {
        let mut book = book();
        assert!(book.remove(&OrderId::from("nope")).is_none());
    }

    #[test]
    fn remove_middle_of_level_keeps_fifo_and_volume() {
        let mut book = book();
        book.insert(order("a", Side::Buy, 100, 1)).unwrap();
        book.insert(order("b", Side::Buy, 100, 2)).unwrap();
        book.insert(order("c", Side::Buy, 100, 3)).unwrap();

        let removed = book.remove(&OrderId::from("b")).unwrap();
        assert_eq!(removed.quantity, Decimal::from(2));
        let levels = book.iterate(Side::Buy, 10);
        assert_eq!(levels, vec![(Decimal::from(100), Decimal::from(4))]);
        assert!(book.lookup(&OrderId::from("a")).is_some());
        assert!(book.lookup(&OrderId::from("b")).is_none());
        assert!(book.lookup(&OrderId::from("c")).is_some());
    }

    #[test]
    fn removing_last_order_deletes_level() {
        let mut book = book();
        book.insert(order("a1", Side::Sell, 101, 1)).unwrap();
        book.remove(&OrderId::from("a1")).unwrap();
        assert!(book.best_ask().is_none());
        assert!(book.iterate(Side::Sell, 10).is_empty());
    }

    #[test]
    fn iterate_orders_levels_best_first() {
        let mut book = book();
        book.insert(order("b1", Side::Buy, 98, 1)).unwrap();
        book.insert(order("b2", Side::Buy, 100, 2)).unwrap();
        book.insert(order("b3", Side::Buy, 99, 3)).unwrap();
        book.insert(order("a1", Side::Sell, 103, 1)).unwrap();
        book.insert(order("a2", Side::Sell, 101, 2)).unwrap();

        let bids = book.iterate(Side::Buy, 2);
        assert_eq!(
            bids,
            vec![
                (Decimal::from(100), Decimal::from(2)),
                (Decimal::from(99), Decimal::from(3)),
            ]
        );
        let asks = book.iterate(Side::Sell, 2);
        assert_eq!(
            asks,
            vec![
                (Decimal::from(101), Decimal::from(2)),
                (Decimal::from(103), Decimal::from(1)),
            ]
        );
    }

    #[test]
    fn take_from_asks_sweeps_price_then_time() {
        let mut book = book();
        book.insert(order("a1", Side::Sell, 101, 1)).unwrap();
        book.insert(order("a2", Side::Sell, 100, 2)).unwrap();
        book.insert(order("a3", Side::Sell, 100, 3)).unwrap();

        let fills = book.take_from_asks(Decimal::from(101), Decimal::from(6), 1);
        // Best price first, FIFO within the level, then the next level up.
        assert_eq!(fills.len(), 3);
        assert_eq!(fills[0].maker.id, OrderId::from("a2"));
        assert_eq!(fills[0].quantity, Decimal::from(2));
        assert_eq!(fills[0].price, Decimal::from(100));
        assert_eq!(fills[1].maker.id, OrderId::from("a3"));
        assert_eq!(fills[1].quantity, Decimal::from(3));
        assert_eq!(fills[2].maker.id, OrderId::from("a1"));
        assert_eq!(fills[2].quantity, Decimal::from(1));
        assert_eq!(fills[2].price, Decimal::from(101));
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn partial_head_fill_keeps_maker_and_updates_volume() {
        let mut book = book();
        book.insert(order("a1", Side::Sell, 100, 5)).unwrap();
        let fills = book.take_from_asks(Decimal::from(100), Decimal::from(2), 1);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, Decimal::from(2));
        assert_eq!(fills[0].maker.status, OrderStatus::Partial);
        // Maker stays resting with its residual reflected in the level volume.
        let resting = book.lookup(&OrderId::from("a1")).unwrap();
        assert_eq!(resting.residual(), Decimal::from(3));
        assert_eq!(
            book.iterate(Side::Sell, 1),
            vec![(Decimal::from(100), Decimal::from(3))]
        );
    }

    #[test]
    fn take_from_bids_respects_price_limit() {
        let mut book = book();
        book.insert(order("b1", Side::Buy, 100, 1)).unwrap();
        book.insert(order("b2", Side::Buy, 99, 1)).unwrap();
        // A sell limited at 100 must not reach the 99 level.
        let fills = book.take_from_bids(Decimal::from(100), Decimal::from(5), 1);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].maker.id, OrderId::from("b1"));
        assert_eq!(book.best_bid(), Some(Decimal::from(99)));
    }

    #[test]
    fn exhausted_level_is_deleted_after_sweep() {
        let mut book = book();
        book.insert(order("a1", Side::Sell, 100, 1)).unwrap();
        book.insert(order("a2", Side::Sell, 100, 1)).unwrap();
        let fills = book.take_from_asks(Decimal::from(100), Decimal::from(2), 1);
        assert_eq!(fills.len(), 2);
        assert!(book.best_ask().is_none());
        assert_eq!(book.size(), 0);
    }

    #[test]
    fn resting_orders_exports_both_sides() {
        let mut book = book();
        book.insert(order("b1", Side::Buy, 100, 1)).unwrap();
        book.insert(order("a1", Side::Sell, 101, 2)).unwrap();
        let resting = book.resting_orders();
        assert_eq!(resting.len(), 2);
        assert_eq!(resting[0].id, OrderId::from("b1"));
        assert_eq!(resting[1].id, OrderId::from("a1"));
    }
}
