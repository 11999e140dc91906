//! Price-time priority matching.
//!
//! [`match_order`] runs one admitted taker against the opposite side of the
//! book: best price first, FIFO within a level, fill quantity the exact
//! minimum of the two residuals, trade price always the maker's. The loop
//! performs no I/O; the caller turns the returned fills into events.

use crate::order_book::{Fill, OrderBook};
use crate::types::{Order, OrderType, Side};
use rust_decimal::Decimal;

/// Matches `taker` against the book, consuming resting liquidity until the
/// taker is filled, the price limit stops being compatible, or the opposite
/// side is exhausted. Updates the taker's filled quantity and status; returns
/// the fills in execution order.
///
/// A market order sweeps with an extreme price limit so every resting level
/// is compatible. The taker is not inserted here; residual handling belongs
/// to the caller.
pub fn match_order(book: &mut OrderBook, taker: &mut Order, now: u64) -> Vec<Fill> {
    let price_limit = match (taker.order_type, taker.price) {
        (OrderType::Market, _) => match taker.side {
            Side::Buy => Decimal::MAX,
            Side::Sell => Decimal::ZERO,
        },
        (OrderType::Limit, Some(price)) => price,
        // A limit order without a price cannot cross anything.
        (OrderType::Limit, None) => return Vec::new(),
    };

    let fills = match taker.side {
        Side::Buy => book.take_from_asks(price_limit, taker.residual(), now),
        Side::Sell => book.take_from_bids(price_limit, taker.residual(), now),
    };

    for fill in &fills {
        taker.apply_fill(fill.quantity, now);
    }
    fills
}
