//! Single-writer matching engine for one symbol.
//!
//! [`Engine`] is the entry point: admission ([`Engine::submit`]), cancel
//! ([`Engine::cancel`]), recovery bulk-load ([`Engine::bulk_load`]), and the
//! read accessors backing the snapshot views. Every admission is validated,
//! sequenced, matched, and fully enqueued to the emitter before it is
//! acknowledged.

use crate::emitter::EventEmitter;
use crate::error::{CancelError, EmitError, SubmitError};
use crate::events::{EngineEvent, OrderUpdateEvent, TradeEvent};
use crate::matching::match_order;
use crate::order_book::OrderBook;
use crate::sequence::{Clock, Sequencer};
use crate::snapshot::{DepthView, LevelView};
use crate::types::{Order, OrderId, OrderStatus, Symbol};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Cancel reason for an unfilled market remainder.
pub const REASON_INSUFFICIENT_LIQUIDITY: &str = "insufficient liquidity";
/// Cancel reason for an explicit cancel request.
pub const REASON_CANCELLED_BY_USER: &str = "cancelled by user";

/// Synchronous answer to a submit or cancel: the sequence number consumed by
/// the admission and the order's terminal status for it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Acknowledgment {
    pub order_id: OrderId,
    pub sequence: u64,
    pub status: OrderStatus,
}

/// Price-time priority matching core for a single symbol.
///
/// Mutations go through `&mut self` and are therefore serialized by
/// construction; wrap the engine in [`crate::SharedEngine`] for the
/// many-reader/single-writer regime.
#[derive(Debug)]
pub struct Engine {
    book: OrderBook,
    sequencer: Sequencer,
    clock: Clock,
    emitter: EventEmitter,
    /// Set once live traffic has been sequenced; guards `bulk_load`.
    live: bool,
}

impl Engine {
    /// Creates an engine owning `symbol`, publishing through `emitter`.
    pub fn new(symbol: Symbol, emitter: EventEmitter) -> Self {
        Self {
            book: OrderBook::new(symbol),
            sequencer: Sequencer::new(),
            clock: Clock::new(),
            emitter,
            live: false,
        }
    }

    /// Admits one order: validates, sequences, matches against the opposite
    /// side, rests any limit residual, cancels any market remainder, and
    /// enqueues every produced event before returning.
    ///
    /// Validation failures consume no sequence number and produce no events.
    pub fn submit(&mut self, mut order: Order) -> Result<Acknowledgment, SubmitError> {
        if let Err(e) = self.validate(&order) {
            debug!(order_id = %order.id, error = %e, "order rejected");
            return Err(e);
        }
        self.live = true;

        let now = self.clock.now();
        if order.created_at == 0 {
            order.created_at = now;
        }
        order.updated_at = now;
        order.status = OrderStatus::Pending;
        order.filled = Decimal::ZERO;
        let admission_seq = self.sequencer.next();
        order.sequence = admission_seq;

        let fills = match_order(&mut self.book, &mut order, now);

        let reason = if order.is_market() && order.residual() > Decimal::ZERO {
            order.status = OrderStatus::Cancelled;
            Some(REASON_INSUFFICIENT_LIQUIDITY.to_string())
        } else {
            None
        };

        // The admission's first event reuses the admission sequence number;
        // every further event draws a fresh one. The emitted stream stays
        // gapless and strictly increasing.
        let mut events: Vec<EngineEvent> = Vec::with_capacity(fills.len() * 2 + 1);
        for fill in &fills {
            let seq = if events.is_empty() {
                admission_seq
            } else {
                self.sequencer.next()
            };
            events.push(EngineEvent::Trade(TradeEvent {
                symbol: self.book.symbol().clone(),
                sequence: seq,
                timestamp: self.clock.now(),
                price: fill.price,
                quantity: fill.quantity,
                taker_order_id: order.id.clone(),
                maker_order_id: fill.maker.id.clone(),
                taker_user_id: order.user_id.clone(),
                maker_user_id: fill.maker.user_id.clone(),
                taker_side: order.side,
            }));
            let seq = self.sequencer.next();
            events.push(EngineEvent::OrderUpdate(OrderUpdateEvent::for_order(
                &fill.maker,
                seq,
                self.clock.now(),
                None,
            )));
        }

        let seq = if events.is_empty() {
            admission_seq
        } else {
            self.sequencer.next()
        };
        events.push(EngineEvent::OrderUpdate(OrderUpdateEvent::for_order(
            &order,
            seq,
            self.clock.now(),
            reason,
        )));

        if order.is_limit() && !order.is_terminal() && order.residual() > Decimal::ZERO {
            self.book
                .insert(order.clone())
                .expect("residual insert cannot collide: admission checked the id");
        }

        let status = order.status;
        self.publish(events)
            .map_err(|_| SubmitError::BackpressureTimeout)?;
        Ok(Acknowledgment {
            order_id: order.id,
            sequence: admission_seq,
            status,
        })
    }

    /// Cancels a resting order. Targets that are absent or already terminal
    /// return [`CancelError::NotFound`]; a second cancel of the same id is
    /// therefore NotFound and leaves the book untouched.
    pub fn cancel(&mut self, order_id: &OrderId) -> Result<Acknowledgment, CancelError> {
        let Some(mut order) = self.book.remove(order_id) else {
            return Err(CancelError::NotFound(order_id.clone()));
        };
        self.live = true;
        let now = self.clock.now();
        let seq = self.sequencer.next();
        order.status = OrderStatus::Cancelled;
        order.updated_at = now;
        let event = EngineEvent::OrderUpdate(OrderUpdateEvent::for_order(
            &order,
            seq,
            now,
            Some(REASON_CANCELLED_BY_USER.to_string()),
        ));
        self.publish(vec![event])
            .map_err(|_| CancelError::BackpressureTimeout)?;
        Ok(Acknowledgment {
            order_id: order.id,
            sequence: seq,
            status: OrderStatus::Cancelled,
        })
    }

    /// Recovery bulk-load: inserts open orders directly at their stored
    /// price/side with matching disabled and no event emission, preserving
    /// their original sequence numbers. Terminal orders in the input are
    /// skipped.
    ///
    /// # Panics
    ///
    /// Panics if any live admission has already been sequenced; recovery must
    /// complete before live traffic.
    pub fn bulk_load(&mut self, orders: Vec<Order>) -> Result<(), SubmitError> {
        assert!(
            !self.live,
            "bulk_load must complete before live traffic is admitted"
        );
        let mut loaded = 0usize;
        for order in orders {
            if order.is_terminal() || order.residual() <= Decimal::ZERO {
                continue;
            }
            if order.quantity <= Decimal::ZERO {
                return Err(SubmitError::InvalidQuantity);
            }
            self.sequencer.advance_past(order.sequence);
            self.book.insert(order)?;
            loaded += 1;
        }
        info!(symbol = %self.book.symbol(), loaded, "bulk-load complete");
        Ok(())
    }

    /// Highest resting buy price.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.book.best_bid()
    }

    /// Lowest resting sell price.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.book.best_ask()
    }

    /// Best-ask minus best-bid; `None` unless both sides are non-empty.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.book.best_bid(), self.book.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Up to `levels` price levels per side, best first.
    pub fn depth(&self, levels: usize) -> DepthView {
        DepthView {
            bids: self
                .book
                .iterate(crate::types::Side::Buy, levels)
                .into_iter()
                .map(|(price, volume)| LevelView { price, volume })
                .collect(),
            asks: self
                .book
                .iterate(crate::types::Side::Sell, levels)
                .into_iter()
                .map(|(price, volume)| LevelView { price, volume })
                .collect(),
        }
    }

    /// Value copy of a live order.
    pub fn lookup(&self, order_id: &OrderId) -> Option<Order> {
        self.book.lookup(order_id)
    }

    /// Number of resting orders.
    pub fn size(&self) -> usize {
        self.book.size()
    }

    /// Value copies of every resting order (persistence export).
    pub fn resting_orders(&self) -> Vec<Order> {
        self.book.resting_orders()
    }

    /// The symbol this engine owns.
    pub fn symbol(&self) -> &Symbol {
        self.book.symbol()
    }

    /// Last sequence number allocated (0 before the first admission).
    pub fn last_sequence(&self) -> u64 {
        self.sequencer.last()
    }

    fn validate(&self, order: &Order) -> Result<(), SubmitError> {
        if order.symbol != *self.book.symbol() {
            return Err(SubmitError::UnknownSymbol(order.symbol.0.clone()));
        }
        if order.quantity <= Decimal::ZERO {
            return Err(SubmitError::InvalidQuantity);
        }
        if order.is_limit() && !order.price.map_or(false, |p| p > Decimal::ZERO) {
            return Err(SubmitError::InvalidPrice);
        }
        if self.book.contains(&order.id) {
            return Err(SubmitError::DuplicateOrder(order.id.clone()));
        }
        Ok(())
    }

    /// Hands a committed admission's events to the emitter, in order.
    ///
    /// A timeout (bounded-wait emitters only) is surfaced to the caller; the
    /// admission itself stays committed. A closed channel after commit is an
    /// unrecoverable bug and panics.
    fn publish(&self, events: Vec<EngineEvent>) -> Result<(), EmitError> {
        for event in events {
            match self.emitter.emit(event) {
                Ok(()) => {}
                Err(EmitError::Timeout) => return Err(EmitError::Timeout),
                Err(EmitError::Closed) => {
                    panic!("event channel closed with a committed admission in flight")
                }
            }
        }
        Ok(())
    }
}
