//! # matchbook
//!
//! Price-time priority matching core for a single symbol: an order book with
//! FIFO price levels, a deterministic matcher, a bounded event stream, and
//! consistent read views under a single-writer/many-reader regime.
//!
//! ## Entry point
//!
//! Create an [`EventEmitter`] for the bus-facing consumer, then an
//! [`Engine`] that owns the symbol. [`Engine::submit`] admits orders and
//! returns once every resulting event is enqueued; [`Engine::cancel`] removes
//! resting orders. Wrap the engine in [`SharedEngine`] when readers run
//! concurrently with the writer.
//!
//! ## Example
//!
//! ```rust
//! use matchbook::{Engine, EventEmitter, Order, OrderStatus, Side, Symbol};
//! use rust_decimal::Decimal;
//!
//! let (emitter, events) = EventEmitter::bounded(1024);
//! let mut engine = Engine::new(Symbol::from("BTC-USD"), emitter);
//!
//! let ack = engine
//!     .submit(Order::limit(
//!         "o-1",
//!         "alice",
//!         "BTC-USD",
//!         Side::Sell,
//!         Decimal::from(50_000),
//!         Decimal::from(2),
//!     ))
//!     .unwrap();
//! assert_eq!(ack.status, OrderStatus::Pending);
//!
//! let ack = engine
//!     .submit(Order::limit(
//!         "o-2",
//!         "bob",
//!         "BTC-USD",
//!         Side::Buy,
//!         Decimal::from(50_000),
//!         Decimal::ONE,
//!     ))
//!     .unwrap();
//! assert_eq!(ack.status, OrderStatus::Filled);
//!
//! // One resting update, then trade + maker update + taker update.
//! assert_eq!(events.try_iter().count(), 4);
//! assert_eq!(engine.best_ask(), Some(Decimal::from(50_000)));
//! ```
//!
//! ## Lower-level API
//!
//! [`OrderBook`] and [`match_order`] are exposed for callers that manage
//! sequencing and event publication themselves.

pub mod emitter;
pub mod engine;
pub mod error;
pub mod events;
pub mod market_data_gen;
pub mod matching;
pub mod order_book;
pub mod sequence;
pub mod snapshot;
pub mod types;

pub use emitter::{EventEmitter, EventReceiver};
pub use engine::{Acknowledgment, Engine, REASON_CANCELLED_BY_USER, REASON_INSUFFICIENT_LIQUIDITY};
pub use error::{CancelError, EmitError, SubmitError};
pub use events::{EngineEvent, OrderUpdateEvent, TradeEvent};
pub use matching::match_order;
pub use order_book::{Fill, OrderBook, PriceLevel};
pub use sequence::{Clock, Sequencer};
pub use snapshot::{BookSnapshot, DepthView, LevelView, SharedEngine};
pub use types::{Order, OrderId, OrderStatus, OrderType, Side, Symbol, UserId};
