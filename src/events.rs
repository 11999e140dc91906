//! Lifecycle events published to the external bus.
//!
//! [`EngineEvent`] is the bus envelope: a TRADE for each match and an
//! ORDER_UPDATE for each order state change. Events for one symbol carry
//! strictly increasing sequence numbers and are delivered in that order.

use crate::types::{Order, OrderId, OrderStatus, OrderType, Side, Symbol, UserId};
use rust_decimal::Decimal;
use serde::Serializer;

fn serialize_option_decimal<S>(opt: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match opt {
        None => s.serialize_none(),
        Some(d) => s.serialize_str(&d.to_string()),
    }
}

/// A match between a taker and a resting maker. The price is always the
/// maker's resting price.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TradeEvent {
    pub symbol: Symbol,
    pub sequence: u64,
    pub timestamp: u64,
    pub price: Decimal,
    pub quantity: Decimal,
    pub taker_order_id: OrderId,
    pub maker_order_id: OrderId,
    pub taker_user_id: UserId,
    pub maker_user_id: UserId,
    pub taker_side: Side,
}

/// Snapshot of an order's state after a transition.
///
/// `reason` is present only when `status` is CANCELLED.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OrderUpdateEvent {
    pub symbol: Symbol,
    pub sequence: u64,
    pub timestamp: u64,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(default, serialize_with = "serialize_option_decimal")]
    pub price: Option<Decimal>,
    pub original_quantity: Decimal,
    pub filled_quantity: Decimal,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OrderUpdateEvent {
    /// Shapes an update event from the order's current state.
    pub fn for_order(order: &Order, sequence: u64, timestamp: u64, reason: Option<String>) -> Self {
        Self {
            symbol: order.symbol.clone(),
            sequence,
            timestamp,
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            side: order.side,
            order_type: order.order_type,
            price: order.price,
            original_quantity: order.quantity,
            filled_quantity: order.filled,
            status: order.status,
            reason,
        }
    }
}

/// Bus envelope, tagged with `event_kind` on the wire.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event_kind")]
pub enum EngineEvent {
    #[serde(rename = "TRADE")]
    Trade(TradeEvent),
    #[serde(rename = "ORDER_UPDATE")]
    OrderUpdate(OrderUpdateEvent),
}

impl EngineEvent {
    /// The per-symbol sequence number carried by the event.
    pub fn sequence(&self) -> u64 {
        match self {
            EngineEvent::Trade(t) => t.sequence,
            EngineEvent::OrderUpdate(u) => u.sequence,
        }
    }
}
