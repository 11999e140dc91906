//! Core order types and identifiers.
//!
//! All identifiers are opaque-string newtypes. [`Order`] carries the full
//! lifecycle state: original and filled quantity, [`OrderStatus`], timestamps,
//! and the admission sequence number that tie-breaks time priority.

use rust_decimal::Decimal;

/// Unique order identifier (opaque, assigned by the caller).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub String);

/// Owning-user identifier (opaque).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct UserId(pub String);

/// Tradable instrument identifier, e.g. "BTC-USD". One engine owns one symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Symbol(pub String);

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        OrderId(s.to_string())
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        OrderId(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol(s)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

/// Order type: limit (with price) or market (take best available).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

/// Order lifecycle status.
///
/// `Filled` iff filled equals the original quantity; `Partial` iff strictly
/// between zero and the original; `Cancelled` only via explicit cancel or a
/// market remainder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Partial,
    Filled,
    Cancelled,
}

/// A trading order.
///
/// For limit orders `price` must be `Some(...)`; for market orders it is
/// ignored. `created_at`/`updated_at` are unix nanos; zero means unset and the
/// engine stamps them at admission. `sequence` is zero until admission.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    pub filled: Decimal,
    pub status: OrderStatus,
    pub created_at: u64,
    pub updated_at: u64,
    pub sequence: u64,
}

impl Order {
    /// Builds a limit order in the pre-admission state.
    pub fn limit(
        id: impl Into<OrderId>,
        user_id: impl Into<UserId>,
        symbol: impl Into<Symbol>,
        side: Side,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
            filled: Decimal::ZERO,
            status: OrderStatus::Pending,
            created_at: 0,
            updated_at: 0,
            sequence: 0,
        }
    }

    /// Builds a market order in the pre-admission state.
    pub fn market(
        id: impl Into<OrderId>,
        user_id: impl Into<UserId>,
        symbol: impl Into<Symbol>,
        side: Side,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            price: None,
            quantity,
            filled: Decimal::ZERO,
            status: OrderStatus::Pending,
            created_at: 0,
            updated_at: 0,
            sequence: 0,
        }
    }

    /// Unfilled remainder: original quantity minus filled.
    pub fn residual(&self) -> Decimal {
        self.quantity - self.filled
    }

    pub fn is_limit(&self) -> bool {
        matches!(self.order_type, OrderType::Limit)
    }

    pub fn is_market(&self) -> bool {
        matches!(self.order_type, OrderType::Market)
    }

    /// Filled and cancelled orders never re-enter the book.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    /// Applies a fill: bumps filled quantity, restamps `updated_at`, and
    /// recomputes the status (Partial or Filled).
    pub fn apply_fill(&mut self, quantity: Decimal, now: u64) {
        self.filled += quantity;
        self.updated_at = now;
        self.status = if self.residual() <= Decimal::ZERO {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }
}
