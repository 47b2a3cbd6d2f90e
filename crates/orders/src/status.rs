//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of a purchase order.
///
/// Status transitions:
/// ```text
/// Pending ◄──┬──► Backordered     (recomputed on every update)
///            └──► Special
///     any of the above ──► Arrived (terminal, via arrive only)
/// ```
///
/// While an order has not arrived, its status is a pure function of
/// `backordered` and the presence of `item_name` — see [`derive_active`].
/// `Arrived` is set once by the arrive operation and is terminal.
///
/// [`derive_active`]: OrderStatus::derive_active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Ordered, nothing unusual.
    #[default]
    Pending,

    /// The supplier has backordered the merchandise.
    Backordered,

    /// A custom/special item described by `item_name` rather than a
    /// catalog reference.
    Special,

    /// Merchandise received (terminal state).
    Arrived,
}

impl OrderStatus {
    /// Recomputes the status of a not-yet-arrived order.
    ///
    /// Strict precedence: `backordered` wins, then a non-empty
    /// `item_name` classifies the order as special, otherwise pending.
    /// `special_order` and `tbd_expected` are deliberately ignored.
    pub fn derive_active(backordered: bool, item_name: Option<&str>) -> Self {
        if backordered {
            OrderStatus::Backordered
        } else if item_name.is_some_and(|name| !name.is_empty()) {
            OrderStatus::Special
        } else {
            OrderStatus::Pending
        }
    }

    /// Returns true if this is a terminal state (no further recomputation).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Arrived)
    }

    /// Returns true if the status is a valid caller-supplied initial state.
    pub fn allowed_at_creation(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns the status name as stored and sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Backordered => "BACKORDERED",
            OrderStatus::Special => "SPECIAL",
            OrderStatus::Arrived => "ARRIVED",
        }
    }

    /// Parses a stored/wire status name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "BACKORDERED" => Some(OrderStatus::Backordered),
            "SPECIAL" => Some(OrderStatus::Special),
            "ARRIVED" => Some(OrderStatus::Arrived),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
