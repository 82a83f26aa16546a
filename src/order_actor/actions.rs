//! Custom actions for the Order actor.
//!
//! Status and payment are the only parts of a placed order that change. Both
//! go through actions so the store can police the lifecycle.

use crate::model::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Moves the order to the given status.
    ///
    /// Only the immediate successor is accepted. Repeating the current status
    /// is a no-op so a replayed tracking event does no harm.
    AdvanceStatus(OrderStatus),
    /// Records the outcome of the payment flow.
    SetPaymentStatus(PaymentStatus),
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// The status after the action and whether it changed.
    AdvanceStatus { status: OrderStatus, changed: bool },
    SetPaymentStatus(PaymentStatus),
}
