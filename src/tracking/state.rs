//! The order lifecycle as a finite state machine.

use crate::model::{OrderRecord, OrderStatus};

/// Successor of `status`, `None` once the order is terminal or unrecognized.
pub fn next_state(status: OrderStatus) -> Option<OrderStatus> {
    match status {
        OrderStatus::Placed => Some(OrderStatus::Preparing),
        OrderStatus::Preparing => Some(OrderStatus::ReadyForPickup),
        OrderStatus::ReadyForPickup => Some(OrderStatus::Completed),
        OrderStatus::Completed | OrderStatus::Unrecognized => None,
    }
}

/// Only freshly placed orders with settled payment are simulated.
pub fn should_track(order: &OrderRecord) -> bool {
    order.status == OrderStatus::Placed && order.payment_resolved()
}

/// Customer-facing text broadcast with each status change.
pub fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Placed => "Your order has been received and is being processed",
        OrderStatus::Preparing => "Our chefs are preparing your delicious meal",
        OrderStatus::ReadyForPickup => "Your order is ready! Please come to the pickup counter",
        OrderStatus::Completed => "Order completed. Thank you for choosing Cantollege!",
        OrderStatus::Unrecognized => "Order status unavailable",
    }
}

/// Minutes until pickup as quoted to the customer.
pub fn estimated_minutes(status: OrderStatus) -> u32 {
    match status {
        OrderStatus::Placed => 15,
        OrderStatus::Preparing => 8,
        OrderStatus::ReadyForPickup | OrderStatus::Completed | OrderStatus::Unrecognized => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_state_is_linear_and_terminates() {
        let mut status = OrderStatus::Placed;
        let mut seen = vec![status];
        while let Some(next) = next_state(status) {
            status = next;
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                OrderStatus::Placed,
                OrderStatus::Preparing,
                OrderStatus::ReadyForPickup,
                OrderStatus::Completed
            ]
        );
        assert_eq!(next_state(OrderStatus::Unrecognized), None);
    }

    #[test]
    fn test_estimated_minutes() {
        assert_eq!(estimated_minutes(OrderStatus::Placed), 15);
        assert_eq!(estimated_minutes(OrderStatus::Preparing), 8);
        assert_eq!(estimated_minutes(OrderStatus::ReadyForPickup), 0);
    }
}
