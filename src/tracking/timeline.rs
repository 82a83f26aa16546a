//! Pure reconstructions of an order's expected timetable.
//!
//! Nothing here touches the scheduler: the timeline is derived from the
//! placement timestamp, the current status and the configured dwell times.

use crate::config::TrackingConfig;
use crate::model::{OrderRecord, OrderStatus, Timestamp};
use crate::tracking::event::OrderTrackingEvent;
use crate::tracking::state::estimated_minutes;

const STAGES: [(OrderStatus, &str, &str); 4] = [
    (
        OrderStatus::Placed,
        "Order Placed",
        "Your order has been received and confirmed",
    ),
    (
        OrderStatus::Preparing,
        "Preparing Your Order",
        "Our chefs have started preparing your meal",
    ),
    (
        OrderStatus::ReadyForPickup,
        "Ready for Pickup",
        "Your order is ready! Please come to the pickup counter",
    ),
    (
        OrderStatus::Completed,
        "Order Completed",
        "Thank you for choosing Cantollege!",
    ),
];

/// Expected events up to and including the order's current status.
///
/// `Placed` is always present; each later stage appears only once the order
/// has reached it, stamped at placement time plus the cumulative dwell.
pub fn tracking_events(order: &OrderRecord, config: &TrackingConfig) -> Vec<OrderTrackingEvent> {
    let mut events = Vec::with_capacity(STAGES.len());
    let mut at = order.timestamp;

    for (index, (status, title, description)) in STAGES.into_iter().enumerate() {
        if index > 0 {
            if !order.status.has_reached(status) {
                break;
            }
            at += elapsed(config, STAGES[index - 1].0);
        }
        events.push(OrderTrackingEvent {
            order_id: order.id.clone(),
            status,
            timestamp: at,
            title: title.to_string(),
            description: description.to_string(),
            estimated_minutes: (status == OrderStatus::Preparing).then(|| estimated_minutes(status)),
        });
    }

    events
}

/// When the order is expected to be ready for pickup.
pub fn estimated_completion_time(order: &OrderRecord, config: &TrackingConfig, now: Timestamp) -> Timestamp {
    match order.status {
        OrderStatus::Placed | OrderStatus::Preparing => {
            order.timestamp
                + elapsed(config, OrderStatus::Placed)
                + elapsed(config, OrderStatus::Preparing)
        }
        OrderStatus::ReadyForPickup => now,
        OrderStatus::Completed => order.timestamp,
        OrderStatus::Unrecognized => now + to_ms(config.fallback_window_ms),
    }
}

fn elapsed(config: &TrackingConfig, status: OrderStatus) -> i64 {
    config.dwell_ms(status).map(to_ms).unwrap_or(0)
}

fn to_ms(millis: u64) -> i64 {
    i64::try_from(millis).unwrap_or(i64::MAX)
}
