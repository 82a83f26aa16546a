use crate::model::{OrderId, OrderStatus, Timestamp};
use crate::tracking::state::{estimated_minutes, status_message};
use serde::{Deserialize, Serialize};

/// A status change pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
    pub estimated_minutes: u32,
    pub message: String,
}

impl OrderStatusUpdate {
    pub fn new(order_id: OrderId, status: OrderStatus, timestamp: Timestamp) -> Self {
        Self {
            order_id,
            status,
            timestamp,
            estimated_minutes: estimated_minutes(status),
            message: status_message(status).to_string(),
        }
    }
}

/// One entry of a reconstructed order timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTrackingEvent {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}
