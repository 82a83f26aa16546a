//! Order status simulator.
//!
//! Advances orders along `Placed → Preparing → Ready for Pickup → Completed`
//! on the configured timetable and fans each change out to subscribers.
//!
//! - [`next_state`] is the whole state machine.
//! - [`TrackingActor`] owns the schedule and the [`SubscriberRegistry`].
//! - [`tracking_events`] and [`estimated_completion_time`] are pure helpers
//!   for rendering a timeline.
//!
//! Persisting a transition is the job of a [`StatusListener`], normally the
//! [`OrderClient`](crate::clients::OrderClient).

pub mod actor;
pub mod clock;
pub mod error;
pub mod event;
pub mod registry;
pub mod state;
pub mod timeline;

pub use actor::{TrackingActor, TrackingRequest};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TrackingError;
pub use event::{OrderStatusUpdate, OrderTrackingEvent};
pub use registry::{SubscriberRegistry, Subscription, SubscriptionId, Topic};
pub use state::{estimated_minutes, next_state, should_track, status_message};
pub use timeline::{estimated_completion_time, tracking_events};

use crate::clients::TrackingClient;
use crate::config::TrackingConfig;
use crate::model::{OrderId, OrderStatus};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Receives each transition before subscribers see it.
///
/// Called from the order's own delivery task, one transition at a time, so
/// it may await freely and may call back into the
/// [`TrackingClient`](crate::clients::TrackingClient). A listener that holds
/// a `TrackingClient` keeps the tracking actor alive until its order is
/// finished or stopped.
#[async_trait]
pub trait StatusListener: Send + Sync + 'static {
    async fn on_status(&self, order_id: &OrderId, status: OrderStatus);
}

/// Forwards transitions into a channel. Handy for tests and for bridging
/// into code that polls.
#[async_trait]
impl StatusListener for mpsc::UnboundedSender<(OrderId, OrderStatus)> {
    async fn on_status(&self, order_id: &OrderId, status: OrderStatus) {
        let _ = self.send((order_id.clone(), status));
    }
}

/// Creates a new Tracking actor and its client.
pub fn new(
    config: TrackingConfig,
    clock: Arc<dyn Clock>,
    buffer_size: usize,
) -> (TrackingActor, TrackingClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let config = Arc::new(config);
    let actor = TrackingActor::new(receiver, config.clone(), clock.clone());
    let client = TrackingClient::new(sender, config, clock);

    (actor, client)
}
