//! # The Tracking Actor
//!
//! Owns every active tracker and the subscriber registry, and drives all
//! pending transitions from a single loop.
//!
//! Each pass of the loop waits on whichever comes first: a request from a
//! [`TrackingClient`](crate::clients::TrackingClient), a transition whose
//! listener has finished, or the earliest pending deadline. When a deadline
//! fires the order is advanced one stage and the next deadline is armed from
//! the one that just fired. Cancelling a tracker removes its deadline, so a
//! stopped order can never advance again.
//!
//! Listeners never run on the loop itself. Each tracker has a delivery task
//! that calls its [`StatusListener`] one transition at a time and then hands
//! the update back for publishing, so subscribers only hear about a status
//! once the listener has seen it. A listener may call back into the
//! tracker, and a slow one only delays its own order's updates.

use crate::config::TrackingConfig;
use crate::model::{OrderId, OrderRecord, OrderStatus};
use crate::tracking::event::OrderStatusUpdate;
use crate::tracking::registry::{SubscriberRegistry, Subscription, SubscriptionId, Topic};
use crate::tracking::state::{next_state, should_track};
use crate::tracking::{Clock, StatusListener};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Requests understood by the tracking actor.
pub enum TrackingRequest {
    Start {
        order: OrderRecord,
        listener: Arc<dyn StatusListener>,
        respond_to: oneshot::Sender<bool>,
    },
    Stop {
        order_id: OrderId,
        respond_to: oneshot::Sender<bool>,
    },
    Subscribe {
        topic: Topic,
        respond_to: oneshot::Sender<Subscription>,
    },
    Unsubscribe {
        id: SubscriptionId,
        respond_to: oneshot::Sender<bool>,
    },
    IsTracking {
        order_id: OrderId,
        respond_to: oneshot::Sender<bool>,
    },
}

/// Ordering key of the schedule. The sequence number keeps equal deadlines
/// in the order they were armed.
type Slot = (Instant, u64);

struct Tracker {
    status: OrderStatus,
    slot: Slot,
    /// Inbox of the order's delivery task. Dropping it lets the task drain and exit.
    outbox: mpsc::UnboundedSender<OrderStatusUpdate>,
}

pub struct TrackingActor {
    receiver: mpsc::Receiver<TrackingRequest>,
    config: Arc<TrackingConfig>,
    clock: Arc<dyn Clock>,
    trackers: HashMap<OrderId, Tracker>,
    schedule: BTreeMap<Slot, OrderId>,
    registry: SubscriberRegistry,
    seq: u64,
    delivered_tx: mpsc::UnboundedSender<OrderStatusUpdate>,
    delivered_rx: mpsc::UnboundedReceiver<OrderStatusUpdate>,
}

impl TrackingActor {
    pub fn new(
        receiver: mpsc::Receiver<TrackingRequest>,
        config: Arc<TrackingConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (delivered_tx, delivered_rx) = mpsc::unbounded_channel();
        Self {
            receiver,
            registry: SubscriberRegistry::new(config.subscriber_buffer),
            config,
            clock,
            trackers: HashMap::new(),
            schedule: BTreeMap::new(),
            seq: 0,
            delivered_tx,
            delivered_rx,
        }
    }

    /// Runs until every client is dropped. Pending transitions are abandoned
    /// and updates still in flight are not published.
    pub async fn run(mut self) {
        info!("Tracking actor started");

        loop {
            let next_due = self.schedule.keys().next().map(|(at, _)| *at);
            tokio::select! {
                biased;
                msg = self.receiver.recv() => match msg {
                    Some(request) => self.handle(request),
                    None => break,
                },
                Some(update) = self.delivered_rx.recv() => self.publish(update),
                _ = sleep_until(next_due.unwrap_or_else(Instant::now)), if next_due.is_some() => {
                    self.fire_due();
                }
            }
        }

        info!(pending = self.trackers.len(), "Tracking actor shutdown");
    }

    fn handle(&mut self, request: TrackingRequest) {
        match request {
            TrackingRequest::Start {
                order,
                listener,
                respond_to,
            } => {
                let _ = respond_to.send(self.start(order, listener));
            }
            TrackingRequest::Stop {
                order_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.stop(&order_id));
            }
            TrackingRequest::Subscribe { topic, respond_to } => {
                let _ = respond_to.send(self.registry.subscribe(topic));
            }
            TrackingRequest::Unsubscribe { id, respond_to } => {
                let _ = respond_to.send(self.registry.unsubscribe(id));
            }
            TrackingRequest::IsTracking {
                order_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.trackers.contains_key(&order_id));
            }
        }
    }

    fn start(&mut self, order: OrderRecord, listener: Arc<dyn StatusListener>) -> bool {
        if order.status == OrderStatus::Completed || self.trackers.contains_key(&order.id) {
            debug!(order_id = %order.id, status = %order.status, "Already tracked or completed");
            return false;
        }
        if !should_track(&order) {
            debug!(
                order_id = %order.id,
                status = %order.status,
                payment_method = ?order.payment_method,
                payment_status = ?order.payment_status,
                "Not eligible for tracking"
            );
            return false;
        }

        let Some(slot) = self.arm(Instant::now(), order.status) else {
            return false;
        };
        info!(order_id = %order.id, "Tracking started");
        self.schedule.insert(slot, order.id.clone());
        let outbox = spawn_delivery(listener, self.delivered_tx.clone());
        self.trackers.insert(
            order.id,
            Tracker {
                status: order.status,
                slot,
                outbox,
            },
        );
        true
    }

    fn stop(&mut self, order_id: &OrderId) -> bool {
        match self.trackers.remove(order_id) {
            Some(tracker) => {
                self.schedule.remove(&tracker.slot);
                info!(%order_id, status = %tracker.status, "Tracking stopped");
                true
            }
            None => false,
        }
    }

    /// Slot at which an order in `status` advances, counted from `from`.
    fn arm(&mut self, from: Instant, status: OrderStatus) -> Option<Slot> {
        let dwell = self.config.dwell_ms(status)?;
        self.seq += 1;
        Some((from + Duration::from_millis(dwell), self.seq))
    }

    fn fire_due(&mut self) {
        let now = Instant::now();
        while let Some((&slot, _)) = self.schedule.first_key_value() {
            if slot.0 > now {
                break;
            }
            let Some(order_id) = self.schedule.remove(&slot) else {
                break;
            };
            self.advance(order_id, slot.0);
        }
    }

    fn advance(&mut self, order_id: OrderId, fired_at: Instant) {
        let Some(tracker) = self.trackers.get_mut(&order_id) else {
            return;
        };
        let Some(next) = next_state(tracker.status) else {
            self.trackers.remove(&order_id);
            return;
        };

        let update = OrderStatusUpdate::new(order_id.clone(), next, self.clock.now_ms());
        if tracker.outbox.send(update).is_err() {
            warn!(%order_id, status = %next, "Delivery task gone, update dropped");
        }
        tracker.status = next;
        debug!(%order_id, status = %next, "Transition fired");

        if next.is_terminal() {
            self.trackers.remove(&order_id);
            info!(%order_id, "Tracking finished");
            return;
        }

        match self.arm(fired_at, next) {
            Some(slot) => {
                self.schedule.insert(slot, order_id.clone());
                if let Some(tracker) = self.trackers.get_mut(&order_id) {
                    tracker.slot = slot;
                }
            }
            None => {
                self.trackers.remove(&order_id);
            }
        }
    }

    fn publish(&mut self, update: OrderStatusUpdate) {
        let delivered = self.registry.publish(&update);
        info!(order_id = %update.order_id, status = %update.status, delivered, "Status update published");
    }
}

/// Starts the task that runs `listener` for one order's transitions, in
/// order, and forwards each update to `delivered` once the listener returns.
fn spawn_delivery(
    listener: Arc<dyn StatusListener>,
    delivered: mpsc::UnboundedSender<OrderStatusUpdate>,
) -> mpsc::UnboundedSender<OrderStatusUpdate> {
    let (outbox, mut pending) = mpsc::unbounded_channel::<OrderStatusUpdate>();
    tokio::spawn(async move {
        while let Some(update) = pending.recv().await {
            listener.on_status(&update.order_id, update.status).await;
            if delivered.send(update).is_err() {
                break;
            }
        }
    });
    outbox
}
