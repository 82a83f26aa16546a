//! Publish/subscribe fan-out for status updates.
//!
//! Owned by the tracking actor, so it is plain data with no locks.
//!
//! Every subscription has a bounded buffer. Publishing never waits: an
//! update for a subscriber whose buffer is full is dropped for that
//! subscriber only, and the subscription stays registered.

use crate::model::OrderId;
use crate::tracking::event::OrderStatusUpdate;
use std::collections::HashMap;
use std::fmt::Display;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// What a subscription listens to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Updates for a single order.
    Order(OrderId),
    /// Updates for every order.
    AllOrders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub_{}", self.0)
    }
}

/// The receiving end of a registration.
///
/// Dropping it is enough to stop deliveries; the registry prunes closed
/// channels on the next publish. Call
/// [`TrackingClient::unsubscribe`](crate::clients::TrackingClient::unsubscribe)
/// to remove it eagerly.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    receiver: mpsc::Receiver<OrderStatusUpdate>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Waits for the next update. `None` once unsubscribed or the tracker shut down.
    pub async fn recv(&mut self) -> Option<OrderStatusUpdate> {
        self.receiver.recv().await
    }

    /// Returns an already delivered update without waiting.
    pub fn try_recv(&mut self) -> Option<OrderStatusUpdate> {
        self.receiver.try_recv().ok()
    }
}

type Sink = (SubscriptionId, mpsc::Sender<OrderStatusUpdate>);

/// Buffer used by [`SubscriberRegistry::default`].
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

#[derive(Debug)]
pub struct SubscriberRegistry {
    buffer: usize,
    next_id: u64,
    per_order: HashMap<OrderId, Vec<Sink>>,
    global: Vec<Sink>,
    topics: HashMap<SubscriptionId, Topic>,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }
}

impl SubscriberRegistry {
    /// `buffer` is how many undelivered updates each subscription holds; zero is treated as one.
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
            next_id: 0,
            per_order: HashMap::new(),
            global: Vec::new(),
            topics: HashMap::new(),
        }
    }

    pub fn subscribe(&mut self, topic: Topic) -> Subscription {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let (sender, receiver) = mpsc::channel(self.buffer);

        match &topic {
            Topic::Order(order_id) => self
                .per_order
                .entry(order_id.clone())
                .or_default()
                .push((id, sender)),
            Topic::AllOrders => self.global.push((id, sender)),
        }
        self.topics.insert(id, topic.clone());
        debug!(subscription = %id, ?topic, "Subscribed");

        Subscription {
            id,
            topic,
            receiver,
        }
    }

    /// Removes exactly one registration. Returns false if it was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(topic) = self.topics.remove(&id) else {
            return false;
        };
        match topic {
            Topic::Order(order_id) => {
                if let Some(sinks) = self.per_order.get_mut(&order_id) {
                    sinks.retain(|(sink_id, _)| *sink_id != id);
                    if sinks.is_empty() {
                        self.per_order.remove(&order_id);
                    }
                }
            }
            Topic::AllOrders => self.global.retain(|(sink_id, _)| *sink_id != id),
        }
        debug!(subscription = %id, "Unsubscribed");
        true
    }

    /// Delivers to the order's subscribers, then to global ones, each in
    /// registration order. Returns how many subscribers received it; full
    /// subscriptions are skipped and closed ones removed.
    pub fn publish(&mut self, update: &OrderStatusUpdate) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        if let Some(sinks) = self.per_order.get_mut(&update.order_id) {
            delivered += deliver(sinks, update, &mut closed);
            if sinks.is_empty() {
                self.per_order.remove(&update.order_id);
            }
        }
        delivered += deliver(&mut self.global, update, &mut closed);

        for id in closed {
            self.topics.remove(&id);
            debug!(subscription = %id, "Pruned closed subscription");
        }
        delivered
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        match topic {
            Topic::Order(order_id) => self.per_order.get(order_id).map_or(0, Vec::len),
            Topic::AllOrders => self.global.len(),
        }
    }
}

fn deliver(sinks: &mut Vec<Sink>, update: &OrderStatusUpdate, closed: &mut Vec<SubscriptionId>) -> usize {
    let mut delivered = 0;
    sinks.retain(|(id, sender)| match sender.try_send(update.clone()) {
        Ok(()) => {
            delivered += 1;
            true
        }
        Err(TrySendError::Full(_)) => {
            warn!(subscription = %id, order_id = %update.order_id, "Subscriber lagging, update dropped");
            true
        }
        Err(TrySendError::Closed(_)) => {
            closed.push(*id);
            false
        }
    });
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;

    fn update(order: &str) -> OrderStatusUpdate {
        OrderStatusUpdate::new(OrderId::from(order), OrderStatus::Preparing, 0)
    }

    #[test]
    fn test_publish_reaches_order_and_global_subscribers() {
        let mut registry = SubscriberRegistry::default();
        let mut mine = registry.subscribe(Topic::Order(OrderId::from("order_1")));
        let mut other = registry.subscribe(Topic::Order(OrderId::from("order_2")));
        let mut all = registry.subscribe(Topic::AllOrders);

        assert_eq!(registry.publish(&update("order_1")), 2);
        assert_eq!(mine.try_recv().unwrap().order_id, OrderId::from("order_1"));
        assert!(other.try_recv().is_none());
        assert!(all.try_recv().is_some());
    }

    #[test]
    fn test_unsubscribe_removes_only_that_registration() {
        let mut registry = SubscriberRegistry::default();
        let topic = Topic::Order(OrderId::from("order_1"));
        let first = registry.subscribe(topic.clone());
        let mut second = registry.subscribe(topic.clone());

        assert!(registry.unsubscribe(first.id()));
        assert!(!registry.unsubscribe(first.id()));
        assert_eq!(registry.subscriber_count(&topic), 1);

        registry.publish(&update("order_1"));
        assert!(second.try_recv().is_some());

        assert!(registry.unsubscribe(second.id()));
        assert_eq!(registry.subscriber_count(&topic), 0);
        assert!(registry.per_order.is_empty());
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let mut registry = SubscriberRegistry::default();
        let dropped = registry.subscribe(Topic::AllOrders);
        let dropped_id = dropped.id();
        drop(dropped);
        let _kept = registry.subscribe(Topic::AllOrders);

        assert_eq!(registry.publish(&update("order_1")), 1);
        assert_eq!(registry.subscriber_count(&Topic::AllOrders), 1);
        assert!(!registry.unsubscribe(dropped_id));
    }

    #[test]
    fn test_full_subscription_drops_updates_but_stays_registered() {
        let mut registry = SubscriberRegistry::new(2);
        let mut slow = registry.subscribe(Topic::AllOrders);
        let mut fast = registry.subscribe(Topic::AllOrders);

        assert_eq!(registry.publish(&update("order_1")), 2);
        assert!(fast.try_recv().is_some());
        assert_eq!(registry.publish(&update("order_2")), 2);
        assert!(fast.try_recv().is_some());

        // `slow` holds two unread updates, so only `fast` gets the third.
        assert_eq!(registry.publish(&update("order_3")), 1);
        assert_eq!(fast.try_recv().unwrap().order_id, OrderId::from("order_3"));
        assert_eq!(registry.subscriber_count(&Topic::AllOrders), 2);

        assert_eq!(slow.try_recv().unwrap().order_id, OrderId::from("order_1"));
        assert_eq!(slow.try_recv().unwrap().order_id, OrderId::from("order_2"));
        assert!(slow.try_recv().is_none());

        // Reading makes room again.
        assert_eq!(registry.publish(&update("order_4")), 2);
        assert_eq!(slow.try_recv().unwrap().order_id, OrderId::from("order_4"));
    }
}
