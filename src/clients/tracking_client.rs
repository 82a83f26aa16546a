use crate::config::TrackingConfig;
use crate::model::{OrderId, OrderRecord, Timestamp};
use crate::tracking::{
    estimated_completion_time, tracking_events, Clock, OrderTrackingEvent, StatusListener,
    Subscription, SubscriptionId, Topic, TrackingError, TrackingRequest,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for the order status simulator.
///
/// Scheduling and subscriptions go through the tracking actor. Timeline
/// helpers are computed locally from the same configuration.
#[derive(Clone)]
pub struct TrackingClient {
    sender: mpsc::Sender<TrackingRequest>,
    config: Arc<TrackingConfig>,
    clock: Arc<dyn Clock>,
}

impl TrackingClient {
    pub fn new(
        sender: mpsc::Sender<TrackingRequest>,
        config: Arc<TrackingConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sender,
            config,
            clock,
        }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> TrackingRequest,
    ) -> Result<R, TrackingError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| TrackingError::ActorClosed)?;
        response
            .await
            .map_err(|e| TrackingError::ActorCommunicationError(e.to_string()))
    }

    /// Starts simulating `order`. Returns false when nothing was scheduled:
    /// the order is completed, already tracked, not freshly placed, or
    /// waiting on payment.
    #[instrument(skip(self, order, listener), fields(order_id = %order.id))]
    pub async fn start_tracking(
        &self,
        order: &OrderRecord,
        listener: Arc<dyn StatusListener>,
    ) -> Result<bool, TrackingError> {
        debug!("Sending request");
        let order = order.clone();
        self.request(|respond_to| TrackingRequest::Start {
            order,
            listener,
            respond_to,
        })
        .await
    }

    /// Cancels the pending transition. Returns false if there was none.
    #[instrument(skip(self))]
    pub async fn stop_tracking(&self, order_id: OrderId) -> Result<bool, TrackingError> {
        debug!("Sending request");
        self.request(|respond_to| TrackingRequest::Stop {
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn is_tracking(&self, order_id: OrderId) -> Result<bool, TrackingError> {
        self.request(|respond_to| TrackingRequest::IsTracking {
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn subscribe(&self, topic: Topic) -> Result<Subscription, TrackingError> {
        debug!("Sending request");
        self.request(|respond_to| TrackingRequest::Subscribe { topic, respond_to })
            .await
    }

    pub async fn subscribe_to_order(&self, order_id: OrderId) -> Result<Subscription, TrackingError> {
        self.subscribe(Topic::Order(order_id)).await
    }

    pub async fn subscribe_to_all_orders(&self) -> Result<Subscription, TrackingError> {
        self.subscribe(Topic::AllOrders).await
    }

    /// Removes one registration. Returns false if it was already gone.
    #[instrument(skip(self))]
    pub async fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, TrackingError> {
        debug!("Sending request");
        self.request(|respond_to| TrackingRequest::Unsubscribe { id, respond_to })
            .await
    }

    /// Expected timeline of `order` up to its current status.
    pub fn tracking_events(&self, order: &OrderRecord) -> Vec<OrderTrackingEvent> {
        tracking_events(order, &self.config)
    }

    /// Expected ready-for-pickup time of `order`.
    pub fn estimated_completion_time(&self, order: &OrderRecord) -> Timestamp {
        estimated_completion_time(order, &self.config, self.clock.now_ms())
    }
}
