use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{OrderDraft, OrderId, OrderRecord, OrderStatus, PaymentStatus, UserId};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::tracking::StatusListener;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<OrderRecord>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<OrderRecord>) -> Self {
        Self { inner }
    }

    /// Stores a new order and returns it as placed.
    #[instrument(skip(self, draft), fields(user_id = %draft.user_id))]
    pub async fn place_order(&self, id: OrderId, draft: OrderDraft) -> Result<OrderRecord, OrderError> {
        debug!(?draft, "place_order called");
        self.inner
            .create(id.clone(), draft)
            .await
            .map_err(Self::map_error)?;
        info!(order_id = %id, "Order placed");
        self.inner
            .get(id.clone())
            .await
            .map_err(Self::map_error)?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// The user's orders, ordered by id.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<OrderRecord>, OrderError> {
        let orders = self.list().await?;
        Ok(orders
            .into_iter()
            .filter(|order| &order.user_id == user_id)
            .collect())
    }

    /// Moves an order to `status`. Returns whether anything changed.
    #[instrument(skip(self))]
    pub async fn advance_status(&self, id: OrderId, status: OrderStatus) -> Result<bool, OrderError> {
        match self
            .inner
            .perform_action(id, OrderAction::AdvanceStatus(status))
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::AdvanceStatus { changed, .. } => Ok(changed),
            other => Err(OrderError::ActorCommunicationError(format!(
                "unexpected result {other:?}"
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_payment_status(&self, id: OrderId, status: PaymentStatus) -> Result<(), OrderError> {
        self.inner
            .perform_action(id, OrderAction::SetPaymentStatus(status))
            .await
            .map_err(Self::map_error)?;
        Ok(())
    }
}

#[async_trait]
impl ActorClient<OrderRecord> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<OrderRecord> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::AlreadyExists(id) => OrderError::AlreadyExists(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                Ok(order_error) => *order_error,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// Persists transitions coming from the tracker.
#[async_trait]
impl StatusListener for OrderClient {
    async fn on_status(&self, order_id: &OrderId, status: OrderStatus) {
        if let Err(e) = self.advance_status(order_id.clone(), status).await {
            warn!(%order_id, %status, error = %e, "Failed to persist status");
        }
    }
}
